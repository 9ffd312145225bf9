//! Publisher model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{optional_url, required, CatalogForm};

/// Publisher record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
    pub website: String,
}

impl std::fmt::Display for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Fields a client may set on a publisher
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PublisherForm {
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub address: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub city: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub state_province: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub country: String,
    #[validate(
        custom(function = "optional_url"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub website: String,
}

impl CatalogForm for PublisherForm {
    fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.address,
            &mut self.city,
            &mut self.state_province,
            &mut self.country,
            &mut self.website,
        ] {
            *field = field.trim().to_string();
        }
    }
}

impl From<&Publisher> for PublisherForm {
    fn from(p: &Publisher) -> Self {
        Self {
            name: p.name.clone(),
            address: p.address.clone(),
            city: p.city.clone(),
            state_province: p.state_province.clone(),
            country: p.country.clone(),
            website: p.website.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{REQUIRED, TOO_LONG};

    #[test]
    fn test_name_is_required() {
        let mut form = PublisherForm {
            name: "   ".into(),
            ..Default::default()
        };
        form.normalize();
        let errors = form.check();
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_fields_are_capped_at_column_width() {
        let form = PublisherForm {
            name: "n".repeat(255),
            city: "c".repeat(256),
            ..Default::default()
        };
        let errors = form.check();
        assert!(errors.get("name").is_none());
        assert_eq!(errors.get("city"), Some(&[TOO_LONG.to_string()][..]));
    }

    #[test]
    fn test_optional_fields_accept_empty() {
        let form = PublisherForm {
            name: "ali".into(),
            ..Default::default()
        };
        assert!(form.check().is_empty());
    }

    #[test]
    fn test_display_is_name() {
        let p = Publisher {
            id: 1,
            name: "ali".into(),
            address: String::new(),
            city: String::new(),
            state_province: String::new(),
            country: String::new(),
            website: String::new(),
        };
        assert_eq!(p.to_string(), "ali");
    }
}
