//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{optional_email, required, CatalogForm};

/// Author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub salutation: String,
    pub name: String,
    pub email: String,
    /// Path of the headshot image; not editable through forms
    pub headshot: String,
    /// Updated on every detail page view
    pub last_accessed: Option<DateTime<Utc>>,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Fields a client may set on an author
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AuthorForm {
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub salutation: String,
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "optional_email"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub email: String,
}

impl CatalogForm for AuthorForm {
    fn normalize(&mut self) {
        self.salutation = self.salutation.trim().to_string();
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
    }
}

impl From<&Author> for AuthorForm {
    fn from(a: &Author) -> Self {
        Self {
            salutation: a.salutation.clone(),
            name: a.name.clone(),
            email: a.email.clone(),
        }
    }
}
