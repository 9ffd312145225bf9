//! Book model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, publisher::Publisher};
use crate::forms::{id_list, optional_date, required, required_id, CatalogForm};

/// Book record; `author_ids` is read from the join table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub publisher_id: i32,
    pub author_ids: Vec<i32>,
    pub publication_date: Option<NaiveDate>,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Book with its publisher and authors resolved, for the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub publisher: Publisher,
    pub authors: Vec<Author>,
}

/// Fields a client may set on a book.
///
/// References arrive as raw strings so an unparsable id is reported on the
/// form rather than rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct BookForm {
    #[validate(
        custom(function = "required"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "id_list"))]
    pub authors: Vec<String>,
    #[validate(custom(function = "required_id"))]
    pub publisher: String,
    #[validate(custom(function = "optional_date"))]
    pub publication_date: String,
}

impl CatalogForm for BookForm {
    fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.publisher = self.publisher.trim().to_string();
        self.publication_date = self.publication_date.trim().to_string();
        self.authors = self
            .authors
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
    }
}

impl From<&Book> for BookForm {
    fn from(b: &Book) -> Self {
        Self {
            title: b.title.clone(),
            authors: b.author_ids.iter().map(|id| id.to_string()).collect(),
            publisher: b.publisher_id.to_string(),
            publication_date: b
                .publication_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Validated book values with references parsed
#[derive(Debug, Clone, PartialEq)]
pub struct BookData {
    pub title: String,
    pub publisher_id: i32,
    pub author_ids: Vec<i32>,
    pub publication_date: Option<NaiveDate>,
}

impl BookData {
    /// Parse a form that already passed `check()`
    pub fn parse(form: &BookForm) -> Option<Self> {
        let publisher_id = form.publisher.parse().ok()?;
        let mut author_ids = form
            .authors
            .iter()
            .map(|a| a.parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        author_ids.sort_unstable();
        author_ids.dedup();
        let publication_date = if form.publication_date.is_empty() {
            None
        } else {
            Some(NaiveDate::parse_from_str(&form.publication_date, "%Y-%m-%d").ok()?)
        };
        Some(Self {
            title: form.title.clone(),
            publisher_id,
            author_ids,
            publication_date,
        })
    }
}
