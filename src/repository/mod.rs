//! Repository layer for catalog storage
//!
//! Each record type has its own store contract. Two backends implement them:
//! PostgreSQL through sqlx, and an in-process store used with a `memory:`
//! database URL.

pub mod authors;
pub mod books;
pub mod memory;
pub mod publishers;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book, BookData, Publisher, PublisherForm, User},
};

#[async_trait]
pub trait PublisherStore: Send + Sync {
    /// One page in id order, with the total row count
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Publisher>, i64)>;
    async fn get_by_id(&self, id: i32) -> AppResult<Publisher>;
    async fn exists(&self, id: i32) -> AppResult<bool>;
    async fn create(&self, data: &PublisherForm) -> AppResult<Publisher>;
    async fn update(&self, id: i32, data: &PublisherForm) -> AppResult<Publisher>;
    /// Fails with `Integrity` while a book references the publisher
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)>;
    async fn get_by_id(&self, id: i32) -> AppResult<Author>;
    /// Stamp `last_accessed` with the current time and return the record
    async fn touch(&self, id: i32) -> AppResult<Author>;
    /// Authors with the given ids, in id order; unknown ids are skipped
    async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Author>>;
    async fn create(&self, data: &AuthorForm) -> AppResult<Author>;
    async fn update(&self, id: i32, data: &AuthorForm) -> AppResult<Author>;
    /// Fails with `Integrity` while a book lists the author
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Book>, i64)>;
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;
    /// Stamp `last_accessed` with the current time and return the record
    async fn touch(&self, id: i32) -> AppResult<Book>;
    async fn list_by_publisher(&self, publisher_id: i32) -> AppResult<Vec<Book>>;
    async fn create(&self, data: &BookData) -> AppResult<Book>;
    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn create(&self, username: &str, password_hash: &str) -> AppResult<User>;
}

/// Handles to every store, shared by the services
#[derive(Clone)]
pub struct Repository {
    pub publishers: Arc<dyn PublisherStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            publishers: Arc::new(publishers::PublishersRepository::new(pool.clone())),
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Create a repository backed by a fresh in-process store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            publishers: Arc::new(store.clone()),
            authors: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}

/// Turn a foreign key violation into a restrict error, leaving others as-is
pub(crate) fn restrict_violation(err: sqlx::Error, what: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::Integrity(format!("{} is still referenced by books", what))
        }
        _ => AppError::Database(err),
    }
}
