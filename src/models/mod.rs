//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod publisher;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{Book, BookData, BookDetails, BookForm};
pub use publisher::{Publisher, PublisherForm};
pub use user::{SessionClaims, User};
