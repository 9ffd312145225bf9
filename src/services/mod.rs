//! Business logic services

pub mod authors;
pub mod books;
pub mod publishers;
pub mod users;

use crate::{
    config::{AuthConfig, CatalogConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub publishers: publishers::PublishersService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, catalog: CatalogConfig) -> Self {
        Self {
            publishers: publishers::PublishersService::new(repository.clone(), catalog.page_size),
            authors: authors::AuthorsService::new(repository.clone(), catalog.page_size),
            books: books::BooksService::new(repository.clone(), catalog.page_size),
            users: users::UsersService::new(repository, auth_config),
        }
    }
}
