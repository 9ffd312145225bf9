//! In-process catalog store
//!
//! Implements every store contract over ordered maps behind one lock, with
//! the same restrict rules as the database schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AuthorStore, BookStore, PublisherStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book, BookData, Publisher, PublisherForm, User},
};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn page(&self, limit: i64, offset: i64) -> (Vec<T>, i64) {
        let rows = self
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        (rows, self.rows.len() as i64)
    }
}

#[derive(Default)]
struct State {
    publishers: Table<Publisher>,
    authors: Table<Author>,
    books: Table<Book>,
    users: Table<User>,
}

impl State {
    fn check_references(&self, data: &BookData) -> AppResult<()> {
        let authors_known = data
            .author_ids
            .iter()
            .all(|id| self.authors.rows.contains_key(id));
        if !self.publishers.rows.contains_key(&data.publisher_id) || !authors_known {
            return Err(AppError::Integrity(
                "Book references a publisher or author that no longer exists".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

fn publisher_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Publisher {} not found", id))
}

fn author_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

#[async_trait]
impl PublisherStore for MemoryStore {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Publisher>, i64)> {
        Ok(self.state.read().await.publishers.page(limit, offset))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        let state = self.state.read().await;
        state.publishers.rows.get(&id).cloned().ok_or_else(|| publisher_not_found(id))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.state.read().await.publishers.rows.contains_key(&id))
    }

    async fn create(&self, data: &PublisherForm) -> AppResult<Publisher> {
        let mut state = self.state.write().await;
        let id = state.publishers.next_id();
        let publisher = Publisher {
            id,
            name: data.name.clone(),
            address: data.address.clone(),
            city: data.city.clone(),
            state_province: data.state_province.clone(),
            country: data.country.clone(),
            website: data.website.clone(),
        };
        state.publishers.rows.insert(id, publisher.clone());
        Ok(publisher)
    }

    async fn update(&self, id: i32, data: &PublisherForm) -> AppResult<Publisher> {
        let mut state = self.state.write().await;
        let publisher = state
            .publishers
            .rows
            .get_mut(&id)
            .ok_or_else(|| publisher_not_found(id))?;
        publisher.name = data.name.clone();
        publisher.address = data.address.clone();
        publisher.city = data.city.clone();
        publisher.state_province = data.state_province.clone();
        publisher.country = data.country.clone();
        publisher.website = data.website.clone();
        Ok(publisher.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.publishers.rows.contains_key(&id) {
            return Err(publisher_not_found(id));
        }
        if state.books.rows.values().any(|b| b.publisher_id == id) {
            return Err(AppError::Integrity(format!(
                "Publisher {} is still referenced by books",
                id
            )));
        }
        state.publishers.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)> {
        Ok(self.state.read().await.authors.page(limit, offset))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        let state = self.state.read().await;
        state.authors.rows.get(&id).cloned().ok_or_else(|| author_not_found(id))
    }

    async fn touch(&self, id: i32) -> AppResult<Author> {
        let mut state = self.state.write().await;
        let author = state.authors.rows.get_mut(&id).ok_or_else(|| author_not_found(id))?;
        author.last_accessed = Some(Utc::now());
        Ok(author.clone())
    }

    async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Author>> {
        let state = self.state.read().await;
        Ok(state
            .authors
            .rows
            .values()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn create(&self, data: &AuthorForm) -> AppResult<Author> {
        let mut state = self.state.write().await;
        let id = state.authors.next_id();
        let author = Author {
            id,
            salutation: data.salutation.clone(),
            name: data.name.clone(),
            email: data.email.clone(),
            headshot: String::new(),
            last_accessed: None,
        };
        state.authors.rows.insert(id, author.clone());
        Ok(author)
    }

    async fn update(&self, id: i32, data: &AuthorForm) -> AppResult<Author> {
        let mut state = self.state.write().await;
        let author = state.authors.rows.get_mut(&id).ok_or_else(|| author_not_found(id))?;
        author.salutation = data.salutation.clone();
        author.name = data.name.clone();
        author.email = data.email.clone();
        Ok(author.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.authors.rows.contains_key(&id) {
            return Err(author_not_found(id));
        }
        if state.books.rows.values().any(|b| b.author_ids.contains(&id)) {
            return Err(AppError::Integrity(format!(
                "Author {} is still referenced by books",
                id
            )));
        }
        state.authors.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Book>, i64)> {
        Ok(self.state.read().await.books.page(limit, offset))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let state = self.state.read().await;
        state.books.rows.get(&id).cloned().ok_or_else(|| book_not_found(id))
    }

    async fn touch(&self, id: i32) -> AppResult<Book> {
        let mut state = self.state.write().await;
        let book = state.books.rows.get_mut(&id).ok_or_else(|| book_not_found(id))?;
        book.last_accessed = Some(Utc::now());
        Ok(book.clone())
    }

    async fn list_by_publisher(&self, publisher_id: i32) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(state
            .books
            .rows
            .values()
            .filter(|b| b.publisher_id == publisher_id)
            .cloned()
            .collect())
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let mut state = self.state.write().await;
        state.check_references(data)?;
        let id = state.books.next_id();
        let book = Book {
            id,
            title: data.title.clone(),
            publisher_id: data.publisher_id,
            author_ids: data.author_ids.clone(),
            publication_date: data.publication_date,
            last_accessed: None,
        };
        state.books.rows.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if !state.books.rows.contains_key(&id) {
            return Err(book_not_found(id));
        }
        state.check_references(data)?;
        let book = state.books.rows.get_mut(&id).ok_or_else(|| book_not_found(id))?;
        book.title = data.title.clone();
        book.publisher_id = data.publisher_id;
        book.author_ids = data.author_ids.clone();
        book.publication_date = data.publication_date;
        Ok(book.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.books.rows.remove(&id).map(|_| ()).ok_or_else(|| book_not_found(id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.rows.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.rows.values().any(|u| u.username == username) {
            return Err(AppError::BadRequest(format!("User {} already exists", username)));
        }
        let id = state.users.next_id();
        let user = User {
            id,
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.rows.insert(id, user.clone());
        Ok(user)
    }
}
