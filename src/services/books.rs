//! Books service

use crate::{
    error::{AppError, AppResult},
    forms::{CatalogForm, FormErrors, Submission},
    models::{Book, BookData, BookDetails, BookForm},
    pagination::{PageInfo, PageNumber, PageRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    page_size: i64,
}

impl BooksService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    pub async fn list(&self, page: PageNumber) -> AppResult<(Vec<Book>, PageInfo)> {
        let request = match page {
            PageNumber::Number(number) => PageRequest::new(number, self.page_size),
            PageNumber::Last => {
                let (_, total) = self.repository.books.page(0, 0).await?;
                PageRequest::last(total, self.page_size)
            }
        };
        let (rows, total) = self
            .repository
            .books
            .page(request.limit(), request.offset())
            .await?;
        Ok((rows, PageInfo::new(request, total)))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Read for the detail page; records the access time and resolves references
    pub async fn view(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.touch(id).await?;
        let publisher = self.repository.publishers.get_by_id(book.publisher_id).await?;
        let authors = self.repository.authors.get_many(&book.author_ids).await?;
        tracing::debug!(book_id = id, last_accessed = ?book.last_accessed, "book viewed");
        Ok(BookDetails {
            book,
            publisher,
            authors,
        })
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<Book>> {
        let data = match self.resolve(form).await? {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Invalid(errors)),
        };
        let book = self.repository.books.create(&data).await?;
        tracing::info!(book_id = book.id, publisher_id = book.publisher_id, "book created");
        Ok(Submission::Saved(book))
    }

    pub async fn update(&self, id: i32, form: BookForm) -> AppResult<Submission<Book>> {
        self.repository.books.get_by_id(id).await?;
        let data = match self.resolve(form).await? {
            Ok(data) => data,
            Err(errors) => return Ok(Submission::Invalid(errors)),
        };
        let book = self.repository.books.update(id, &data).await?;
        tracing::info!(book_id = id, "book updated");
        Ok(Submission::Saved(book))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Validate a submission and check that every reference exists
    async fn resolve(&self, mut form: BookForm) -> AppResult<Result<BookData, FormErrors>> {
        form.normalize();
        let mut errors = form.check();
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let data = BookData::parse(&form)
            .ok_or_else(|| AppError::Internal("checked book form failed to parse".to_string()))?;

        if !self.repository.publishers.exists(data.publisher_id).await? {
            errors.add(
                "publisher",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }

        let found = self.repository.authors.get_many(&data.author_ids).await?;
        for id in &data.author_ids {
            if !found.iter().any(|a| a.id == *id) {
                errors.add(
                    "authors",
                    format!("Select a valid choice. {} is not one of the available choices.", id),
                );
            }
        }

        if errors.is_empty() {
            Ok(Ok(data))
        } else {
            Ok(Err(errors))
        }
    }
}
