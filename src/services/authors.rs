//! Authors service

use crate::{
    error::AppResult,
    forms::{CatalogForm, Submission},
    models::{Author, AuthorForm},
    pagination::{PageInfo, PageNumber, PageRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    page_size: i64,
}

impl AuthorsService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    pub async fn list(&self, page: PageNumber) -> AppResult<(Vec<Author>, PageInfo)> {
        let request = match page {
            PageNumber::Number(number) => PageRequest::new(number, self.page_size),
            PageNumber::Last => {
                let (_, total) = self.repository.authors.page(0, 0).await?;
                PageRequest::last(total, self.page_size)
            }
        };
        let (rows, total) = self
            .repository
            .authors
            .page(request.limit(), request.offset())
            .await?;
        Ok((rows, PageInfo::new(request, total)))
    }

    /// Read without side effects, for edit and delete pages
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Read for the detail page; records the access time
    pub async fn view(&self, id: i32) -> AppResult<Author> {
        let author = self.repository.authors.touch(id).await?;
        tracing::debug!(author_id = id, last_accessed = ?author.last_accessed, "author viewed");
        Ok(author)
    }

    pub async fn create(&self, mut form: AuthorForm) -> AppResult<Submission<Author>> {
        form.normalize();
        let errors = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Invalid(errors));
        }
        let author = self.repository.authors.create(&form).await?;
        tracing::info!(author_id = author.id, "author created");
        Ok(Submission::Saved(author))
    }

    pub async fn update(&self, id: i32, mut form: AuthorForm) -> AppResult<Submission<Author>> {
        self.repository.authors.get_by_id(id).await?;
        form.normalize();
        let errors = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Invalid(errors));
        }
        let author = self.repository.authors.update(id, &form).await?;
        tracing::info!(author_id = id, "author updated");
        Ok(Submission::Saved(author))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }
}
