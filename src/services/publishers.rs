//! Publishers service

use crate::{
    error::AppResult,
    forms::{CatalogForm, Submission},
    models::{Book, Publisher, PublisherForm},
    pagination::{PageInfo, PageNumber, PageRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
    page_size: i64,
}

impl PublishersService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    pub async fn list(&self, page: PageNumber) -> AppResult<(Vec<Publisher>, PageInfo)> {
        let request = match page {
            PageNumber::Number(number) => PageRequest::new(number, self.page_size),
            PageNumber::Last => {
                let (_, total) = self.repository.publishers.page(0, 0).await?;
                PageRequest::last(total, self.page_size)
            }
        };
        let (rows, total) = self
            .repository
            .publishers
            .page(request.limit(), request.offset())
            .await?;
        Ok((rows, PageInfo::new(request, total)))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await
    }

    /// Books carrying this publisher's imprint
    pub async fn books(&self, id: i32) -> AppResult<Vec<Book>> {
        self.repository.books.list_by_publisher(id).await
    }

    pub async fn create(&self, mut form: PublisherForm) -> AppResult<Submission<Publisher>> {
        form.normalize();
        let errors = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Invalid(errors));
        }
        let publisher = self.repository.publishers.create(&form).await?;
        tracing::info!(publisher_id = publisher.id, "publisher created");
        Ok(Submission::Saved(publisher))
    }

    pub async fn update(&self, id: i32, mut form: PublisherForm) -> AppResult<Submission<Publisher>> {
        // Unknown ids are a 404 even when the form is invalid
        self.repository.publishers.get_by_id(id).await?;
        form.normalize();
        let errors = form.check();
        if !errors.is_empty() {
            return Ok(Submission::Invalid(errors));
        }
        let publisher = self.repository.publishers.update(id, &form).await?;
        tracing::info!(publisher_id = id, "publisher updated");
        Ok(Submission::Saved(publisher))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.publishers.delete(id).await?;
        tracing::info!(publisher_id = id, "publisher deleted");
        Ok(())
    }
}
