//! Books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookData},
};

/// Book columns plus the sorted author ids from the join table
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.publisher_id, b.publication_date, b.last_accessed,
           ARRAY(SELECT ba.author_id FROM book_authors ba
                 WHERE ba.book_id = b.id ORDER BY ba.author_id) AS author_ids
    FROM books b
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn replace_authors(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        author_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(book_id)
        .bind(author_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// A reference that vanished between validation and the write
fn reference_error(err: AppError) -> AppError {
    match err {
        AppError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            AppError::Integrity("Book references a publisher or author that no longer exists".to_string())
        }
        other => other,
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Book>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY b.id LIMIT $1 OFFSET $2", BOOK_SELECT);
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1", BOOK_SELECT);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn touch(&self, id: i32) -> AppResult<Book> {
        let result = sqlx::query("UPDATE books SET last_accessed = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.get_by_id(id).await
    }

    async fn list_by_publisher(&self, publisher_id: i32) -> AppResult<Vec<Book>> {
        let query = format!("{} WHERE b.publisher_id = $1 ORDER BY b.id", BOOK_SELECT);
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(publisher_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, publisher_id, publication_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(data.publisher_id)
        .bind(data.publication_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| reference_error(e.into()))?;

        Self::replace_authors(&mut tx, id, &data.author_ids)
            .await
            .map_err(reference_error)?;

        tx.commit().await?;
        self.get_by_id(id).await
    }

    async fn update(&self, id: i32, data: &BookData) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books SET title = $1, publisher_id = $2, publication_date = $3
            WHERE id = $4
            "#,
        )
        .bind(&data.title)
        .bind(data.publisher_id)
        .bind(data.publication_date)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| reference_error(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        Self::replace_authors(&mut tx, id, &data.author_ids)
            .await
            .map_err(reference_error)?;

        tx.commit().await?;
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // Join rows go with the book (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
