//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{restrict_violation, AuthorStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM authors")
            .fetch_one(&self.pool)
            .await?;

        let rows =
            sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY id LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

        Ok((rows, total))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn touch(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET last_accessed = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Author>> {
        let rows =
            sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn create(&self, data: &AuthorForm) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (salutation, name, email)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.salutation)
        .bind(&data.name)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, data: &AuthorForm) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET salutation = $1, name = $2, email = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&data.salutation)
        .bind(&data.name)
        .bind(&data.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| restrict_violation(e, &format!("Author {}", id)))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
