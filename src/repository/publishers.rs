//! Publishers repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{restrict_violation, PublisherStore};
use crate::{
    error::{AppError, AppResult},
    models::{Publisher, PublisherForm},
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PublisherStore for PublishersRepository {
    async fn page(&self, limit: i64, offset: i64) -> AppResult<(Vec<Publisher>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM publishers")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Publisher>(
            "SELECT * FROM publishers ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Publisher {} not found", id)))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM publishers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found)
    }

    async fn create(&self, data: &PublisherForm) -> AppResult<Publisher> {
        let row = sqlx::query_as::<_, Publisher>(
            r#"
            INSERT INTO publishers (name, address, city, state_province, country, website)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state_province)
        .bind(&data.country)
        .bind(&data.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, data: &PublisherForm) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers
            SET name = $1, address = $2, city = $3, state_province = $4, country = $5, website = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state_province)
        .bind(&data.country)
        .bind(&data.website)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publisher {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| restrict_violation(e, &format!("Publisher {}", id)))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Publisher {} not found", id)));
        }
        Ok(())
    }
}
