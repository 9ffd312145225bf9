//! Users repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserStore;
use crate::{error::AppResult, models::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING *",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
