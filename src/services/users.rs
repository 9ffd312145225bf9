//! Authentication service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{SessionClaims, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by username and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!(username, "rejected login");
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = user.id, "user logged in");
        Ok((token, user))
    }

    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        SessionClaims::new(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Check a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Create a user with a freshly hashed password
    pub async fn create_user(&self, username: &str, password: &str) -> AppResult<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        let hash = self.hash_password(password)?;
        self.repository.users.create(username, &hash).await
    }

    /// Create the configured admin account unless it already exists
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let (Some(username), Some(password)) =
            (&self.config.admin_username, &self.config.admin_password)
        else {
            return Ok(());
        };

        if self.repository.users.get_by_username(username).await?.is_some() {
            return Ok(());
        }

        let user = self.create_user(username, password).await?;
        tracing::info!(user_id = user.id, username = %user.username, "admin account created");
        Ok(())
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
