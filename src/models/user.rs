//! User model and session claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff account allowed to edit the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// JWT claims identifying an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &User, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + (lifetime_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: "john".into(),
            password: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip_keeps_identity() {
        let claims = SessionClaims::new(&user(), 1);
        let token = claims.create_token("secret").unwrap();
        let parsed = SessionClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.sub, "john");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionClaims::new(&user(), 1).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = SessionClaims::new(&user(), 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = claims.create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }
}
