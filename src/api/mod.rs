//! HTTP handlers and routing for the catalog pages

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod home;
pub mod openapi;
pub mod publishers;
pub mod render;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    routing::get,
    RequestPartsExt, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::SessionClaims, AppState};

/// Extractor for an authenticated session from a bearer token
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Authentication("Login required".to_string()))?;

        let claims = state.services.users.verify_token(bearer.token())?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Record id taken from the path; a non-integer id names no record
pub struct RecordId(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::NotFound(rejection.body_text()))?;
        Ok(RecordId(id))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/", get(home::home))
        // Publishers
        .route("/publishers/", get(publishers::list_publishers))
        .route(
            "/publisheradd/",
            get(publishers::new_publisher).post(publishers::create_publisher),
        )
        .route(
            "/publisherupdate/:id/",
            get(publishers::edit_publisher).post(publishers::update_publisher),
        )
        .route(
            "/publisher/:id/delete/",
            get(publishers::confirm_delete_publisher).post(publishers::delete_publisher),
        )
        .route("/:id/", get(publishers::get_publisher))
        // Books
        .route("/books/", get(books::list_books))
        .route("/bookadd/", get(books::new_book).post(books::create_book))
        .route(
            "/bookupdate/:id/",
            get(books::edit_book).post(books::update_book),
        )
        .route(
            "/book/:id/delete/",
            get(books::confirm_delete_book).post(books::delete_book),
        )
        .route("/books/:id/", get(books::get_book))
        // Authors
        .route("/authors/", get(authors::list_authors))
        .route("/authors/:id/", get(authors::get_author))
        .route("/add/", get(authors::new_author).post(authors::create_author))
        .route(
            "/update/:id/",
            get(authors::edit_author).post(authors::update_author),
        )
        .route(
            "/authors/:id/delete/",
            get(authors::confirm_delete_author).post(authors::delete_author),
        )
        // Accounts
        .route("/accounts/login/", get(auth::login_page).post(auth::login))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(pages)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process app over the memory store, driven with `oneshot`

    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{config::AppConfig, repository::Repository, services::Services, AppState};

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub token: String,
    }

    pub struct TestResponse {
        pub status: StatusCode,
        pub location: Option<String>,
        pub body: Value,
    }

    impl TestApp {
        pub async fn new() -> Self {
            let config = AppConfig::default();
            let services = Services::new(
                Repository::in_memory(),
                config.auth.clone(),
                config.catalog.clone(),
            );
            services.users.create_user("john", "123").await.unwrap();
            let (token, _) = services.users.authenticate("john", "123").await.unwrap();
            let state = AppState {
                config: Arc::new(config),
                services: Arc::new(services),
            };
            Self {
                router: super::create_router(state.clone()),
                state,
                token,
            }
        }

        pub async fn get(&self, uri: &str) -> TestResponse {
            self.send(Method::GET, uri, None, false).await
        }

        pub async fn get_auth(&self, uri: &str) -> TestResponse {
            self.send(Method::GET, uri, None, true).await
        }

        pub async fn post(&self, uri: &str, form: &str) -> TestResponse {
            self.send(Method::POST, uri, Some(form), false).await
        }

        pub async fn post_auth(&self, uri: &str, form: &str) -> TestResponse {
            self.send(Method::POST, uri, Some(form), true).await
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            form: Option<&str>,
            authenticated: bool,
        ) -> TestResponse {
            let mut builder = Request::builder().method(method).uri(uri);
            if authenticated {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
            }
            let body = match form {
                Some(form) => {
                    builder = builder.header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    );
                    Body::from(form.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();

            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

            TestResponse {
                status,
                location,
                body,
            }
        }
    }
}
