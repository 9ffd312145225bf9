//! Login endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::render::RenderDirective;
use crate::{error::AppResult, AppState};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub username: String,
}

/// Login page
#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "auth",
    responses(
        (status = 200, description = "Login form", body = RenderDirective)
    )
)]
pub async fn login_page() -> RenderDirective {
    RenderDirective::new("registration/login.html", json!({}))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 403, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::api::test_support::TestApp;

    async fn login(app: &TestApp, password: &str) -> StatusCode {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/accounts/login/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(
                r#"{{"username": "john", "password": "{}"}}"#,
                password
            )))
            .unwrap();
        app.router.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_login_success() {
        let app = TestApp::new().await;
        assert_eq!(login(&app, "123").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = TestApp::new().await;
        assert_eq!(login(&app, "wrong").await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let app = TestApp::new().await;
        let resp = app.get("/accounts/login/").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "registration/login.html");
    }
}
