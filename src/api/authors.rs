//! Author pages

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use super::{
    render::{form_context, list_context, object_context, Found, RenderDirective},
    AuthenticatedUser, RecordId,
};
use crate::{
    error::AppResult,
    forms::{FormErrors, Submission},
    models::{Author, AuthorForm},
    pagination::PageQuery,
    AppState,
};

const LIST_URL: &str = "/authors/";

/// List authors, ten per page
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "book/author_list.html", body = RenderDirective)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderDirective> {
    let (authors, page) = state.services.authors.list(query.number()?).await?;
    Ok(RenderDirective::new(
        "book/author_list.html",
        list_context("author", &authors, &page),
    ))
}

/// Author details; every view stamps `last_accessed`
#[utoipa::path(
    get,
    path = "/authors/{id}/",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "book/author_detail.html", body = RenderDirective),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let author = state.services.authors.view(id).await?;
    Ok(RenderDirective::new(
        "book/author_detail.html",
        object_context("author", &author),
    ))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/add/",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "book/author_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn new_author(AuthenticatedUser(_claims): AuthenticatedUser) -> RenderDirective {
    RenderDirective::new(
        "book/author_form.html",
        form_context::<_, Author>("author", None, &AuthorForm::default(), &FormErrors::default()),
    )
}

/// Create an author
#[utoipa::path(
    post,
    path = "/add/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the author list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.authors.create(form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => Ok(RenderDirective::new(
            "book/author_form.html",
            form_context::<_, Author>("author", None, &form, &errors),
        )
        .into_response()),
    }
}

/// Author form filled from the stored record
#[utoipa::path(
    get,
    path = "/update/{id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "book/author_update_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn edit_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/author_update_form.html",
        form_context(
            "author",
            Some(&author),
            &AuthorForm::from(&author),
            &FormErrors::default(),
        ),
    ))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/update/{id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the author list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match state.services.authors.update(id, form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => {
            let author = state.services.authors.get_by_id(id).await?;
            Ok(RenderDirective::new(
                "book/author_update_form.html",
                form_context("author", Some(&author), &form, &errors),
            )
            .into_response())
        }
    }
}

/// Delete confirmation page
#[utoipa::path(
    get,
    path = "/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "book/author_confirm_delete.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn confirm_delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/author_confirm_delete.html",
        object_context("author", &author),
    ))
}

/// Delete an author
#[utoipa::path(
    post,
    path = "/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the author list"),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still listed on books")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<Found> {
    state.services.authors.delete(id).await?;
    Ok(Found(LIST_URL.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{DateTime, Utc};

    use crate::{api::test_support::TestApp, forms::TOO_LONG};

    const FORM: &str = "salutation=sir&name=ali&email=shah870%40gmail.com";

    #[tokio::test]
    async fn test_pagination_is_ten() {
        let app = TestApp::new().await;
        for i in 0..15 {
            app.post_auth("/add/", &format!("name=author{}", i)).await;
        }
        let first = app.get("/authors/").await;
        assert_eq!(first.body["template"], "book/author_list.html");
        assert_eq!(first.body["context"]["is_paginated"], true);
        assert_eq!(first.body["context"]["author_list"].as_array().unwrap().len(), 10);

        let second = app.get("/authors/?page=2").await;
        assert_eq!(second.body["context"]["author_list"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_create_redirects_to_list() {
        let app = TestApp::new().await;
        let resp = app.post_auth("/add/", FORM).await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/authors/"));
    }

    #[tokio::test]
    async fn test_create_with_blank_fields_rerenders() {
        let app = TestApp::new().await;
        let resp = app.post_auth("/add/", "salutation=&name=&email=").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/author_form.html");
        assert!(resp.body["context"]["form"]["errors"]["name"].is_array());
        assert_eq!(app.get("/authors/").await.body["context"]["page_obj"]["count"], 0);
    }

    #[tokio::test]
    async fn test_detail_records_access_time() {
        let app = TestApp::new().await;
        app.post_auth("/add/", FORM).await;

        let before = Utc::now();
        let resp = app.get("/authors/1/").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/author_detail.html");

        let stamped: DateTime<Utc> =
            serde_json::from_value(resp.body["context"]["author"]["last_accessed"].clone())
                .unwrap();
        assert!(stamped >= before);

        let stored = app.state.services.authors.get_by_id(1).await.unwrap();
        assert_eq!(stored.last_accessed, Some(stamped));
    }

    #[tokio::test]
    async fn test_detail_unknown_is_not_found() {
        let app = TestApp::new().await;
        assert_eq!(app.get("/authors/5/").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let app = TestApp::new().await;
        app.post_auth("/add/", FORM).await;

        let form = app.get_auth("/update/1/").await;
        assert_eq!(form.status, StatusCode::OK);
        assert_eq!(form.body["template"], "book/author_update_form.html");

        let resp = app.post_auth("/update/1/", "salutation=dr&name=shah").await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/authors/"));

        let author = app.state.services.authors.get_by_id(1).await.unwrap();
        assert_eq!(author.name, "shah");
        assert_eq!(author.salutation, "dr");
    }

    #[tokio::test]
    async fn test_delete_referenced_author_conflicts() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", "name=ali").await;
        app.post_auth("/add/", FORM).await;
        app.post_auth("/bookadd/", "title=python&publisher=1&authors=1").await;

        let resp = app.post_auth("/authors/1/delete/", "").await;
        assert_eq!(resp.status, StatusCode::CONFLICT);
        assert_eq!(app.get("/authors/1/").await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let app = TestApp::new().await;
        app.post_auth("/add/", FORM).await;

        let confirm = app.get_auth("/authors/1/delete/").await;
        assert_eq!(confirm.status, StatusCode::OK);

        let resp = app.post_auth("/authors/1/delete/", "").await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/authors/"));
        assert_eq!(app.get("/authors/").await.body["context"]["page_obj"]["count"], 0);
    }

    #[tokio::test]
    async fn test_anonymous_update_is_rejected() {
        let app = TestApp::new().await;
        app.post_auth("/add/", FORM).await;
        let resp = app.post("/update/1/", "name=changed").await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        let author = app.state.services.authors.get_by_id(1).await.unwrap();
        assert_eq!(author.name, "ali");
    }

    #[tokio::test]
    async fn test_invalid_update_rerenders() {
        let app = TestApp::new().await;
        app.post_auth("/add/", FORM).await;

        let resp = app.post_auth("/update/1/", "salutation=dr&name=").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/author_update_form.html");
        assert!(resp.body["context"]["form"]["errors"]["name"].is_array());
        assert_eq!(resp.body["context"]["author"]["name"], "ali");

        let resp = app
            .post_auth("/update/1/", &format!("name=shah&salutation={}", "d".repeat(256)))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["context"]["form"]["errors"]["salutation"][0], TOO_LONG);

        let author = app.state.services.authors.get_by_id(1).await.unwrap();
        assert_eq!(author.name, "ali");
        assert_eq!(author.salutation, "sir");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = TestApp::new().await;
        assert_eq!(app.get("/authors/abc/").await.status, StatusCode::NOT_FOUND);
    }
}
