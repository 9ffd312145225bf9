//! Publisher pages

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde_json::json;

use super::{
    render::{form_context, list_context, object_context, Found, RenderDirective},
    AuthenticatedUser, RecordId,
};
use crate::{
    error::AppResult,
    forms::{FormErrors, Submission},
    models::{Publisher, PublisherForm},
    pagination::PageQuery,
    AppState,
};

const LIST_URL: &str = "/publishers/";

/// List publishers, ten per page
#[utoipa::path(
    get,
    path = "/publishers/",
    tag = "publishers",
    params(PageQuery),
    responses(
        (status = 200, description = "book/publisher_list.html", body = RenderDirective)
    )
)]
pub async fn list_publishers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderDirective> {
    let (publishers, page) = state.services.publishers.list(query.number()?).await?;
    Ok(RenderDirective::new(
        "book/publisher_list.html",
        list_context("publisher", &publishers, &page),
    ))
}

/// Publisher details with the books it published
#[utoipa::path(
    get,
    path = "/{id}/",
    tag = "publishers",
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "book/publisher_detail.html", body = RenderDirective),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn get_publisher(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let publisher = state.services.publishers.get_by_id(id).await?;
    let books = state.services.publishers.books(id).await?;
    let mut context = object_context("publisher", &publisher);
    context["book_list"] = json!(books);
    Ok(RenderDirective::new("book/publisher_detail.html", context))
}

/// Empty publisher form
#[utoipa::path(
    get,
    path = "/publisheradd/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "book/publisher_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn new_publisher(AuthenticatedUser(_claims): AuthenticatedUser) -> RenderDirective {
    RenderDirective::new(
        "book/publisher_form.html",
        form_context::<_, Publisher>(
            "publisher",
            None,
            &PublisherForm::default(),
            &FormErrors::default(),
        ),
    )
}

/// Create a publisher
#[utoipa::path(
    post,
    path = "/publisheradd/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body(content = PublisherForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the publisher list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn create_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Form(form): Form<PublisherForm>,
) -> AppResult<Response> {
    match state.services.publishers.create(form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => Ok(RenderDirective::new(
            "book/publisher_form.html",
            form_context::<_, Publisher>("publisher", None, &form, &errors),
        )
        .into_response()),
    }
}

/// Publisher form filled from the stored record
#[utoipa::path(
    get,
    path = "/publisherupdate/{id}/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "book/publisher_update_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn edit_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let publisher = state.services.publishers.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/publisher_update_form.html",
        form_context(
            "publisher",
            Some(&publisher),
            &PublisherForm::from(&publisher),
            &FormErrors::default(),
        ),
    ))
}

/// Update a publisher
#[utoipa::path(
    post,
    path = "/publisherupdate/{id}/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    request_body(content = PublisherForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the publisher list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn update_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
    Form(form): Form<PublisherForm>,
) -> AppResult<Response> {
    match state.services.publishers.update(id, form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => {
            let publisher = state.services.publishers.get_by_id(id).await?;
            Ok(RenderDirective::new(
                "book/publisher_update_form.html",
                form_context("publisher", Some(&publisher), &form, &errors),
            )
            .into_response())
        }
    }
}

/// Delete confirmation page
#[utoipa::path(
    get,
    path = "/publisher/{id}/delete/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "book/publisher_confirm_delete.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn confirm_delete_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let publisher = state.services.publishers.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/publisher_confirm_delete.html",
        object_context("publisher", &publisher),
    ))
}

/// Delete a publisher
#[utoipa::path(
    post,
    path = "/publisher/{id}/delete/",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the publisher list"),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Publisher not found"),
        (status = 409, description = "Publisher still has books")
    )
)]
pub async fn delete_publisher(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<Found> {
    state.services.publishers.delete(id).await?;
    Ok(Found(LIST_URL.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{api::test_support::TestApp, forms::TOO_LONG};

    const FULL_FORM: &str = "name=ali&address=ryk&city=bwp&state_province=punjab\
        &country=pak&website=https%3A%2F%2Fwww.google.com%2F";

    async fn seed(app: &TestApp, count: usize) {
        for i in 0..count {
            let resp = app
                .post_auth("/publisheradd/", &format!("name=publisher{}", i))
                .await;
            assert_eq!(resp.status, StatusCode::FOUND);
        }
    }

    #[tokio::test]
    async fn test_list_renders_template() {
        let app = TestApp::new().await;
        let resp = app.get("/publishers/").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/publisher_list.html");
        assert_eq!(resp.body["context"]["is_paginated"], false);
    }

    #[tokio::test]
    async fn test_pagination_is_ten() {
        let app = TestApp::new().await;
        seed(&app, 15).await;

        let resp = app.get("/publishers/").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["context"]["is_paginated"], true);
        assert_eq!(
            resp.body["context"]["publisher_list"].as_array().unwrap().len(),
            10
        );

        let resp = app.get("/publishers/?page=2").await;
        assert_eq!(resp.body["context"]["is_paginated"], true);
        assert_eq!(
            resp.body["context"]["publisher_list"].as_array().unwrap().len(),
            5
        );
        assert_eq!(resp.body["context"]["publisher_list"][0]["name"], "publisher10");
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let app = TestApp::new().await;
        seed(&app, 3).await;
        let resp = app.get("/publishers/?page=7").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body["context"]["publisher_list"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_redirects_to_list() {
        let app = TestApp::new().await;
        let resp = app.post_auth("/publisheradd/", FULL_FORM).await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/publishers/"));

        let list = app.get("/publishers/").await;
        assert_eq!(list.body["context"]["publisher_list"][0]["city"], "bwp");
    }

    #[tokio::test]
    async fn test_create_without_name_rerenders() {
        let app = TestApp::new().await;
        let resp = app.post_auth("/publisheradd/", "name=&city=bwp").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/publisher_form.html");
        assert_eq!(resp.body["context"]["form"]["data"]["city"], "bwp");
        assert_eq!(
            resp.body["context"]["form"]["errors"]["name"][0],
            "This field is required."
        );

        let list = app.get("/publishers/").await;
        assert_eq!(list.body["context"]["page_obj"]["count"], 0);
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;

        let form = app.get_auth("/publisherupdate/1/").await;
        assert_eq!(form.status, StatusCode::OK);
        assert_eq!(form.body["context"]["form"]["data"]["address"], "ryk");

        let resp = app
            .post_auth("/publisherupdate/1/", "name=ali&address=new+blog")
            .await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/publishers/"));

        let detail = app.get("/1/").await;
        assert_eq!(detail.body["context"]["publisher"]["address"], "new blog");
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let app = TestApp::new().await;
        let resp = app.post_auth("/publisherupdate/42/", "name=x").await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;

        let confirm = app.get_auth("/publisher/1/delete/").await;
        assert_eq!(confirm.status, StatusCode::OK);
        assert_eq!(confirm.body["template"], "book/publisher_confirm_delete.html");

        let resp = app.post_auth("/publisher/1/delete/", "").await;
        assert_eq!(resp.status, StatusCode::FOUND);
        assert_eq!(resp.location.as_deref(), Some("/publishers/"));
        assert_eq!(app.get("/1/").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_anonymous_writes_are_rejected() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;

        assert_eq!(app.post("/publisheradd/", FULL_FORM).await.status, StatusCode::FORBIDDEN);
        assert_eq!(app.get("/publisherupdate/1/").await.status, StatusCode::FORBIDDEN);
        assert_eq!(
            app.post("/publisherupdate/1/", "name=changed").await.status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(app.get("/publisher/1/delete/").await.status, StatusCode::FORBIDDEN);
        assert_eq!(app.post("/publisher/1/delete/", "").await.status, StatusCode::FORBIDDEN);

        let detail = app.get("/1/").await;
        assert_eq!(detail.body["context"]["publisher"]["name"], "ali");
        assert_eq!(app.get("/publishers/").await.body["context"]["page_obj"]["count"], 1);
    }

    #[tokio::test]
    async fn test_detail_lists_books() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;
        app.post_auth("/add/", "name=shah").await;
        app.post_auth("/bookadd/", "title=python&publisher=1&authors=1").await;

        let detail = app.get("/1/").await;
        assert_eq!(detail.status, StatusCode::OK);
        assert_eq!(detail.body["template"], "book/publisher_detail.html");
        assert_eq!(detail.body["context"]["book_list"][0]["title"], "python");
    }

    #[tokio::test]
    async fn test_last_page() {
        let app = TestApp::new().await;
        seed(&app, 15).await;

        let resp = app.get("/publishers/?page=last").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["context"]["page_obj"]["number"], 2);
        assert_eq!(
            resp.body["context"]["publisher_list"].as_array().unwrap().len(),
            5
        );

        assert_eq!(app.get("/publishers/?page=first").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_overlong_name_rerenders() {
        let app = TestApp::new().await;
        let resp = app
            .post_auth("/publisheradd/", &format!("name={}", "x".repeat(256)))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/publisher_form.html");
        assert_eq!(resp.body["context"]["form"]["errors"]["name"][0], TOO_LONG);
        assert_eq!(app.get("/publishers/").await.body["context"]["page_obj"]["count"], 0);

        let resp = app
            .post_auth("/publisheradd/", &format!("name={}", "x".repeat(255)))
            .await;
        assert_eq!(resp.status, StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_invalid_update_rerenders() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;

        let resp = app.post_auth("/publisherupdate/1/", "name=&address=zzz").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["template"], "book/publisher_update_form.html");
        assert!(resp.body["context"]["form"]["errors"]["name"].is_array());
        assert_eq!(resp.body["context"]["form"]["data"]["address"], "zzz");

        let publisher = app.state.services.publishers.get_by_id(1).await.unwrap();
        assert_eq!(publisher.name, "ali");
        assert_eq!(publisher.address, "ryk");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = TestApp::new().await;
        app.post_auth("/publisheradd/", FULL_FORM).await;
        assert_eq!(app.get("/abc/").await.status, StatusCode::NOT_FOUND);
        assert_eq!(
            app.get_auth("/publisherupdate/abc/").await.status,
            StatusCode::NOT_FOUND
        );
    }
}
