//! Book pages

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
    models::{Book, BookForm},
    pagination::PageQuery,
    AppState,
};

const LIST_URL: &str = "/books/";

/// List books, ten per page
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "book/book_list.html", body = RenderDirective)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderDirective> {
    let (books, page) = state.services.books.list(query.number()?).await?;
    Ok(RenderDirective::new(
        "book/book_list.html",
        list_context("book", &books, &page),
    ))
}

/// Book details with publisher and authors; every view stamps `last_accessed`
#[utoipa::path(
    get,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book/book_detail.html", body = RenderDirective),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let book = state.services.books.view(id).await?;
    Ok(RenderDirective::new(
        "book/book_detail.html",
        object_context("book", &book),
    ))
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/bookadd/",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "book/book_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn new_book(AuthenticatedUser(_claims): AuthenticatedUser) -> RenderDirective {
    RenderDirective::new(
        "book/book_form.html",
        form_context::<_, Book>("book", None, &BookForm::default(), &FormErrors::default()),
    )
}

/// Create a book
#[utoipa::path(
    post,
    path = "/bookadd/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the book list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => Ok(RenderDirective::new(
            "book/book_form.html",
            form_context::<_, Book>("book", None, &form, &errors),
        )
        .into_response()),
    }
}

/// Book form filled from the stored record
#[utoipa::path(
    get,
    path = "/bookupdate/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book/book_update_form.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/book_update_form.html",
        form_context("book", Some(&book), &BookForm::from(&book), &FormErrors::default()),
    ))
}

/// Update a book
#[utoipa::path(
    post,
    path = "/bookupdate/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the book list"),
        (status = 200, description = "Invalid form, rendered again", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.update(id, form.clone()).await? {
        Submission::Saved(_) => Ok(Found(LIST_URL.to_string()).into_response()),
        Submission::Invalid(errors) => {
            let book = state.services.books.get_by_id(id).await?;
            Ok(RenderDirective::new(
                "book/book_update_form.html",
                form_context("book", Some(&book), &form, &errors),
            )
            .into_response())
        }
    }
}

/// Delete confirmation page
#[utoipa::path(
    get,
    path = "/book/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "book/book_confirm_delete.html", body = RenderDirective),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn confirm_delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<RenderDirective> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(RenderDirective::new(
        "book/book_confirm_delete.html",
        object_context("book", &book),
    ))
}

/// Delete a book
#[utoipa::path(
    post,
    path = "/book/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the book list"),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<Found> {
    state.services.books.delete(id).await?;
    Ok(Found(LIST_URL.to_string()))
}
