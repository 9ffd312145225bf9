//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, home, publishers, render};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Publisher, author and book catalog pages",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Pages
        home::home,
        auth::login_page,
        auth::login,
        // Publishers
        publishers::list_publishers,
        publishers::get_publisher,
        publishers::new_publisher,
        publishers::create_publisher,
        publishers::edit_publisher,
        publishers::update_publisher,
        publishers::confirm_delete_publisher,
        publishers::delete_publisher,
        // Books
        books::list_books,
        books::get_book,
        books::new_book,
        books::create_book,
        books::edit_book,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::new_author,
        authors::create_author,
        authors::edit_author,
        authors::update_author,
        authors::confirm_delete_author,
        authors::delete_author,
    ),
    components(
        schemas(
            render::RenderDirective,
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::Publisher,
            crate::models::PublisherForm,
            crate::models::Author,
            crate::models::AuthorForm,
            crate::models::Book,
            crate::models::BookForm,
            crate::models::BookDetails,
            crate::pagination::PageInfo,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pages", description = "Landing page"),
        (name = "auth", description = "Login"),
        (name = "publishers", description = "Publisher pages"),
        (name = "books", description = "Book pages"),
        (name = "authors", description = "Author pages")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
