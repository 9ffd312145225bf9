//! Landing page

use serde_json::json;

use super::render::RenderDirective;

/// Home page
#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses(
        (status = 200, description = "Home page", body = RenderDirective)
    )
)]
pub async fn home() -> RenderDirective {
    RenderDirective::new("book/home.html", json!({}))
}
