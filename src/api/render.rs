//! Render directives and redirects
//!
//! Pages are answered with the template to render and its context; turning
//! that into HTML is left to the front end.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use crate::{forms::FormErrors, pagination::PageInfo};

/// Template name plus the context it is rendered with
#[derive(Debug, Serialize, ToSchema)]
pub struct RenderDirective {
    pub template: String,
    #[schema(value_type = Object)]
    pub context: Value,
}

impl RenderDirective {
    pub fn new(template: &str, context: Value) -> Self {
        Self {
            template: template.to_string(),
            context,
        }
    }
}

impl IntoResponse for RenderDirective {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `302 Found` to another page
#[derive(Debug)]
pub struct Found(pub String);

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, self.0)]).into_response()
    }
}

/// Context of a list page: `<name>_list`, `is_paginated` and `page_obj`
pub fn list_context<T: Serialize>(name: &str, rows: &[T], page: &PageInfo) -> Value {
    let mut context = Map::new();
    context.insert(format!("{}_list", name), json!(rows));
    context.insert("is_paginated".to_string(), json!(page.is_paginated()));
    context.insert("page_obj".to_string(), json!(page));
    Value::Object(context)
}

/// Context of a detail or confirmation page: the record as `object` and `<name>`
pub fn object_context<T: Serialize>(name: &str, object: &T) -> Value {
    let mut context = Map::new();
    context.insert("object".to_string(), json!(object));
    context.insert(name.to_string(), json!(object));
    Value::Object(context)
}

/// Context of a form page, optionally bound to an existing record
pub fn form_context<F: Serialize, T: Serialize>(
    name: &str,
    object: Option<&T>,
    form: &F,
    errors: &FormErrors,
) -> Value {
    let mut context = match object {
        Some(object) => object_context(name, object),
        None => json!({}),
    };
    context["form"] = json!({ "data": form, "errors": errors });
    context
}
