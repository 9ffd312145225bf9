//! Page arithmetic for list pages

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// `?page=N` query parameter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number starting at 1, or `last`
    pub page: Option<String>,
}

/// Page selected by a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(i64),
    Last,
}

impl PageQuery {
    pub fn number(&self) -> AppResult<PageNumber> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(PageNumber::Number(1)),
            Some("last") => Ok(PageNumber::Last),
            Some(raw) => raw
                .parse()
                .map(PageNumber::Number)
                .map_err(|_| AppError::NotFound(format!("Invalid page ({})", raw))),
        }
    }
}

/// A requested slice of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            number: page.max(1),
            size: size.max(1),
        }
    }

    /// The final page of a list holding `count` rows
    pub fn last(count: i64, size: i64) -> Self {
        let size = size.max(1);
        Self::new((count + size - 1) / size, size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Pagination metadata exposed to list templates as `page_obj`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, count: i64) -> Self {
        // An empty list still has one (empty) page
        let num_pages = ((count + request.size - 1) / request.size).max(1);
        Self {
            number: request.number,
            num_pages,
            count,
            has_next: request.number < num_pages,
            has_previous: request.number > 1,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}
