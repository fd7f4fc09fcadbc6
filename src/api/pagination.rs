//! Page/size/sort query parameters and the page envelope returned by listings.

use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::error::ApiError;

/// Raw pagination query parameters as they arrive on the request
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

/// Resolved, validated pagination request. `order_by` is always a column name
/// taken from a handler whitelist, never raw client input.
#[derive(Debug)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub order_by: &'static str,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        // resolve() rejects page values whose offset would overflow; saturate
        // anyway so a hand-built request can never panic or go negative
        self.page.saturating_mul(self.size)
    }
}

impl PageParams {
    /// Fill defaults from config, bound the size, and map the sort key through
    /// the handler's whitelist of (key, column) pairs.
    pub fn resolve(&self, sort_keys: &[(&str, &'static str)]) -> Result<PageRequest, ApiError> {
        let settings = &config().pagination;

        let page = self.page.unwrap_or(0);
        if page < 0 {
            return Err(ApiError::bad_request("page must not be negative"));
        }

        let size = self.size.unwrap_or(settings.default_size);
        if size < 1 || size > settings.max_size {
            return Err(ApiError::bad_request(format!(
                "size must be between 1 and {}",
                settings.max_size
            )));
        }

        if page.checked_mul(size).is_none() {
            return Err(ApiError::bad_request("page is out of range"));
        }

        let sort = self.sort.as_deref().unwrap_or(&settings.default_sort);
        let order_by = sort_keys
            .iter()
            .find(|(key, _)| *key == sort)
            .map(|(_, column)| *column)
            .ok_or_else(|| ApiError::bad_request(format!("unsupported sort key: {}", sort)))?;

        Ok(PageRequest { page, size, order_by })
    }
}

/// One page of listing results
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }
}
