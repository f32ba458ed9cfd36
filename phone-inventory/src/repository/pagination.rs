//! Page-number pagination for repository listings
//!
//! # Example
//!
//! ```rust
//! use phone_inventory::repository::{Page, Pagination};
//!
//! let pagination = Pagination::page(4, 3);
//! assert_eq!(pagination.offset, 9);
//!
//! let page = Page::new(vec!["tenth"], &pagination, 10);
//! assert_eq!(page.total_pages, 4);
//! ```

use serde::Serialize;

/// Fixed page size of the phone listing
pub const PER_PAGE: u64 = 3;

/// Pagination window for a listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page number (1-indexed)
    pub page: u64,
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Window for a page number (1-indexed); page 0 is treated as page 1
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let page = if page_number == 0 { 1 } else { page_number };
        Self {
            page,
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// Window for a raw `?page=` query value.
    ///
    /// Anything that is not a positive integer falls back to page 1.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .map(str::trim)
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .map_or(1, |n| n as u64);
        Self::page(page, PER_PAGE)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::page(1, PER_PAGE)
    }
}

/// One page of results plus the numbers needed to walk the rest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page. `total_pages` is never below 1, so an empty table
    /// still reports a single (empty) page.
    pub fn new(items: Vec<T>, pagination: &Pagination, total_items: u64) -> Self {
        Self {
            items,
            current_page: pagination.page,
            total_pages: calculate_total_pages(total_items, pagination.limit),
            total_items,
            per_page: pagination.limit,
        }
    }
}

fn calculate_total_pages(total: u64, per_page: u64) -> u64 {
    let per_page = per_page.max(1);
    total.div_ceil(per_page).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Pagination::page(1, 3).offset, 0);
        assert_eq!(Pagination::page(2, 3).offset, 3);
        assert_eq!(Pagination::page(4, 3).offset, 9);
        assert_eq!(Pagination::page(4, 3).limit, 3);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let pagination = Pagination::page(0, 3);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let pagination = Pagination::page(u64::MAX, 3);
        assert_eq!(pagination.offset, u64::MAX);
    }

    #[test]
    fn test_from_query() {
        assert_eq!(Pagination::from_query(None).page, 1);
        assert_eq!(Pagination::from_query(Some("2")).page, 2);
        assert_eq!(Pagination::from_query(Some(" 3 ")).page, 3);
        assert_eq!(Pagination::from_query(Some("0")).page, 1);
        assert_eq!(Pagination::from_query(Some("-4")).page, 1);
        assert_eq!(Pagination::from_query(Some("abc")).page, 1);
        assert_eq!(Pagination::from_query(Some("2.5")).page, 1);
        assert_eq!(Pagination::from_query(Some("2")).limit, PER_PAGE);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(calculate_total_pages(10, 3), 4);
        assert_eq!(calculate_total_pages(9, 3), 3);
        assert_eq!(calculate_total_pages(1, 3), 1);
        assert_eq!(calculate_total_pages(0, 3), 1);
    }

    #[test]
    fn test_page_serializes_listing_shape() {
        let page = Page::new(vec![1, 2, 3], &Pagination::page(1, 3), 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["current_page"], 1);
        assert_eq!(json["total_pages"], 4);
        assert_eq!(json["total_items"], 10);
        assert_eq!(json["per_page"], 3);
    }
}
