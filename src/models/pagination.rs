// src/models/pagination.rs
// DOCUMENTATION: Paginated listing arithmetic and metadata
// PURPOSE: One consistent page/limit/skip computation for every collection

use serde::{Deserialize, Serialize};

/// Raw query-string pagination input
/// DOCUMENTATION: Values arrive as strings so that non-numeric or
/// non-positive input falls back to the defaults instead of failing
/// deserialization with a 400
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Resolve raw input against the configured default limit
    pub fn resolve(&self, default_limit: i64) -> PageParams {
        PageParams {
            page: parse_positive(self.page.as_deref()).unwrap_or(1),
            limit: parse_positive(self.limit.as_deref()).unwrap_or(default_limit),
        }
    }
}

/// Parse a positive integer, rejecting zero, negatives and garbage
fn parse_positive(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v > 0)
}

/// Resolved pagination parameters for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Rows to skip before the requested page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination metadata returned next to every listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    /// Compute metadata for a page of `total` matching rows
    /// DOCUMENTATION: totalPages = ceil(total / limit); a page past the end
    /// is not an error, it just reports hasNextPage = false
    pub fn new(params: PageParams, total: i64) -> Self {
        let total_pages = if total > 0 {
            (total + params.limit - 1) / params.limit
        } else {
            0
        };

        PaginationMeta {
            current_page: params.page,
            total_pages,
            total_items: total,
            items_per_page: params.limit,
            has_next_page: params.page < total_pages,
            has_prev_page: params.page > 1,
        }
    }
}

/// One page of a collection plus its metadata
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        Page {
            items,
            pagination: PaginationMeta::new(params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = query(None, None).resolve(10);
        assert_eq!(params, PageParams { page: 1, limit: 10 });
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_defaults_on_garbage_input() {
        // Non-numeric, zero and negative values all fall back
        assert_eq!(query(Some("abc"), Some("xyz")).resolve(10), PageParams { page: 1, limit: 10 });
        assert_eq!(query(Some("0"), Some("0")).resolve(10), PageParams { page: 1, limit: 10 });
        assert_eq!(query(Some("-3"), Some("-1")).resolve(20), PageParams { page: 1, limit: 20 });
    }

    #[test]
    fn test_explicit_values_win() {
        let params = query(Some("3"), Some("25")).resolve(10);
        assert_eq!(params, PageParams { page: 3, limit: 25 });
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_first_page_of_25() {
        // Scenario: page=1, limit=10, total=25
        let meta = PaginationMeta::new(PageParams { page: 1, limit: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.items_per_page, 10);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_last_page_of_25() {
        // Scenario: page=3, limit=10, total=25
        let meta = PaginationMeta::new(PageParams { page: 3, limit: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn test_empty_collection() {
        let meta = PaginationMeta::new(PageParams { page: 1, limit: 10 }, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn test_page_beyond_last() {
        let meta = PaginationMeta::new(PageParams { page: 7, limit: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
    }

    #[test]
    fn test_exact_multiple_of_limit() {
        let meta = PaginationMeta::new(PageParams { page: 2, limit: 10 }, 20);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_page_window_size() {
        // Slicing an in-memory collection by offset/limit mirrors what
        // LIMIT/OFFSET does in SQL: a full page everywhere except the
        // last, which carries the remainder, and nothing past the end
        let total = 25i64;
        let items: Vec<i64> = (0..total).collect();

        for (page, limit, expected) in
            [(1, 10, 10), (2, 10, 10), (3, 10, 5), (4, 10, 0), (1, 30, 25)]
        {
            let params = PageParams { page, limit };
            let start = params.offset().min(total) as usize;
            let end = (params.offset() + params.limit).min(total) as usize;
            let window = &items[start..end];

            assert_eq!(window.len() as i64, expected, "page={} limit={}", page, limit);
            assert_eq!(
                window.len() as i64,
                params.limit.min((total - params.offset()).max(0))
            );
        }
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 20, 2)] {
            let meta = PaginationMeta::new(PageParams { page: 1, limit }, total);
            assert_eq!(meta.total_pages, expected, "total={} limit={}", total, limit);
        }
    }
}
