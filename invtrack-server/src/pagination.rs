//! Page window for the inventory listing
//!
//! Clients may ask for any page number and page size; both are clamped so
//! the response always describes a real window over the filtered results.

/// Rows per page when the client does not ask for a size
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page a client can request
pub const MAX_PAGE_SIZE: i64 = 500;

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number, within `[1, max(total_pages, 1)]`
    pub number: i64,
    /// Rows per page, within `[1, MAX_PAGE_SIZE]`
    pub size: i64,
    pub total_pages: i64,
    /// Rows to skip before this page
    pub offset: i64,
}

impl Page {
    pub fn new(total_results: i64, requested_page: Option<i64>, requested_size: Option<i64>) -> Self {
        let size = requested_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let total_results = total_results.max(0);
        let total_pages = (total_results + size - 1) / size;
        let number = requested_page.unwrap_or(1).clamp(1, total_pages.max(1));

        Page {
            number,
            size,
            total_pages,
            offset: (number - 1) * size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_requested() {
        let page = Page::new(120, None, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_client_page_size() {
        let page = Page::new(25, Some(3), Some(10));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(Page::new(10_000, None, Some(100_000)).size, MAX_PAGE_SIZE);
        assert_eq!(Page::new(10, None, Some(0)).size, 1);
        assert_eq!(Page::new(10, None, Some(-5)).size, 1);
    }

    #[test]
    fn test_page_number_clamped_to_window() {
        let past_end = Page::new(30, Some(7), Some(20));
        assert_eq!(past_end.number, 2);
        assert_eq!(past_end.offset, 20);

        let before_start = Page::new(30, Some(0), Some(20));
        assert_eq!(before_start.number, 1);
    }

    #[test]
    fn test_empty_results_still_page_one() {
        let page = Page::new(0, Some(4), None);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.offset, 0);
    }
}
