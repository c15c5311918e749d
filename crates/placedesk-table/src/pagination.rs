//! Page navigation rules
//!
//! `Pagination` is a read-only view over the controller's page index and the
//! host-reported page count. Navigation methods return the target index, or
//! `None` when the control is disabled.

pub use placedesk_core::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, is_valid_page_size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page_index: usize, page_size: usize, total_pages: usize) -> Self {
        Self {
            page_index,
            page_size,
            total_pages,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page_index.saturating_add(1) < self.total_pages
    }

    pub fn first(&self) -> Option<usize> {
        self.can_go_previous().then_some(0)
    }

    pub fn previous(&self) -> Option<usize> {
        self.can_go_previous().then(|| self.page_index - 1)
    }

    pub fn next(&self) -> Option<usize> {
        self.can_go_next().then(|| self.page_index.saturating_add(1))
    }

    pub fn last(&self) -> Option<usize> {
        self.can_go_next().then(|| self.total_pages - 1)
    }

    /// Nearest valid index for `page_index`
    pub fn clamp(&self, page_index: usize) -> usize {
        page_index.min(self.total_pages.saturating_sub(1))
    }

    /// Footer label, e.g. `"2 of 5"`
    pub fn label(&self) -> String {
        format!(
            "{} of {}",
            self.page_index.saturating_add(1),
            self.total_pages.max(1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_disables_back_controls() {
        let pagination = Pagination::new(0, 25, 4);
        assert_eq!(pagination.first(), None);
        assert_eq!(pagination.previous(), None);
        assert_eq!(pagination.next(), Some(1));
        assert_eq!(pagination.last(), Some(3));
    }

    #[test]
    fn test_last_page_disables_forward_controls() {
        let pagination = Pagination::new(3, 25, 4);
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.last(), None);
        assert_eq!(pagination.previous(), Some(2));
        assert_eq!(pagination.first(), Some(0));
        assert_eq!(pagination.label(), "4 of 4");
    }

    #[test]
    fn test_index_past_end_does_not_overflow() {
        let pagination = Pagination::new(usize::MAX, 25, 10);
        assert!(!pagination.can_go_next());
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.previous(), Some(usize::MAX - 1));
        assert_eq!(pagination.label(), format!("{} of 10", usize::MAX));
    }

    #[test]
    fn test_no_pages() {
        let pagination = Pagination::new(0, 25, 0);
        assert!(!pagination.can_go_next());
        assert!(!pagination.can_go_previous());
        assert_eq!(pagination.clamp(7), 0);
        assert_eq!(pagination.label(), "1 of 1");
    }

    #[test]
    fn test_page_size_options() {
        assert_eq!(PAGE_SIZE_OPTIONS, [25, 50, 75, 100]);
        assert!(is_valid_page_size(75));
        assert!(!is_valid_page_size(10));
    }
}
