//! Table state owned by the host page

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{SortingState, WireQuery};

/// Page sizes offered by the pagination control
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [25, 50, 75, 100];

/// Page size used when none (or an unsupported one) is requested
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page index accepted from outside input such as a shared URL
pub const MAX_PAGE_INDEX: usize = u32::MAX as usize;

pub fn is_valid_page_size(size: usize) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

/// Canonical page/size/sort/filter/visibility state.
///
/// Changing the page size, the sorting or the filters always returns the
/// page index to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    /// 0-based page index
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: SortingState,
    pub filters: WireQuery,
    #[serde(default)]
    pub column_visibility: BTreeMap<String, bool>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sorting: SortingState::default(),
            filters: WireQuery::empty(),
            column_visibility: BTreeMap::new(),
        }
    }
}

impl TableState {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_sorting(mut self, sorting: SortingState) -> Self {
        self.sorting = sorting;
        self
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    /// Unsupported sizes fall back to `DEFAULT_PAGE_SIZE`
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = if is_valid_page_size(page_size) {
            page_size
        } else {
            tracing::warn!(page_size, "Unsupported page size, using default");
            DEFAULT_PAGE_SIZE
        };
        self.page_index = 0;
    }

    pub fn set_sorting(&mut self, sorting: SortingState) {
        self.sorting = sorting;
        self.page_index = 0;
    }

    pub fn set_filters(&mut self, filters: WireQuery) {
        self.filters = filters;
        self.page_index = 0;
    }

    /// Keep the page index inside `[0, total_pages - 1]`.
    ///
    /// Returns true when the index had to move.
    pub fn clamp_page_index(&mut self, total_pages: usize) -> bool {
        let max_index = total_pages.saturating_sub(1);
        if self.page_index > max_index {
            self.page_index = max_index;
            true
        } else {
            false
        }
    }
}
