//! Events emitted by the data table

use std::collections::BTreeMap;

use placedesk_core::{SortingState, TableState, WireQuery};

/// State changes the host applies to its canonical `TableState` before
/// re-fetching.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    /// The page index changed (0-based)
    PageIndexChanged(usize),
    /// Rows per page changed
    PageSizeChanged(usize),
    /// Sort specification changed
    SortingChanged(SortingState),
    /// Filters were applied or cleared
    FiltersChanged(WireQuery),
    /// A column was shown or hidden
    ColumnVisibilityChanged(BTreeMap<String, bool>),
}

impl TableEvent {
    /// Apply this change to a host-owned state
    pub fn apply_to(&self, state: &mut TableState) {
        match self {
            Self::PageIndexChanged(page_index) => state.set_page_index(*page_index),
            Self::PageSizeChanged(page_size) => state.set_page_size(*page_size),
            Self::SortingChanged(sorting) => state.set_sorting(sorting.clone()),
            Self::FiltersChanged(filters) => state.set_filters(filters.clone()),
            Self::ColumnVisibilityChanged(visibility) => {
                state.column_visibility = visibility.clone();
            }
        }
    }

    /// Whether the host must re-fetch after applying this event
    pub fn requires_fetch(&self) -> bool {
        !matches!(self, Self::ColumnVisibilityChanged(_))
    }
}
