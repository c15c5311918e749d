//! URL query-string synchronisation
//!
//! Table state round-trips through four query parameters: `page` (0-based
//! index), `size`, `sort` (JSON array of `{id, desc}`) and `filters` (JSON
//! wire query). Parameters the table does not own are preserved.

use placedesk_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_INDEX, SortingState, TableState, WireQuery};
use url::form_urlencoded;

pub const PAGE_PARAM: &str = "page";
pub const SIZE_PARAM: &str = "size";
pub const SORT_PARAM: &str = "sort";
pub const FILTERS_PARAM: &str = "filters";

/// How a URL update is recorded in the browser history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Adds a history entry
    Push,
    /// Rewrites the current entry
    Replace,
}

/// Read/write access to the current location's query string
pub trait QuerySync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    /// Publish pending changes to the location
    fn commit(&mut self, navigation: Navigation);
}

/// A committed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub query: String,
    pub navigation: Navigation,
}

/// In-memory location query with a navigation history
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    params: Vec<(String, String)>,
    history: Vec<NavigationEntry>,
}

impl LocationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string; a leading `?` is ignored
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            params: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            history: Vec::new(),
        }
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    pub fn history(&self) -> &[NavigationEntry] {
        &self.history
    }

    pub fn last_navigation(&self) -> Option<Navigation> {
        self.history.last().map(|entry| entry.navigation)
    }
}

impl QuerySync for LocationQuery {
    fn get(&self, key: &str) -> Option<String> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    fn commit(&mut self, navigation: Navigation) {
        let query = self.to_query_string();
        tracing::debug!(%query, ?navigation, "Committing location query");
        self.history.push(NavigationEntry { query, navigation });
    }
}

pub fn write_pagination(query: &mut dyn QuerySync, page_index: usize, page_size: usize) {
    query.set(PAGE_PARAM, &page_index.to_string());
    query.set(SIZE_PARAM, &page_size.to_string());
}

pub fn write_sorting(query: &mut dyn QuerySync, sorting: &SortingState) {
    query.set(SORT_PARAM, &sorting.to_json_string());
}

pub fn write_filters(query: &mut dyn QuerySync, filters: &WireQuery) {
    query.set(FILTERS_PARAM, &filters.to_json_string());
}

pub fn clear_filters(query: &mut dyn QuerySync) {
    query.remove(FILTERS_PARAM);
}

/// Seed table state from the query string.
///
/// Missing parameters keep the values from `defaults`. Unparseable numbers
/// and malformed JSON are logged and replaced by the default.
pub fn read_table_state(query: &dyn QuerySync, defaults: TableState) -> TableState {
    let mut state = defaults;

    if let Some(page) = query.get(PAGE_PARAM) {
        match page.parse::<usize>() {
            Ok(page_index) if page_index <= MAX_PAGE_INDEX => state.page_index = page_index,
            Ok(page_index) => tracing::warn!(page_index, "Ignoring out-of-range page parameter"),
            Err(error) => tracing::warn!(%page, %error, "Ignoring malformed page parameter"),
        }
    }

    if let Some(size) = query.get(SIZE_PARAM) {
        match size.parse::<usize>() {
            Ok(page_size) => {
                let page_index = state.page_index;
                state.set_page_size(page_size);
                state.page_index = page_index;
            }
            Err(error) => {
                tracing::warn!(%size, %error, "Ignoring malformed size parameter");
                state.page_size = DEFAULT_PAGE_SIZE;
            }
        }
    }

    if let Some(sort) = query.get(SORT_PARAM) {
        match SortingState::from_json_str(&sort) {
            Ok(sorting) => state.sorting = sorting,
            Err(error) => {
                tracing::warn!(%sort, %error, "Ignoring malformed sort parameter");
                state.sorting = SortingState::default();
            }
        }
    }

    if let Some(filters) = query.get(FILTERS_PARAM) {
        match WireQuery::from_json_str(&filters) {
            Ok(parsed) => state.filters = parsed,
            Err(error) => {
                tracing::warn!(%filters, %error, "Ignoring malformed filters parameter");
                state.filters = WireQuery::empty();
            }
        }
    }

    state
}
