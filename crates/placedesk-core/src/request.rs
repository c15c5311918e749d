//! Data-source request contract
//!
//! The table engine never performs a fetch itself. Hosts build a
//! `PageRequest` from their `TableState`, issue it through their own client
//! and feed the `PagedResponse` back. `FetchTracker` lets the host drop
//! responses that were overtaken by a newer request.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{TableState, WireQuery};

/// One page request. `page` is 1-based on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: String,
    pub filters: WireQuery,
    pub search: Option<String>,
}

impl PageRequest {
    pub fn from_state(state: &TableState) -> Self {
        Self {
            page: state.page_index.saturating_add(1),
            size: state.page_size,
            sort: state.sorting.to_api_string(),
            filters: state.filters.clone(),
            search: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Query string for the data source. Empty sort, filters and search are
    /// omitted.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("page", &self.page.to_string());
        serializer.append_pair("size", &self.size.to_string());
        if !self.sort.is_empty() {
            serializer.append_pair("sort", &self.sort);
        }
        if !self.filters.is_empty() {
            serializer.append_pair("filters", &self.filters.to_json_string());
        }
        if let Some(search) = &self.search {
            serializer.append_pair("search", search);
        }
        serializer.finish()
    }

    /// Endpoint joined with the query string
    pub fn to_url(&self, endpoint: &str) -> String {
        format!("{}?{}", endpoint, self.to_query_string())
    }
}

/// One page of results as returned by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
}

/// Handle for an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Tracks the most recent request so stale responses can be discarded
#[derive(Debug, Default)]
pub struct FetchTracker {
    issued: u64,
    latest: Option<PageRequest>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `request` differs from the most recently issued one
    pub fn needs_fetch(&self, request: &PageRequest) -> bool {
        self.latest.as_ref() != Some(request)
    }

    /// Record a new request; any older ticket becomes stale
    pub fn begin(&mut self, request: PageRequest) -> RequestTicket {
        self.issued += 1;
        tracing::debug!(
            ticket = self.issued,
            page = request.page,
            size = request.size,
            "Issuing page request"
        );
        self.latest = Some(request);
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Pass the response through only if it answers the latest request
    pub fn accept<T>(&self, ticket: RequestTicket, response: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(response)
        } else {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding stale page response"
            );
            None
        }
    }

    pub fn latest(&self) -> Option<&PageRequest> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnSort, SortingState};
    use serde_json::json;

    #[test]
    fn test_request_from_state_is_one_based() {
        let mut state = TableState::default().with_sorting(SortingState::new(vec![
            ColumnSort::descending("created_at"),
        ]));
        state.page_index = 2;

        let request = PageRequest::from_state(&state);
        assert_eq!(request.page, 3);
        assert_eq!(request.size, 25);
        assert_eq!(request.sort, "created_at:desc");
        assert_eq!(
            request.to_query_string(),
            "page=3&size=25&sort=created_at%3Adesc"
        );
    }

    #[test]
    fn test_request_includes_filters_and_search() {
        let mut state = TableState::default();
        state.filters =
            WireQuery::try_from(json!({"$and": [{"gender": {"$eq": "F"}}]})).unwrap();

        let query = PageRequest::from_state(&state)
            .with_search("jane doe")
            .to_query_string();
        assert!(query.starts_with("page=1&size=25&filters="));
        assert!(query.contains("%24and"));
        assert!(query.ends_with("&search=jane+doe"));
    }

    #[test]
    fn test_request_page_saturates() {
        let state = TableState {
            page_index: usize::MAX,
            ..Default::default()
        };
        assert_eq!(PageRequest::from_state(&state).page, usize::MAX);
    }

    #[test]
    fn test_tracker_discards_stale_responses() {
        let mut tracker = FetchTracker::new();
        let state = TableState::default();

        let first = tracker.begin(PageRequest::from_state(&state));
        let mut next = state.clone();
        next.page_index = 1;
        let second = tracker.begin(PageRequest::from_state(&next));

        assert_eq!(tracker.accept(first, "old"), None);
        assert_eq!(tracker.accept(second, "new"), Some("new"));
        assert!(!tracker.needs_fetch(&PageRequest::from_state(&next)));
        assert!(tracker.needs_fetch(&PageRequest::from_state(&state)));
    }

    #[test]
    fn test_paged_response_deserializes() {
        let response: PagedResponse<serde_json::Value> = serde_json::from_value(json!({
            "items": [{"id": "a"}], "total": 1, "page": 1, "size": 25, "pages": 1
        }))
        .unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.pages, 1);
    }
}
