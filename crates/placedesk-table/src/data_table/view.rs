//! UI-agnostic view model of the table
//!
//! Renderers draw `TableView` as-is: the controller has already decided the
//! render state, header layout, sort indicators and per-cell content.

use placedesk_core::SortDirection;

use crate::{HeaderCheckState, Pagination};

/// Message shown when the page has no rows
pub const EMPTY_MESSAGE: &str = "No data found";

/// Mutually exclusive render states, in precedence order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    Loading { skeleton_rows: usize },
    Error(String),
    Empty,
    Populated,
}

/// What a header or body column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Leading row-selection checkbox
    Select,
    Data,
    /// Trailing sticky row-actions column
    Actions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
    pub sortable: bool,
    /// Current sort indicator
    pub sort: Option<SortDirection>,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Select { checked: bool },
    /// Value cell; the popover shows `title` and the full `text` with a copy
    /// action
    Value { title: String, text: String },
    /// Host-rendered row actions
    Actions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub column: String,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub selected: bool,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Placeholder grid under the real header
    Skeleton { rows: usize, columns: usize },
    /// Single full-width row
    Message { text: String, col_span: usize },
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadButton {
    /// Number of selected rows; 0 means "download all"
    pub selected: usize,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    /// `None` when the filter button is hidden
    pub filter: Option<FilterButton>,
    pub download: Option<DownloadButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub badge: Option<usize>,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub state: RenderState,
    pub toolbar: Toolbar,
    pub header: Vec<HeaderCell>,
    /// Header checkbox, present only when rows are shown
    pub select_all: Option<HeaderCheckState>,
    pub body: TableBody,
    pub pagination: Pagination,
}
