//! Paginated data table controller
//!
//! The table follows a controlled-component pattern: the host owns the
//! canonical `TableState` and the data fetch. User actions update the
//! controller's mirror of that state, write the location query and queue
//! `TableEvent`s for the host. The host feeds loading, error and page data
//! back in and renders `view()`.
//!
//! ## Module Structure
//!
//! - `events` - Events emitted to the host
//! - `view` - Render states and the view model
//! - `download` - Download confirmation and export
//! - `clipboard` - Cell copy collaborator
//! - `notice` - Transient notices

mod clipboard;
mod download;
mod events;
mod notice;
mod view;

pub use clipboard::*;
pub use download::*;
pub use events::*;
pub use notice::*;
pub use view::*;

use chrono::NaiveDateTime;
use placedesk_core::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, PagedResponse, SortingState, TableState, WireQuery,
};
use placedesk_export::{DocumentBuilder, ExportError, ExportRows, FileSaver, download_file_name};

use crate::{
    AdvancedFilter, ColumnVisibility, FilterHost, Navigation, Pagination, QuerySync,
    RowSelection, TableRow, cell_text, read_table_state, write_pagination, write_sorting,
};

/// Placeholder rows shown while loading
pub const DEFAULT_SKELETON_ROWS: usize = 24;

#[derive(Debug, Clone)]
pub struct DataTableOptions {
    /// Show the advanced filter button
    pub show_filters: bool,
    /// Show the download button
    pub show_download: bool,
    pub skeleton_rows: usize,
    /// Route of the hosting page; its first segment prefixes download names
    pub route_path: String,
    pub default_page_size: usize,
    pub default_sorting: SortingState,
}

impl Default for DataTableOptions {
    fn default() -> Self {
        Self {
            show_filters: true,
            show_download: false,
            skeleton_rows: DEFAULT_SKELETON_ROWS,
            route_path: "/".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sorting: SortingState::default(),
        }
    }
}

/// Extra header-region control, e.g. a column visibility menu
pub trait HeaderSlot {
    type Output;

    fn render(&self, columns: &ColumnVisibility, selection: &RowSelection) -> Self::Output;
}

impl<F, T> HeaderSlot for F
where
    F: Fn(&ColumnVisibility, &RowSelection) -> T,
{
    type Output = T;

    fn render(&self, columns: &ColumnVisibility, selection: &RowSelection) -> T {
        self(columns, selection)
    }
}

/// Forwards filter changes into the table state and event queue
struct StateSink<'a> {
    state: &'a mut TableState,
    events: &'a mut Vec<TableEvent>,
}

impl FilterHost for StateSink<'_> {
    fn set_page_index(&mut self, page_index: usize) {
        self.state.set_page_index(page_index);
        self.events.push(TableEvent::PageIndexChanged(page_index));
    }

    fn set_filters(&mut self, filters: WireQuery) {
        self.state.set_filters(filters.clone());
        self.events.push(TableEvent::FiltersChanged(filters));
    }
}

pub struct DataTable<R, Q> {
    columns: Vec<ColumnDescriptor>,
    options: DataTableOptions,
    state: TableState,
    query: Q,
    filter: AdvancedFilter,
    visibility: ColumnVisibility,
    selection: RowSelection,
    rows: Vec<R>,
    loading: bool,
    error: Option<String>,
    total_rows: u64,
    total_pages: usize,
    downloading: bool,
    events: Vec<TableEvent>,
    notices: Vec<Notice>,
}

impl<R, Q> DataTable<R, Q>
where
    R: TableRow,
    Q: QuerySync,
{
    /// Create a table and seed its state from the location query.
    ///
    /// `columns` are the displayed columns, `filter_columns` the fields offered
    /// by the filter builder. The host should read `state()` once to seed its
    /// own copy.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        filter_columns: Vec<ColumnDescriptor>,
        query: Q,
        options: DataTableOptions,
    ) -> Self {
        let defaults = TableState::default()
            .with_page_size(options.default_page_size)
            .with_sorting(options.default_sorting.clone());
        let state = read_table_state(&query, defaults);

        let mut filter = AdvancedFilter::new(filter_columns);
        filter.set_applied_filters(&state.filters);

        let mut visibility = ColumnVisibility::new(columns.clone());
        visibility.apply_map(&state.column_visibility);

        tracing::debug!(
            page_index = state.page_index,
            page_size = state.page_size,
            sorted = !state.sorting.is_empty(),
            filtered = !state.filters.is_empty(),
            "Data table initialised from location"
        );

        Self {
            columns,
            options,
            state,
            query,
            filter,
            visibility,
            selection: RowSelection::new(),
            rows: Vec::new(),
            loading: true,
            error: None,
            total_rows: 0,
            total_pages: 0,
            downloading: false,
            events: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn filter(&self) -> &AdvancedFilter {
        &self.filter
    }

    /// Tree edits (add/remove/update leaves and groups) go through here
    pub fn filter_mut(&mut self) -> &mut AdvancedFilter {
        &mut self.filter
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    // Host inputs

    /// Accept the host's canonical state
    pub fn set_state(&mut self, state: TableState) {
        self.filter.set_applied_filters(&state.filters);
        if state.column_visibility != *self.visibility.visibility_map() {
            self.visibility.apply_map(&state.column_visibility);
        }
        self.state = state;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// An empty message counts as no error
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error.filter(|e| !e.is_empty());
    }

    pub fn set_downloading(&mut self, downloading: bool) {
        self.downloading = downloading;
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    /// Accept a fetched page. Ends loading and clears any error.
    pub fn set_page(&mut self, page: PagedResponse<R>) {
        self.rows = page.items;
        self.total_rows = page.total;
        self.loading = false;
        self.error = None;
        self.set_total_pages(page.pages);
    }

    /// Update the page count, moving the page index back inside it
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        if self.state.clamp_page_index(total_pages) {
            tracing::debug!(
                page_index = self.state.page_index,
                total_pages,
                "Page index clamped to page count"
            );
            self.events.push(TableEvent::PageIndexChanged(self.state.page_index));
            self.sync_pagination();
        }
    }

    // Filters

    pub fn apply_filters(&mut self) -> bool {
        let mut sink = StateSink {
            state: &mut self.state,
            events: &mut self.events,
        };
        self.filter.apply(&mut sink, &mut self.query)
    }

    pub fn clear_filters(&mut self) {
        let mut sink = StateSink {
            state: &mut self.state,
            events: &mut self.events,
        };
        self.filter.clear(&mut sink, &mut self.query);
    }

    // Sorting and paging

    /// Cycle a column's sort (ascending, descending, unsorted) and return to
    /// the first page. Returns false for unknown or unsortable columns.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.name == column && c.sortable && !c.is_actions());
        if !sortable {
            return false;
        }

        let mut sorting = self.state.sorting.clone();
        sorting.cycle(column);
        self.state.set_sorting(sorting.clone());
        self.events.push(TableEvent::SortingChanged(sorting));
        self.events.push(TableEvent::PageIndexChanged(0));

        write_sorting(&mut self.query, &self.state.sorting);
        self.sync_pagination();
        true
    }

    /// Unsupported sizes fall back to the default size
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.set_page_size(page_size);
        self.events.push(TableEvent::PageSizeChanged(self.state.page_size));
        self.events.push(TableEvent::PageIndexChanged(0));
        self.sync_pagination();
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.state.page_index, self.state.page_size, self.total_pages)
    }

    pub fn first_page(&mut self) -> bool {
        self.pagination()
            .first()
            .is_some_and(|index| self.go_to_page(index))
    }

    pub fn previous_page(&mut self) -> bool {
        self.pagination()
            .previous()
            .is_some_and(|index| self.go_to_page(index))
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination()
            .next()
            .is_some_and(|index| self.go_to_page(index))
    }

    pub fn last_page(&mut self) -> bool {
        self.pagination()
            .last()
            .is_some_and(|index| self.go_to_page(index))
    }

    /// Move to a page, clamped to the known page count
    pub fn go_to_page(&mut self, page_index: usize) -> bool {
        let target = self.pagination().clamp(page_index);
        if target == self.state.page_index {
            return false;
        }
        self.state.set_page_index(target);
        self.events.push(TableEvent::PageIndexChanged(target));
        self.sync_pagination();
        true
    }

    fn sync_pagination(&mut self) {
        write_pagination(&mut self.query, self.state.page_index, self.state.page_size);
        self.query.commit(Navigation::Replace);
    }

    // Columns

    pub fn toggle_column(&mut self, column: &str, visible: bool) -> bool {
        let changed = self.visibility.toggle(column, visible);
        if changed {
            self.visibility_changed();
        }
        changed
    }

    pub fn show_all_columns(&mut self) {
        self.visibility.show_all();
        self.visibility_changed();
    }

    pub fn hide_all_columns(&mut self) {
        self.visibility.hide_all();
        self.visibility_changed();
    }

    fn visibility_changed(&mut self) {
        let map = self.visibility.visibility_map().clone();
        self.state.column_visibility = map.clone();
        self.events.push(TableEvent::ColumnVisibilityChanged(map));
    }

    // Rows

    pub fn toggle_row(&mut self, row_id: &str) -> bool {
        self.selection.toggle(row_id)
    }

    /// Header checkbox: select every loaded row, or clear
    pub fn toggle_select_all(&mut self) {
        let loaded = self.loaded_ids();
        self.selection.select_all(&loaded);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn loaded_ids(&self) -> Vec<String> {
        self.rows.iter().map(TableRow::row_id).collect()
    }

    /// Copy a cell's full text. Failures become an error notice.
    pub fn copy_cell(&mut self, row_id: &str, column: &str, clipboard: &mut dyn Clipboard) -> bool {
        let Some(row) = self.rows.iter().find(|r| r.row_id() == row_id) else {
            return false;
        };
        let text = row.cell(column).as_ref().map(cell_text).unwrap_or_default();

        match clipboard.write_text(&text) {
            Ok(()) => {
                self.notices.push(Notice::success("Copied"));
                true
            }
            Err(error) => {
                tracing::warn!(%error, row_id, column, "Failed to copy cell value");
                self.notices.push(Notice::error(format!("Failed to copy: {error}")));
                false
            }
        }
    }

    // Output

    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn render_state(&self) -> RenderState {
        if self.loading {
            RenderState::Loading {
                skeleton_rows: self.options.skeleton_rows,
            }
        } else if let Some(error) = &self.error {
            RenderState::Error(error.clone())
        } else if self.rows.is_empty() {
            RenderState::Empty
        } else {
            RenderState::Populated
        }
    }

    pub fn render_header_slot<S: HeaderSlot>(&self, slot: &S) -> S::Output {
        slot.render(&self.visibility, &self.selection)
    }

    /// Visible data columns in order, then the actions column if shown
    fn display_columns(&self) -> Vec<&ColumnDescriptor> {
        let (actions, mut data): (Vec<_>, Vec<_>) = self
            .visibility
            .visible_columns()
            .partition(|c| c.is_actions());
        data.extend(actions);
        data
    }

    fn header_cell(&self, column: &ColumnDescriptor) -> HeaderCell {
        let kind = if column.is_actions() {
            ColumnKind::Actions
        } else {
            ColumnKind::Data
        };
        HeaderCell {
            id: column.name.clone(),
            label: column.label.clone(),
            kind,
            sortable: column.sortable && kind == ColumnKind::Data,
            sort: self.state.sorting.direction_of(&column.name),
            sticky: kind == ColumnKind::Actions,
        }
    }

    fn row_view(&self, row: &R, columns: &[&ColumnDescriptor]) -> RowView {
        let id = row.row_id();
        let selected = self.selection.is_selected(&id);

        let mut cells = Vec::with_capacity(columns.len() + 1);
        cells.push(CellView {
            column: "select".to_string(),
            content: CellContent::Select { checked: selected },
        });
        cells.extend(columns.iter().map(|column| {
            let content = if column.is_actions() {
                CellContent::Actions
            } else {
                CellContent::Value {
                    title: column.label.clone(),
                    text: row
                        .cell(&column.name)
                        .as_ref()
                        .map(cell_text)
                        .unwrap_or_default(),
                }
            };
            CellView {
                column: column.name.clone(),
                content,
            }
        }));

        RowView {
            id,
            selected,
            cells,
        }
    }

    /// Build the view model for the current render state
    pub fn view(&self) -> TableView {
        let state = self.render_state();
        let columns = self.display_columns();
        let mut header: Vec<HeaderCell> = columns.iter().map(|c| self.header_cell(c)).collect();
        let mut select_all = None;

        let body = match &state {
            RenderState::Loading { skeleton_rows } => TableBody::Skeleton {
                rows: *skeleton_rows,
                columns: header.len(),
            },
            RenderState::Error(message) => TableBody::Message {
                text: message.clone(),
                col_span: self.columns.len(),
            },
            RenderState::Empty => TableBody::Message {
                text: EMPTY_MESSAGE.to_string(),
                col_span: self.columns.len(),
            },
            RenderState::Populated => {
                header.insert(
                    0,
                    HeaderCell {
                        id: "select".to_string(),
                        label: String::new(),
                        kind: ColumnKind::Select,
                        sortable: false,
                        sort: None,
                        sticky: true,
                    },
                );
                select_all = Some(self.selection.header_state(&self.loaded_ids()));
                TableBody::Rows(
                    self.rows
                        .iter()
                        .map(|row| self.row_view(row, &columns))
                        .collect(),
                )
            }
        };

        let toolbar = Toolbar {
            filter: self.options.show_filters.then(|| FilterButton {
                badge: self.filter.badge(),
                title: self.filter.popover_title(),
            }),
            download: self.options.show_download.then(|| DownloadButton {
                selected: self.selection.len(),
                busy: self.downloading,
            }),
        };

        TableView {
            state,
            toolbar,
            header,
            select_all,
            body,
            pagination: self.pagination(),
        }
    }

    // Download

    fn download_scope(&self) -> DownloadScope {
        if self.selection.is_empty() {
            DownloadScope::All(self.total_rows)
        } else {
            DownloadScope::Selected(self.selection.len())
        }
    }

    /// Confirmation dialog for the branch a download would take
    pub fn download_prompt(&self) -> DownloadPrompt {
        DownloadPrompt::new(self.download_scope())
    }

    /// Visible columns exported by a download, actions excluded
    pub fn export_columns(&self) -> Vec<String> {
        self.visibility
            .visible_columns()
            .filter(|c| !c.is_actions())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Run a confirmed download.
    ///
    /// `now` is the click time used in the file name.
    pub fn confirm_download(
        &mut self,
        now: NaiveDateTime,
        builder: &dyn DocumentBuilder,
        saver: &mut dyn FileSaver,
        export_all: &mut dyn ExportAll,
    ) -> Result<DownloadOutcome, ExportError> {
        if let DownloadScope::All(total) = self.download_scope() {
            if self.downloading {
                return Ok(DownloadOutcome::Busy);
            }
            tracing::info!(total, "Requesting full export");
            export_all.export_all();
            return Ok(DownloadOutcome::ExportAllRequested);
        }

        let mut export = ExportRows::new(self.export_columns());
        for row in self
            .rows
            .iter()
            .filter(|r| self.selection.is_selected(&r.row_id()))
        {
            export.push_projected(|column| row.cell(column));
        }

        let bytes = builder.build(&export)?;
        let file_name = download_file_name(&self.options.route_path, now, builder.extension());
        let path = saver.save(&file_name, &bytes)?;

        tracing::info!(rows = export.len(), path = %path.display(), "Exported selected rows");
        Ok(DownloadOutcome::Saved {
            path,
            rows: export.len(),
        })
    }
}
