//! Row selection keyed by row id
//!
//! Selection survives page changes: ids selected on one page stay selected
//! while the user browses others.

use std::collections::BTreeSet;

/// Tri-state value of the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckState {
    Checked,
    Indeterminate,
    Unchecked,
}

/// Set of selected row ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection(BTreeSet<String>);

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a single row. Returns the new selected state.
    pub fn toggle(&mut self, row_id: &str) -> bool {
        if self.0.remove(row_id) {
            false
        } else {
            self.0.insert(row_id.to_string());
            true
        }
    }

    /// Header checkbox action over the loaded page.
    ///
    /// When the selection is as large as the loaded page it is cleared,
    /// otherwise it is replaced by exactly the loaded ids.
    pub fn select_all(&mut self, loaded_ids: &[String]) {
        if self.0.len() == loaded_ids.len() {
            self.0.clear();
        } else {
            self.0 = loaded_ids.iter().cloned().collect();
        }
    }

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.0.contains(row_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Header checkbox state relative to the loaded page. A selection as
    /// large as the page shows as checked.
    pub fn header_state(&self, loaded_ids: &[String]) -> HeaderCheckState {
        if self.0.is_empty() {
            return HeaderCheckState::Unchecked;
        }
        if self.0.len() == loaded_ids.len() {
            HeaderCheckState::Checked
        } else {
            HeaderCheckState::Indeterminate
        }
    }
}
