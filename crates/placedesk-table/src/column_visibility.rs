//! Column show/hide state
//!
//! Columns are visible unless explicitly hidden. Non-hideable columns and the
//! trailing actions column never appear in the toggle list and are skipped by
//! the bulk operations.

use std::collections::BTreeMap;

use placedesk_core::ColumnDescriptor;

#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    columns: Vec<ColumnDescriptor>,
    visibility: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            visibility: BTreeMap::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Non-toggleable columns are always visible, whatever the map says
    pub fn is_visible(&self, column: &str) -> bool {
        if self.is_locked(column) {
            return true;
        }
        self.visibility.get(column).copied().unwrap_or(true)
    }

    fn is_locked(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.name == column && (!c.hideable || c.is_actions()))
    }

    /// Set one column's visibility. Returns true when the state changed.
    ///
    /// Columns outside `toggleable_columns` are left alone.
    pub fn toggle(&mut self, column: &str, visible: bool) -> bool {
        if self.is_locked(column) || self.is_visible(column) == visible {
            return false;
        }
        self.visibility.insert(column.to_string(), visible);
        true
    }

    /// Columns offered in the visibility menu
    pub fn toggleable_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.hideable && !c.is_actions())
    }

    pub fn show_all(&mut self) {
        let names: Vec<String> = self.toggleable_columns().map(|c| c.name.clone()).collect();
        for name in names {
            self.visibility.insert(name, true);
        }
    }

    /// Hide every toggleable column, keeping the first one visible
    pub fn hide_all(&mut self) {
        let names: Vec<String> = self.toggleable_columns().map(|c| c.name.clone()).collect();
        for name in &names {
            self.visibility.insert(name.clone(), false);
        }
        if let Some(first) = names.into_iter().next() {
            self.visibility.insert(first, true);
        }
    }

    /// Declared columns that are currently shown, in declaration order
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| self.is_visible(&c.name))
    }

    pub fn visibility_map(&self) -> &BTreeMap<String, bool> {
        &self.visibility
    }

    /// Replace the state with a map supplied by the host
    pub fn apply_map(&mut self, visibility: &BTreeMap<String, bool>) {
        self.visibility = visibility.clone();
    }
}
