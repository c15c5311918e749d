//! Sort specification for the data table
//!
//! The URL form is a JSON array of `{id, desc}` objects; the data source gets
//! a compact `column:dir` list.

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Direction keyword in the data-source sort string
    pub fn api_token(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Descending)
    }
}

/// One sorted column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn ascending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn descending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }

    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Ordered sort specification (first entry = highest priority)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortingState(Vec<ColumnSort>);

impl SortingState {
    pub fn new(columns: Vec<ColumnSort>) -> Self {
        Self(columns)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> &[ColumnSort] {
        &self.0
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|s| s.id == column)
            .map(ColumnSort::direction)
    }

    /// Advance a column through ascending -> descending -> unsorted.
    ///
    /// Sorting a new column replaces the current specification; clearing a
    /// column only removes that column.
    pub fn cycle(&mut self, column: &str) {
        match self.direction_of(column) {
            None => self.0 = vec![ColumnSort::ascending(column)],
            Some(SortDirection::Ascending) => self.0 = vec![ColumnSort::descending(column)],
            Some(SortDirection::Descending) => self.0.retain(|s| s.id != column),
        }
    }

    /// JSON array written to the `sort` URL parameter
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str::<Vec<ColumnSort>>(json)
            .map(Self)
            .map_err(|e| CoreError::InvalidSort(e.to_string()))
    }

    /// Data-source form: `created_at:desc,first_name:asc`
    pub fn to_api_string(&self) -> String {
        self.0
            .iter()
            .map(|s| format!("{}:{}", s.id, s.direction().api_token()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_asc_desc_unsorted() {
        let mut sorting = SortingState::default();

        sorting.cycle("first_name");
        assert_eq!(sorting.direction_of("first_name"), Some(SortDirection::Ascending));

        sorting.cycle("first_name");
        assert_eq!(sorting.direction_of("first_name"), Some(SortDirection::Descending));

        sorting.cycle("first_name");
        assert_eq!(sorting.direction_of("first_name"), None);
        assert!(sorting.is_empty());
    }

    #[test]
    fn test_cycle_new_column_replaces_previous() {
        let mut sorting = SortingState::new(vec![ColumnSort::descending("created_at")]);
        sorting.cycle("email");
        assert_eq!(sorting.columns(), &[ColumnSort::ascending("email")]);
    }

    #[test]
    fn test_json_and_api_forms() {
        let sorting = SortingState::new(vec![
            ColumnSort::descending("created_at"),
            ColumnSort::ascending("first_name"),
        ]);
        assert_eq!(
            sorting.to_json_string(),
            r#"[{"id":"created_at","desc":true},{"id":"first_name","desc":false}]"#
        );
        assert_eq!(sorting.to_api_string(), "created_at:desc,first_name:asc");

        let parsed = SortingState::from_json_str(&sorting.to_json_string()).unwrap();
        assert_eq!(parsed, sorting);
        assert!(SortingState::from_json_str("{\"id\":1}").is_err());
    }
}
