//! Column descriptors supplied by the host page

use serde::{Deserialize, Serialize};

/// Identifier of the trailing row-actions column.
///
/// It is never exported, never offered in the visibility list and is
/// skipped by "hide all".
pub const ACTIONS_COLUMN: &str = "actions";

/// Semantic type of a column, used to pick filter operators and value editors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColumnType {
    #[default]
    String,
    Int,
    Bool,
    Date,
    /// Any type name the table does not recognise
    Other,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Other => "other",
        }
    }

    /// Parse a host type name. Unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Self::String,
            "int" | "integer" | "number" => Self::Int,
            "bool" | "boolean" => Self::Bool,
            "date" => Self::Date,
            _ => Self::Other,
        }
    }
}

impl From<String> for ColumnType {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

fn default_true() -> bool {
    true
}

/// Host supplied metadata for one table or filter column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column identifier (row key)
    pub name: String,
    /// Display label
    pub label: String,
    /// Semantic type
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Whether the user may hide this column
    #[serde(default = "default_true")]
    pub hideable: bool,
    /// Whether the header offers a sort toggle
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl ColumnDescriptor {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            column_type,
            hideable: true,
            sortable: true,
        }
    }

    /// Trailing row-actions column
    pub fn actions() -> Self {
        Self {
            name: ACTIONS_COLUMN.to_string(),
            label: String::new(),
            column_type: ColumnType::String,
            hideable: true,
            sortable: false,
        }
    }

    /// Mark the column as always visible
    pub fn fixed(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn is_actions(&self) -> bool {
        self.name == ACTIONS_COLUMN
    }
}

/// Look up a column type by name; fields not in `columns` are `Other`
pub fn column_type_of(columns: &[ColumnDescriptor], name: &str) -> ColumnType {
    columns
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.column_type)
        .unwrap_or(ColumnType::Other)
}
