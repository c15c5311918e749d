//! Export document model and builder trait

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors during document export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("No columns selected for export")]
    NoColumns,
}

/// Rows limited to the exported columns, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRows {
    /// Column keys, used as the header row
    pub columns: Vec<String>,
    /// One record per row holding only the exported keys
    pub records: Vec<Map<String, Value>>,
}

impl ExportRows {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Add a row, keeping only the exported columns. Missing keys become null.
    pub fn push_projected(&mut self, row: impl Fn(&str) -> Option<Value>) {
        let record = self
            .columns
            .iter()
            .map(|column| (column.clone(), row(column).unwrap_or(Value::Null)))
            .collect();
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Produces a downloadable document from rows
pub trait DocumentBuilder {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn build(&self, rows: &ExportRows) -> Result<Vec<u8>, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_projected_keeps_column_order() {
        let source = json!({"id": "s1", "first_name": "Jane", "aadhar_number": "x"});
        let mut rows = ExportRows::new(vec!["first_name".into(), "middle_name".into()]);
        rows.push_projected(|key| source.get(key).cloned());

        assert_eq!(rows.len(), 1);
        let record = &rows.records[0];
        assert_eq!(record.get("first_name"), Some(&json!("Jane")));
        assert_eq!(record.get("middle_name"), Some(&Value::Null));
        assert!(record.get("aadhar_number").is_none());
    }
}
