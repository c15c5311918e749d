//! Row access for rendering and export

use serde_json::{Map, Value};

/// A row the table can render.
///
/// `row_id` must be unique within the data source; selection is keyed by it.
pub trait TableRow {
    fn row_id(&self) -> String;

    /// Raw value of a column, `None` when the row has no such field
    fn cell(&self, column: &str) -> Option<Value>;
}

impl TableRow for Map<String, Value> {
    fn row_id(&self) -> String {
        self.get("id").map(cell_text).unwrap_or_default()
    }

    fn cell(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl TableRow for Value {
    fn row_id(&self) -> String {
        self.get("id").map(cell_text).unwrap_or_default()
    }

    fn cell(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

/// Text shown for a cell value. Null renders as an empty string.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_rows() {
        let row = json!({"id": 7, "first_name": "Jane", "email": null});
        assert_eq!(row.row_id(), "7");
        assert_eq!(row.cell("first_name"), Some(json!("Jane")));
        assert_eq!(row.cell("missing"), None);
        assert_eq!(cell_text(&row["email"]), "");
    }
}
