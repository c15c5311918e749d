//! XLSX document builder

use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use crate::{DocumentBuilder, ExportError, ExportRows};

/// Worksheet name used for table downloads
pub const DEFAULT_SHEET_NAME: &str = "Data Download";

/// Writes rows to a single worksheet: a header row of column keys followed by
/// one row per record. Numbers and booleans keep their cell types.
#[derive(Debug, Clone)]
pub struct XlsxDocumentBuilder {
    sheet_name: String,
}

impl XlsxDocumentBuilder {
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}

impl Default for XlsxDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for XlsxDocumentBuilder {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn build(&self, rows: &ExportRows) -> Result<Vec<u8>, ExportError> {
        if rows.columns.is_empty() {
            return Err(ExportError::NoColumns);
        }

        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&self.sheet_name)?;

        for (col, name) in rows.columns.iter().enumerate() {
            worksheet.write_string(0, col as u16, name)?;
        }

        for (index, record) in rows.records.iter().enumerate() {
            let row = (index + 1) as u32;
            for (col, name) in rows.columns.iter().enumerate() {
                let col = col as u16;
                match record.get(name) {
                    None | Some(Value::Null) => {}
                    Some(Value::Bool(b)) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    Some(Value::Number(n)) => match n.as_f64() {
                        Some(f) => {
                            worksheet.write_number(row, col, f)?;
                        }
                        None => {
                            worksheet.write_string(row, col, &n.to_string())?;
                        }
                    },
                    Some(Value::String(s)) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    Some(other) => {
                        worksheet.write_string(row, col, &other.to_string())?;
                    }
                }
            }
        }

        workbook.push_worksheet(worksheet);
        let buffer = workbook.save_to_buffer()?;

        tracing::debug!(
            rows = rows.len(),
            columns = rows.columns.len(),
            bytes = buffer.len(),
            "Built xlsx document"
        );
        Ok(buffer)
    }
}
