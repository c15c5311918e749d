//! Common test utilities and mocks

#![allow(dead_code)]

use std::path::PathBuf;

use placedesk_core::{ColumnDescriptor, ColumnType, PagedResponse};
use placedesk_export::{ExportError, FileSaver};
use placedesk_table::{Clipboard, ClipboardError, DataTable, DataTableOptions, LocationQuery};
use serde_json::{Value, json};

pub type StudentTable = DataTable<Value, LocationQuery>;

pub fn student_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("first_name", "First Name", ColumnType::String),
        ColumnDescriptor::new("last_name", "Last Name", ColumnType::String),
        ColumnDescriptor::new("email", "Email", ColumnType::String),
        ColumnDescriptor::new("year_of_passing", "Year of Passing", ColumnType::Int),
        ColumnDescriptor::new("created_at", "Created At", ColumnType::Date),
        ColumnDescriptor::actions(),
    ]
}

pub fn filter_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("first_name", "First Name", ColumnType::String),
        ColumnDescriptor::new("gender", "Gender", ColumnType::String),
        ColumnDescriptor::new("year_of_passing", "Year of Passing", ColumnType::Int),
        ColumnDescriptor::new("is_placed", "Placed", ColumnType::Bool),
        ColumnDescriptor::new("date_of_birth", "Date of Birth", ColumnType::Date),
    ]
}

pub fn student(id: &str, first_name: &str) -> Value {
    json!({
        "id": id,
        "first_name": first_name,
        "last_name": "Doe",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "year_of_passing": 2025,
        "created_at": "2025-01-15",
    })
}

pub fn page(ids: &[(&str, &str)], total: u64, pages: usize) -> PagedResponse<Value> {
    PagedResponse {
        items: ids.iter().map(|(id, name)| student(id, name)).collect(),
        total,
        page: 1,
        size: 25,
        pages,
    }
}

pub fn table_at(query: &str) -> StudentTable {
    DataTable::new(
        student_columns(),
        filter_columns(),
        LocationQuery::parse(query),
        DataTableOptions {
            show_download: true,
            route_path: "/students/list".to_string(),
            ..Default::default()
        },
    )
}

/// A table that has received one page of three students out of ten pages
pub fn loaded_table() -> StudentTable {
    let mut table = table_at("");
    table.set_page(page(
        &[("s1", "Jane"), ("s2", "John"), ("s3", "Asha")],
        240,
        10,
    ));
    table.take_events();
    table
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("permission denied".to_string()))
    }
}

/// Saver that keeps files in memory
#[derive(Default)]
pub struct MemorySaver {
    pub saved: Vec<(String, Vec<u8>)>,
}

impl FileSaver for MemorySaver {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
