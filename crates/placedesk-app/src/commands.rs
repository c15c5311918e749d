//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Args;
use placedesk_core::{
    ColumnDescriptor, ColumnType, FilterGroup, PageRequest, PagedResponse, TableState,
};
use placedesk_export::{DirectorySaver, XlsxDocumentBuilder};
use placedesk_table::{DataTable, DataTableOptions, DownloadOutcome, LocationQuery};
use serde::Serialize;
use serde_json::Value;

use crate::settings::Settings;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Location query string, e.g. `page=1&size=50&filters=...`
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// JSON file with the filterable column descriptors
    #[arg(short, long)]
    pub columns: Option<PathBuf>,

    /// Data-source endpoint used to build the request URL
    #[arg(short, long, default_value = "/api/v1/students")]
    pub endpoint: String,

    /// Free-text search appended to the request
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// JSON file holding a page response (`{items, total, ...}`) or a row array
    #[arg(short, long)]
    pub rows: PathBuf,

    /// JSON file with the table column descriptors; defaults to the keys of
    /// the first row
    #[arg(short, long)]
    pub columns: Option<PathBuf>,

    /// Route of the page being exported; its first segment names the file
    #[arg(long, default_value = "/download")]
    pub route: String,

    /// Output directory; defaults to the configured export directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Row ids to export; all loaded rows when omitted
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Columns to hide before exporting
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub state: TableState,
    pub filter_tree: FilterGroup,
    pub active_filters: usize,
    pub request_url: String,
}

fn read_columns(path: &Path) -> Result<Vec<ColumnDescriptor>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read column file: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse column file: {:?}", path))
}

/// Accept either a page response or a bare array of rows
pub fn read_rows(path: &Path) -> Result<PagedResponse<Value>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows file: {:?}", path))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse rows file: {:?}", path))?;

    match value {
        Value::Array(items) => {
            let total = items.len();
            Ok(PagedResponse {
                total: total as u64,
                page: 1,
                size: total,
                pages: 1,
                items,
            })
        }
        Value::Object(_) => serde_json::from_value(value)
            .with_context(|| format!("Rows file is not a page response: {:?}", path)),
        _ => bail!("Rows file must hold an array or a page response: {:?}", path),
    }
}

fn columns_from_rows(rows: &[Value]) -> Vec<ColumnDescriptor> {
    rows.first()
        .and_then(Value::as_object)
        .map(|row| {
            row.keys()
                .map(|key| ColumnDescriptor::new(key.clone(), key.clone(), ColumnType::String))
                .collect()
        })
        .unwrap_or_default()
}

fn table_options(settings: &Settings, route_path: &str) -> DataTableOptions {
    DataTableOptions {
        show_download: true,
        skeleton_rows: settings.skeleton_rows,
        route_path: route_path.to_string(),
        default_page_size: settings.default_page_size,
        ..Default::default()
    }
}

pub fn inspect(args: &InspectArgs, settings: &Settings) -> Result<InspectReport> {
    let filter_columns = match &args.columns {
        Some(path) => read_columns(path)?,
        None => Vec::new(),
    };

    let table: DataTable<Value, LocationQuery> = DataTable::new(
        Vec::new(),
        filter_columns,
        LocationQuery::parse(&args.query),
        table_options(settings, "/"),
    );

    let mut request = PageRequest::from_state(table.state());
    if let Some(search) = &args.search {
        request = request.with_search(search.clone());
    }

    Ok(InspectReport {
        state: table.state().clone(),
        filter_tree: table.filter().root().as_ref().clone(),
        active_filters: table.filter().active_filter_count(),
        request_url: request.to_url(&args.endpoint),
    })
}

pub fn export(args: &ExportArgs, settings: &Settings) -> Result<PathBuf> {
    let page = read_rows(&args.rows)?;
    let columns = match &args.columns {
        Some(path) => read_columns(path)?,
        None => columns_from_rows(&page.items),
    };
    if columns.is_empty() {
        bail!("No columns to export");
    }

    let mut table: DataTable<Value, LocationQuery> = DataTable::new(
        columns,
        Vec::new(),
        LocationQuery::new(),
        table_options(settings, &args.route),
    );
    table.set_page(page);

    for column in &args.hide {
        table.toggle_column(column, false);
    }
    if args.select.is_empty() {
        table.toggle_select_all();
    } else {
        for id in &args.select {
            table.toggle_row(id);
        }
    }

    tracing::info!(prompt = %table.download_prompt().message, "Confirming download");

    let out_dir = args.out.clone().unwrap_or_else(|| settings.export_dir());
    let mut saver = DirectorySaver::new(out_dir);
    let outcome = table.confirm_download(
        Local::now().naive_local(),
        &XlsxDocumentBuilder::default(),
        &mut saver,
        &mut || tracing::warn!("Nothing selected, full export is not available offline"),
    )?;

    match outcome {
        DownloadOutcome::Saved { path, rows } => {
            tracing::info!(rows, path = %path.display(), "Export complete");
            Ok(path)
        }
        other => bail!("Export did not produce a file: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_read_rows_accepts_both_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let array = write_json(dir.path(), "rows.json", &json!([{"id": "a"}, {"id": "b"}]));
        let page = write_json(
            dir.path(),
            "page.json",
            &json!({"items": [{"id": "a"}], "total": 40, "page": 2, "size": 25, "pages": 2}),
        );
        let scalar = write_json(dir.path(), "scalar.json", &json!(3));

        assert_eq!(read_rows(&array).unwrap().total, 2);
        assert_eq!(read_rows(&page).unwrap().total, 40);
        assert!(read_rows(&scalar).is_err());
    }

    #[test]
    fn test_inspect_decodes_location() {
        let dir = tempfile::tempdir().unwrap();
        let columns = write_json(
            dir.path(),
            "columns.json",
            &json!([{"name": "age", "label": "Age", "type": "int"}]),
        );
        let args = InspectArgs {
            query: "page=1&size=50&filters=%7B%22%24and%22%3A%5B%7B%22age%22%3A%7B%22%24gt%22%3A%2218%22%7D%7D%5D%7D".to_string(),
            columns: Some(columns),
            endpoint: "/api/v1/students".to_string(),
            search: Some("jane".to_string()),
        };

        let report = inspect(&args, &Settings::default()).unwrap();
        assert_eq!(report.state.page_index, 1);
        assert_eq!(report.state.page_size, 50);
        assert_eq!(report.active_filters, 1);
        assert_eq!(report.filter_tree.leaves[0].operator, ">");
        assert!(report.request_url.starts_with("/api/v1/students?page=2&size=50&filters="));
        assert!(report.request_url.ends_with("&search=jane"));
    }

    #[test]
    fn test_export_selected_rows() {
        let dir = tempfile::tempdir().unwrap();
        let rows = write_json(
            dir.path(),
            "rows.json",
            &json!([
                {"id": "s1", "first_name": "Jane", "email": "jane@example.com"},
                {"id": "s2", "first_name": "John", "email": "john@example.com"}
            ]),
        );
        let args = ExportArgs {
            rows,
            columns: None,
            route: "/students/list".to_string(),
            out: Some(dir.path().join("out")),
            select: vec!["s2".to_string()],
            hide: vec!["email".to_string()],
        };

        let path = export(&args, &Settings::default()).unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("students_"));
        assert!(file_name.ends_with(".xlsx"));
        assert!(path.starts_with(dir.path().join("out")));
        assert!(path.exists());
    }
}
