//! Download confirmation flow
//!
//! With rows selected, the selected rows of the loaded page are exported
//! over the visible columns and saved under a timestamped name. With no
//! selection the host's export-all collaborator runs instead.

use std::path::PathBuf;

/// Title of the confirmation dialog
pub const DOWNLOAD_DIALOG_TITLE: &str = "Confirm Download";

/// Which branch a confirmed download takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadScope {
    /// Export the given number of selected rows locally
    Selected(usize),
    /// Ask the host to export the full result set
    All(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPrompt {
    pub title: &'static str,
    pub message: String,
    pub scope: DownloadScope,
}

impl DownloadPrompt {
    pub fn new(scope: DownloadScope) -> Self {
        let message = match scope {
            DownloadScope::Selected(count) => {
                format!("Are you sure you want to download the selected {count} rows?")
            }
            DownloadScope::All(total) => {
                format!("Are you sure you want to download all {total} rows?")
            }
        };
        Self {
            title: DOWNLOAD_DIALOG_TITLE,
            message,
            scope,
        }
    }
}

/// Host-supplied full-dataset export, typically a server-side download
pub trait ExportAll {
    fn export_all(&mut self);
}

impl<F> ExportAll for F
where
    F: FnMut(),
{
    fn export_all(&mut self) {
        self()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Selected rows were written to `path`
    Saved { path: PathBuf, rows: usize },
    /// The export-all collaborator was invoked
    ExportAllRequested,
    /// An export-all download is still running
    Busy,
}
