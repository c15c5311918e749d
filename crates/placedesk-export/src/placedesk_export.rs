//! PlaceDesk Export - spreadsheet documents for table downloads
//!
//! Provides the "build a document from rows" and "save blob as file"
//! collaborators used by the data table download action.

mod document;
mod file_name;
mod saver;
mod xlsx;

pub use document::*;
pub use file_name::*;
pub use saver::*;
pub use xlsx::*;
