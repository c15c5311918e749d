//! PlaceDesk Table - controllers for the filterable, sortable, paginated table
//!
//! ## Module Structure
//!
//! - `advanced_filter` - Filter-group tree builder with apply/clear
//! - `column_visibility` - Column show/hide state with bulk operations
//! - `selection` - Cross-page row selection keyed by row id
//! - `pagination` - Page navigation rules and page-size choices
//! - `url_sync` - Two-way binding between table state and the query string
//! - `row` - Row access trait used by rendering and export
//! - `data_table` - The paginated table controller, render states and downloads

mod advanced_filter;
mod column_visibility;
mod data_table;
mod pagination;
mod row;
mod selection;
mod url_sync;

pub use advanced_filter::*;
pub use column_visibility::*;
pub use data_table::*;
pub use pagination::*;
pub use row::*;
pub use selection::*;
pub use url_sync::*;
