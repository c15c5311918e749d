//! PlaceDesk Core - data model for the table engine
//!
//! This crate provides the types every other PlaceDesk crate builds on:
//!
//! - `ColumnDescriptor` / `ColumnType` - host supplied column metadata
//! - `FilterOperator` - the operator table shared by the UI and the wire format
//! - `FilterGroup` / `FilterLeaf` - the recursive filter tree
//! - `encode` / `decode` - the bidirectional filter tree <-> `WireQuery` codec
//! - `SortingState` - ordered sort specification
//! - `TableState` - page, size, sort, filters and column visibility owned by the host
//! - `PageRequest` / `PagedResponse` / `FetchTracker` - the data-source contract

mod codec;
mod column;
mod error;
mod filter;
mod operator;
mod request;
mod sort;
mod state;

pub use codec::*;
pub use column::*;
pub use error::*;
pub use filter::*;
pub use operator::*;
pub use request::*;
pub use sort::*;
pub use state::*;
