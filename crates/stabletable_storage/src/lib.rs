//! Stable-identifier columnar storage for StableTable.
//!
//! This crate provides:
//! - [`IdentifierMap`] - Free-list identifier allocation with a dense slot map
//! - [`Reorder`] - Validated display-order changes applied in lockstep
//! - [`TypedColumnStore`] / [`ColumnStorage`] - Packed per-kind column arrays
//! - [`StableTable`] - The table facade with data versioning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod column;
pub mod config;
pub mod identifier;
pub mod order;
pub mod table;

pub use column::{CellType, ColumnStorage, TypedColumnStore};
pub use config::TableConfig;
pub use identifier::{IdentifierMap, StableId};
pub use order::Reorder;
pub use table::{ColumnDescription, ColumnEntry, RowDescription, StableTable};
