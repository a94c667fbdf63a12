//! Interchange, persistence, and CLI support for StableTable.
//!
//! This crate provides:
//! - [`export_csv`] / [`import_csv`] - CSV interchange
//! - [`export_json`] / [`import_json`] - JSON interchange via [`TableDocument`]
//! - [`ImportOptions`] / [`ImportReport`] - Import behaviour and results
//! - [`TableFile`] - `MessagePack` persistence with an optional [`Sidecar`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod delimited;
pub mod document;
pub mod interchange;
pub mod options;
pub mod serialize;

pub use delimited::{export_csv, import_csv};
pub use document::{RowDocument, TableDocument, export_json, import_document, import_json};
pub use options::{CellWarning, ImportOptions, ImportReport};
pub use serialize::{Sidecar, TableFile, from_bytes, load_from_file, save_to_file, to_bytes};
