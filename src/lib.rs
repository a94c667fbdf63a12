//! StableTable - Columnar tables with stable row and column identifiers
//!
//! This crate re-exports all layers of the StableTable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: stabletable_runtime    - CSV/JSON interchange, persistence, CLI
//! Layer 2: stabletable_sort       - Multi-key stable row sorting
//! Layer 1: stabletable_storage    - Identifier maps, column stores, table facade
//! Layer 0: stabletable_foundation - Core types (RowId, ColumnType, CellValue, Error)
//! ```

pub use stabletable_foundation as foundation;
pub use stabletable_runtime as runtime;
pub use stabletable_sort as sort;
pub use stabletable_storage as storage;
