//! Identifiers, value kinds, cell values, and errors for StableTable.
//!
//! This crate provides:
//! - [`RowId`] / [`ColumnId`] - Stable identifiers independent of storage position
//! - [`ColumnType`] - The closed set of value kinds a column can hold
//! - [`CellValue`] - A type-erased cell, used at text and sort boundaries
//! - Geometric value kinds ([`Vec2`], [`Rect`], [`Bounds`], ...)
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use geometry::{Bounds, BoundsI, Color, Quaternion, Rect, RectI, Vec2, Vec2I, Vec3, Vec3I, Vec4};
pub use id::{ColumnId, RowId};
pub use types::ColumnType;
pub use value::{CellValue, EnumValue, Hash128, ObjectRef, TextForm};
