//! Multi-key stable row sorting for StableTable.
//!
//! Rows are ranked by the first key; rows that tie on it are refined by the
//! next key within their tie run only, and so on until no ties remain or the
//! keys run out. Sorting reads the table through its public API and never
//! mutates it, except through [`apply_sort`].
//!
//! This crate provides:
//! - [`SortKey`] / [`SortDirection`] - What to sort by
//! - [`comparator`] - The per-kind comparator registry
//! - [`sort_rows`] / [`apply_sort`] - The sorter

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compare;
pub mod key;
pub mod sorter;

pub use compare::{Comparator, comparator};
pub use key::{SortDirection, SortKey, SortTarget};
pub use sorter::{apply_sort, sort_rows};
