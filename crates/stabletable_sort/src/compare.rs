//! Comparator registry.
//!
//! Only scalar kinds have a natural order. Composite kinds (vectors, rects,
//! bounds, object references) have no comparator and stop refinement when
//! used as a key.

use std::cmp::Ordering;

use stabletable_foundation::{CellValue, ColumnType};

/// Ascending comparison of two cells of the same kind.
pub type Comparator = fn(&CellValue, &CellValue) -> Ordering;

/// Returns the comparator for a kind, if it has one.
#[must_use]
pub fn comparator(column_type: ColumnType) -> Option<Comparator> {
    match column_type {
        ColumnType::String => Some(compare_strings),
        ColumnType::Char => Some(compare_chars),
        ColumnType::Bool => Some(compare_bools),
        ColumnType::I8
        | ColumnType::U8
        | ColumnType::I16
        | ColumnType::U16
        | ColumnType::I32
        | ColumnType::U32
        | ColumnType::I64
        | ColumnType::U64
        | ColumnType::Enum => Some(compare_integers),
        ColumnType::F32 | ColumnType::F64 => Some(compare_floats),
        ColumnType::Hash128 => Some(compare_hashes),
        _ => None,
    }
}

/// Ordinal comparison.
fn compare_strings(a: &CellValue, b: &CellValue) -> Ordering {
    a.as_str().cmp(&b.as_str())
}

fn compare_chars(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Char(a), CellValue::Char(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn compare_bools(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn compare_integers(a: &CellValue, b: &CellValue) -> Ordering {
    a.as_integer().cmp(&b.as_integer())
}

/// IEEE total order: `-NaN < -inf < ... < -0 < +0 < ... < inf < NaN`.
fn compare_floats(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_float(), b.as_float()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => Ordering::Equal,
    }
}

fn compare_hashes(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Hash128(a), CellValue::Hash128(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
