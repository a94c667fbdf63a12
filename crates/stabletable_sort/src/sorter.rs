//! The multi-key row sorter.
//!
//! Each pass is two plain phases: a stable sort of one run by one key, then
//! a linear scan of the sorted run for maximal stretches of equal keys. Only
//! those stretches are handed to the next key.

use std::ops::Range;

use log::{debug, warn};
use stabletable_foundation::{CellValue, Error, ErrorKind, Result};
use stabletable_storage::{RowDescription, StableTable};

use crate::compare::{Comparator, comparator};
use crate::key::{SortKey, SortTarget};

/// Ranks every row of `table` by `keys`, highest priority first.
///
/// The result lists every row once; each description's `sort_order` is its
/// rank in the result. Rows that tie on every usable key keep their current
/// display order. A key whose kind has no comparator stops refinement there:
/// the ordering from earlier keys is kept and a warning is logged.
///
/// # Errors
///
/// Returns an invalid column identifier error if a key names a dead column,
/// or a type mismatch if a key's kind differs from its column's kind. Keys
/// are checked before any sorting happens.
pub fn sort_rows(table: &StableTable, keys: &[SortKey]) -> Result<Vec<RowDescription>> {
    for key in keys {
        check_key(table, key)?;
    }

    let mut rows = table.row_descriptions();
    if rows.len() < 2 || keys.is_empty() {
        return Ok(rows);
    }

    let mut runs = vec![0..rows.len()];
    for (level, key) in keys.iter().enumerate() {
        let Some(compare) = comparator(key.column_type()) else {
            let err = Error::new(ErrorKind::UnsupportedSortKeyType(key.column_type()));
            warn!("stopping sort at key {level}: {err}");
            break;
        };

        // Indexed by each row's display position before sorting.
        let values = key_values(table, &rows, key)?;
        let ranked = |a: &RowDescription, b: &RowDescription| {
            key.direction()
                .apply(compare(&values[a.sort_order], &values[b.sort_order]))
        };

        let mut ties = Vec::new();
        for run in runs {
            let slice = &mut rows[run.clone()];
            slice.sort_by(ranked);
            ties.extend(
                tie_runs(slice, &values, compare)
                    .map(|tie| run.start + tie.start..run.start + tie.end),
            );
        }

        debug!("sort key {level}: {} tie runs remain", ties.len());
        if ties.is_empty() {
            break;
        }
        runs = ties;
    }

    for (rank, row) in rows.iter_mut().enumerate() {
        row.sort_order = rank;
    }
    Ok(rows)
}

/// Sorts the table's rows by `keys` and commits the result as the new
/// display order, returning the new data version.
///
/// # Errors
///
/// Returns the same errors as [`sort_rows`]; the table is unchanged on error.
pub fn apply_sort(table: &mut StableTable, keys: &[SortKey]) -> Result<u64> {
    let order: Vec<_> = sort_rows(table, keys)?
        .into_iter()
        .map(|row| row.identifier)
        .collect();
    table.set_all_row_orders(&order)
}

fn check_key(table: &StableTable, key: &SortKey) -> Result<()> {
    if let SortTarget::Column(column) = key.target() {
        let actual = table.column_type(column)?;
        if actual != key.column_type() {
            return Err(Error::type_mismatch(actual, key.column_type()));
        }
    }
    Ok(())
}

/// Reads one key's value for every row, indexed by `sort_order`.
fn key_values(table: &StableTable, rows: &[RowDescription], key: &SortKey) -> Result<Vec<CellValue>> {
    let mut values = vec![CellValue::default_for(key.column_type()); rows.len()];
    for row in rows {
        values[row.sort_order] = match key.target() {
            SortTarget::Column(column) => table.cell_value(row.identifier, column)?,
            SortTarget::RowName => CellValue::String(row.name.clone()),
        };
    }
    Ok(values)
}

/// Finds maximal stretches of two or more adjacent rows with equal keys.
fn tie_runs<'a>(
    sorted: &'a [RowDescription],
    values: &'a [CellValue],
    compare: Comparator,
) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut start = 0;
    (1..=sorted.len()).filter_map(move |end| {
        let continues = end < sorted.len()
            && compare(
                &values[sorted[end - 1].sort_order],
                &values[sorted[end].sort_order],
            )
            .is_eq();
        if continues {
            return None;
        }
        let run = start..end;
        start = end;
        (run.len() > 1).then_some(run)
    })
}
