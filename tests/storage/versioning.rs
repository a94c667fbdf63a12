//! Integration tests for the data version
//!
//! Every successful mutation bumps the version once; reads and failed calls
//! leave it alone.

use stabletable_foundation::{CellValue, ColumnType, RowId};
use stabletable_storage::StableTable;

// =============================================================================
// Mutations
// =============================================================================

#[test]
fn every_mutation_increases_the_version() {
    let mut table = StableTable::new();
    let mut last = table.data_version();
    let mut check = |table: &StableTable| {
        assert!(table.data_version() > last);
        last = table.data_version();
    };

    let column = table.add_column(ColumnType::I32, "n", None).unwrap();
    check(&table);
    let row = table.add_row("a", None).unwrap();
    check(&table);
    let other = table.add_row("b", None).unwrap();
    check(&table);
    table.set(row, column, 4_i32).unwrap();
    check(&table);
    table.set_cell_value(row, column, CellValue::I32(5)).unwrap();
    check(&table);
    table.set_cell_from_string(row, column, "6").unwrap();
    check(&table);
    table.set_row_name(row, "renamed").unwrap();
    check(&table);
    table.set_column_name(column, "m").unwrap();
    check(&table);
    table.set_row_order(row, 1).unwrap();
    check(&table);
    table.set_all_row_orders(&[row, other]).unwrap();
    check(&table);
    table.set_column_order(column, 0).unwrap();
    check(&table);
    table.remove_row(other).unwrap();
    check(&table);
    table.remove_column(column).unwrap();
    check(&table);
}

#[test]
fn setters_return_the_new_version() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::Bool, "flag", None).unwrap();
    let row = table.add_row("a", None).unwrap();

    let version = table.set(row, column, true).unwrap();
    assert_eq!(version, table.data_version());
}

#[test]
fn batch_add_is_one_mutation() {
    let mut table = StableTable::new();
    let before = table.data_version();
    table.add_rows(10, "r", None).unwrap();
    assert_eq!(table.data_version(), before + 1);

    table.add_rows(0, "r", None).unwrap();
    assert_eq!(table.data_version(), before + 1);
}

// =============================================================================
// Reads and Failures
// =============================================================================

#[test]
fn reads_leave_the_version_alone() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::String, "s", None).unwrap();
    let row = table.add_row("a", None).unwrap();
    let version = table.data_version();

    let _ = table.get::<String>(row, column).unwrap();
    let _ = table.cell_value(row, column).unwrap();
    let _ = table.cell_as_string(row, column).unwrap();
    let _ = table.row_descriptions();
    let _ = table.column_descriptions().unwrap();
    let _ = table.row_description_by_order(0).unwrap();
    let _ = table.find_column_by_name("s");

    assert_eq!(table.data_version(), version);
}

#[test]
fn failed_calls_leave_the_version_alone() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::U8, "n", None).unwrap();
    let row = table.add_row("a", None).unwrap();
    let version = table.data_version();

    assert!(table.set(RowId::new(9), column, 1_u8).is_err());
    assert!(table.set(row, column, 1_i32).is_err());
    assert!(table.set_cell_from_string(row, column, "300").is_err());
    assert!(table.remove_row(RowId::new(9)).is_err());
    assert!(table.set_row_order(row, 4).is_err());

    assert_eq!(table.data_version(), version);
    assert_eq!(table.get::<u8>(row, column).unwrap(), 0);
}
