//! Integration tests for rows
//!
//! Tests adding, removing, naming, and describing rows.

use stabletable_foundation::{ColumnType, ErrorKind, RowId, Vec2};
use stabletable_storage::{StableTable, TableConfig};

// =============================================================================
// Add / Remove
// =============================================================================

#[test]
fn new_rows_hold_default_values() {
    let mut table = StableTable::new();
    let count = table.add_column(ColumnType::U16, "Count", None).unwrap();
    let offset = table.add_column(ColumnType::Vec2, "Offset", None).unwrap();

    let row = table.add_row("first", None).unwrap();

    assert_eq!(table.get::<u16>(row, count).unwrap(), 0);
    assert_eq!(table.get::<Vec2>(row, offset).unwrap(), Vec2::default());
}

#[test]
fn add_then_remove_restores_count_and_frees_id() {
    let mut table = StableTable::new();
    table.add_rows(3, "row", None).unwrap();
    let before = table.row_count();

    let row = table.add_row("temp", None).unwrap();
    table.remove_row(row).unwrap();

    assert_eq!(table.row_count(), before);
    assert!(!table.contains_row(row));
    let again = table.add_row("again", None).unwrap();
    assert_eq!(again, row);
    table.validate().unwrap();
}

#[test]
fn insert_at_position() {
    let mut table = StableTable::new();
    let a = table.add_row("a", None).unwrap();
    let c = table.add_row("c", None).unwrap();

    let b = table.add_row("b", Some(1)).unwrap();

    assert_eq!(table.row_ids(), &[a, b, c]);
    assert_eq!(table.row_order(c).unwrap(), 2);
}

#[test]
fn insert_past_end_is_rejected() {
    let mut table = StableTable::new();
    let err = table.add_row("x", Some(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOrderArgument(_)));
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.data_version(), 0);
}

#[test]
fn batch_rows_are_named_by_index() {
    let mut table = StableTable::with_config(TableConfig::small());
    table.add_row("head", None).unwrap();

    let rows = table.add_rows(3, "enemy_", Some(0)).unwrap();

    let names: Vec<_> = table.row_descriptions().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["enemy_0", "enemy_1", "enemy_2", "head"]);
    assert_eq!(table.row_ids()[..3], rows[..]);
}

#[test]
fn removing_a_dead_row_fails() {
    let mut table = StableTable::new();
    let row = table.add_row("a", None).unwrap();
    table.remove_row(row).unwrap();

    let err = table.remove_row(row).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRowIdentifier(id) if id == row));
}

#[test]
fn removal_keeps_other_rows_values() {
    let mut table = StableTable::new();
    let score = table.add_column(ColumnType::I64, "Score", None).unwrap();
    let rows = table.add_rows(4, "r", None).unwrap();
    for (row, value) in rows.iter().zip([0_i64, 10, 20, 30]) {
        table.set(*row, score, value).unwrap();
    }

    table.remove_row(rows[1]).unwrap();

    assert_eq!(table.get::<i64>(rows[0], score).unwrap(), 0);
    assert_eq!(table.get::<i64>(rows[2], score).unwrap(), 20);
    assert_eq!(table.get::<i64>(rows[3], score).unwrap(), 30);
    assert_eq!(table.column_values::<i64>(score).unwrap(), &[0, 20, 30]);
}

// =============================================================================
// Names and Descriptions
// =============================================================================

#[test]
fn rename_row() {
    let mut table = StableTable::new();
    let row = table.add_row("old", None).unwrap();
    table.set_row_name(row, "new").unwrap();
    assert_eq!(table.row_name(row).unwrap(), "new");
}

#[test]
fn description_reports_order() {
    let mut table = StableTable::new();
    table.add_rows(2, "r", None).unwrap();
    let row = table.add_row("last", None).unwrap();

    let description = table.row_description(row).unwrap();
    assert_eq!(description.identifier, row);
    assert_eq!(description.name, "last");
    assert_eq!(description.sort_order, 2);
    assert_eq!(table.row_description_by_order(2).unwrap(), description);
}

#[test]
fn description_by_order_out_of_range() {
    let table = StableTable::new();
    let err = table.row_description_by_order(0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOrderArgument(_)));
}

#[test]
fn unknown_row_is_invalid() {
    let table = StableTable::new();
    assert!(table.row_name(RowId::new(3)).unwrap_err().is_invalid_identifier());
}
