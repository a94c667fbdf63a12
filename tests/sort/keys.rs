//! Integration tests for sort keys
//!
//! Tests key construction, validation against the table, and unsupported kinds.

use stabletable_foundation::{ColumnId, ColumnType, ErrorKind, Rect};
use stabletable_sort::key::ROW_NAME_RAW_ID;
use stabletable_sort::{SortDirection, SortKey, SortTarget, comparator, sort_rows};
use stabletable_storage::StableTable;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn raw_marker_selects_row_name() {
    let key = SortKey::from_raw(ROW_NAME_RAW_ID, ColumnType::String, SortDirection::Descending).unwrap();
    assert_eq!(key.target(), SortTarget::RowName);
    assert_eq!(key.direction(), SortDirection::Descending);

    let key = SortKey::from_raw(4, ColumnType::I32, SortDirection::Ascending).unwrap();
    assert_eq!(key.target(), SortTarget::Column(ColumnId::new(4)));
}

#[test]
fn negative_raw_column_is_rejected() {
    let err = SortKey::from_raw(-1, ColumnType::I32, SortDirection::Ascending).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOrderArgument(_)));
}

#[test]
fn comparable_kinds() {
    assert!(comparator(ColumnType::String).is_some());
    assert!(comparator(ColumnType::Hash128).is_some());
    assert!(comparator(ColumnType::Enum).is_some());
    assert!(comparator(ColumnType::Vec3).is_none());
    assert!(comparator(ColumnType::ObjectRef).is_none());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn dead_column_key_fails() {
    let mut table = StableTable::new();
    table.add_rows(2, "r", None).unwrap();
    let key = SortKey::column(ColumnId::new(0), ColumnType::I32, SortDirection::Ascending);

    let err = sort_rows(&table, &[key]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidColumnIdentifier(_)));
}

#[test]
fn key_kind_must_match_column() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::F32, "Speed", None).unwrap();
    let key = SortKey::column(column, ColumnType::F64, SortDirection::Ascending);

    let err = sort_rows(&table, &[key]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch { expected: ColumnType::F32, actual: ColumnType::F64 }
    ));
}

#[test]
fn unsupported_kind_keeps_earlier_ordering() {
    let mut table = StableTable::new();
    let tier = table.add_column(ColumnType::U8, "Tier", None).unwrap();
    let area = table.add_column(ColumnType::Rect, "Area", None).unwrap();
    let rows = table.add_rows(3, "r", None).unwrap();
    table.set(rows[0], tier, 2_u8).unwrap();
    table.set(rows[1], tier, 1_u8).unwrap();
    table.set(rows[2], tier, 1_u8).unwrap();
    table.set(rows[1], area, Rect::new(9.0, 9.0, 1.0, 1.0)).unwrap();

    let keys = [
        SortKey::column(tier, ColumnType::U8, SortDirection::Ascending),
        SortKey::column(area, ColumnType::Rect, SortDirection::Ascending),
        SortKey::row_name(SortDirection::Descending),
    ];
    let sorted = sort_rows(&table, &keys).unwrap();

    // Refinement stops at the rect key, so the tier tie keeps display order.
    let ids: Vec<_> = sorted.iter().map(|d| d.identifier).collect();
    assert_eq!(ids, vec![rows[1], rows[2], rows[0]]);
}

#[test]
fn no_keys_keeps_display_order() {
    let mut table = StableTable::new();
    let rows = table.add_rows(3, "r", None).unwrap();
    let ids: Vec<_> = sort_rows(&table, &[]).unwrap().into_iter().map(|d| d.identifier).collect();
    assert_eq!(ids, rows);
}
