//! Integration tests for columns
//!
//! Tests column kinds, per-kind storage isolation, and object reference
//! type constraints.

use stabletable_foundation::{CellValue, ColumnType, ErrorKind, ObjectRef, RowId, Vec3};
use stabletable_storage::StableTable;

// =============================================================================
// Kind Isolation
// =============================================================================

#[test]
fn float_column_add_remove_leaves_others_untouched() {
    let mut table = StableTable::new();
    let name = table.add_column(ColumnType::String, "Name", None).unwrap();
    let hp = table.add_column(ColumnType::I32, "Hp", None).unwrap();
    let speed = table.add_column(ColumnType::F32, "Speed", None).unwrap();
    let rows = table.add_rows(3, "unit", None).unwrap();

    for (row, sentinel) in rows.iter().zip([-101_i32, -202, -303]) {
        table.set(*row, hp, sentinel).unwrap();
        table.set(*row, name, format!("s{sentinel}")).unwrap();
        table.set(*row, speed, 1.5_f32).unwrap();
    }
    let orders_before: Vec<_> = [name, hp, speed]
        .iter()
        .map(|c| table.column_order(*c).unwrap())
        .collect();

    let weight = table.add_column(ColumnType::F32, "Weight", Some(1)).unwrap();
    table.set(rows[0], weight, 9.0_f32).unwrap();
    table.remove_column(weight).unwrap();

    let orders_after: Vec<_> = [name, hp, speed]
        .iter()
        .map(|c| table.column_order(*c).unwrap())
        .collect();
    assert_eq!(orders_before, orders_after);
    assert_eq!(table.column_values::<i32>(hp).unwrap(), &[-101, -202, -303]);
    assert_eq!(table.get::<String>(rows[2], name).unwrap(), "s-303");
    assert_eq!(table.column_values::<f32>(speed).unwrap(), &[1.5, 1.5, 1.5]);
    table.validate().unwrap();
}

#[test]
fn removing_first_of_a_kind_keeps_the_rest_addressable() {
    let mut table = StableTable::new();
    let first = table.add_column(ColumnType::F32, "A", None).unwrap();
    let second = table.add_column(ColumnType::F32, "B", None).unwrap();
    let third = table.add_column(ColumnType::F32, "C", None).unwrap();
    let row = table.add_row("r", None).unwrap();
    table.set(row, second, 2.0_f32).unwrap();
    table.set(row, third, 3.0_f32).unwrap();

    table.remove_column(first).unwrap();

    assert_eq!(table.get::<f32>(row, second).unwrap(), 2.0);
    assert_eq!(table.get::<f32>(row, third).unwrap(), 3.0);
    assert_eq!(table.column_ids(), &[second, third]);
    table.validate().unwrap();
}

#[test]
fn freed_column_id_is_reissued() {
    let mut table = StableTable::new();
    let a = table.add_column(ColumnType::Bool, "a", None).unwrap();
    table.add_column(ColumnType::Bool, "b", None).unwrap();
    table.remove_column(a).unwrap();

    let c = table.add_column(ColumnType::U64, "c", None).unwrap();
    assert_eq!(c, a);
    assert_eq!(table.column_type(c).unwrap(), ColumnType::U64);
}

// =============================================================================
// Typed Access
// =============================================================================

#[test]
fn wrong_type_is_a_mismatch() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::Vec3, "Position", None).unwrap();
    let row = table.add_row("r", None).unwrap();

    let err = table.get::<f32>(row, column).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch { expected: ColumnType::Vec3, actual: ColumnType::F32 }
    ));

    let err = table.set_cell_value(row, column, CellValue::I32(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn dead_row_or_column_is_invalid() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::I8, "n", None).unwrap();
    let row = table.add_row("r", None).unwrap();

    let err = table.get::<i8>(RowId::new(5), column).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRowIdentifier(_)));

    table.remove_column(column).unwrap();
    let err = table.get::<i8>(row, column).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidColumnIdentifier(_)));
}

#[test]
fn text_access_uses_kind_format() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::Vec3, "Position", None).unwrap();
    let row = table.add_row("r", None).unwrap();

    table.set_cell_from_string(row, column, "1, 2, 3").unwrap();
    assert_eq!(table.get::<Vec3>(row, column).unwrap(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(table.cell_as_string(row, column).unwrap(), "1,2,3");

    assert!(table.set_cell_from_string(row, column, "1,2").is_err());
    assert_eq!(table.cell_as_string(row, column).unwrap(), "1,2,3");
}

#[test]
fn get_ref_borrows_strings() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::String, "Label", None).unwrap();
    let row = table.add_row("r", None).unwrap();
    table.set(row, column, "long label".to_string()).unwrap();

    assert_eq!(table.get_ref::<String>(row, column).unwrap().as_str(), "long label");
}

// =============================================================================
// Names and Constraints
// =============================================================================

#[test]
fn find_column_by_name_uses_display_order() {
    let mut table = StableTable::new();
    let first = table.add_column(ColumnType::I32, "Dup", None).unwrap();
    let second = table.add_column(ColumnType::I32, "Dup", None).unwrap();
    assert_eq!(table.find_column_by_name("Dup"), Some(first));

    table.set_column_order(second, 0).unwrap();
    assert_eq!(table.find_column_by_name("Dup"), Some(second));
    assert_eq!(table.find_column_by_name("Missing"), None);
}

#[test]
fn column_descriptions_carry_kind() {
    let mut table = StableTable::new();
    table.add_column(ColumnType::Color, "Tint", None).unwrap();
    let hash = table.add_column(ColumnType::Hash128, "Guid", Some(0)).unwrap();

    let descriptions = table.column_descriptions().unwrap();
    assert_eq!(descriptions.len(), 2);
    assert_eq!(descriptions[0].identifier, hash);
    assert_eq!(descriptions[0].column_type, ColumnType::Hash128);
    assert_eq!(descriptions[1].name, "Tint");
    assert_eq!(descriptions[1].sort_order, 1);
    assert_eq!(table.column_description_by_order(0).unwrap(), descriptions[0]);
}

#[test]
fn object_ref_constraint() {
    let mut table = StableTable::new();
    let mesh = table.add_column(ColumnType::ObjectRef, "Mesh", None).unwrap();
    let other = table.add_column(ColumnType::ObjectRef, "Icon", None).unwrap();
    let row = table.add_row("r", None).unwrap();

    assert_eq!(table.type_constraint(mesh).unwrap(), "");
    table.set_type_constraint(mesh, "Mesh").unwrap();
    table.set_type_constraint(other, "Texture2D").unwrap();
    table.set(row, other, ObjectRef::new("icons/sword")).unwrap();

    table.remove_column(mesh).unwrap();
    assert_eq!(table.type_constraint(other).unwrap(), "Texture2D");
    assert_eq!(table.get::<ObjectRef>(row, other).unwrap(), ObjectRef::new("icons/sword"));
    table.validate().unwrap();
}

#[test]
fn constraint_on_plain_column_is_a_mismatch() {
    let mut table = StableTable::new();
    let column = table.add_column(ColumnType::String, "Label", None).unwrap();
    let err = table.set_type_constraint(column, "Mesh").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch { expected: ColumnType::ObjectRef, actual: ColumnType::String }
    ));
}
