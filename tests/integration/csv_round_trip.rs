//! CSV export and import across every column kind.

use stabletable_foundation::{
    CellValue, Color, ColumnId, ColumnType, EnumValue, Hash128, ObjectRef, Quaternion, RowId, Vec3,
};
use stabletable_runtime::{ImportOptions, export_csv, import_csv};
use stabletable_storage::StableTable;

/// A table with one column of every kind and three rows.
fn every_kind() -> (StableTable, Vec<RowId>) {
    let mut table = StableTable::new();
    for ty in ColumnType::ALL {
        table.add_column(ty, ty.name(), None).unwrap();
    }
    let rows = table.add_rows(3, "row", None).unwrap();
    (table, rows)
}

fn column(table: &StableTable, ty: ColumnType) -> ColumnId {
    table.find_column_by_name(ty.name()).unwrap()
}

fn fill(table: &mut StableTable, rows: &[RowId]) {
    let text = column(table, ColumnType::String);
    table.set(rows[0], text, "comma, \"quote\"\nnewline".to_string()).unwrap();
    let speed = column(table, ColumnType::F32);
    table.set(rows[0], speed, 0.1_f32).unwrap();
    table.set(rows[1], speed, -3.402_823_5e38_f32).unwrap();
    let mass = column(table, ColumnType::F64);
    table.set(rows[2], mass, 1.0 / 3.0).unwrap();
    let big = column(table, ColumnType::U64);
    table.set(rows[1], big, u64::MAX).unwrap();
    let position = column(table, ColumnType::Vec3);
    table.set(rows[1], position, Vec3::new(-0.5, 1e-7, 42.0)).unwrap();
    let rotation = column(table, ColumnType::Quaternion);
    table.set(rows[2], rotation, Quaternion::new(0.0, 0.707_106_77, 0.0, 0.707_106_77)).unwrap();
    let tint = column(table, ColumnType::Color);
    table.set(rows[0], tint, Color::new(1.0, 0.5, 0.25, 1.0)).unwrap();
    let hash = column(table, ColumnType::Hash128);
    table.set(rows[2], hash, Hash128(u128::MAX - 7)).unwrap();
    let kind = column(table, ColumnType::Enum);
    table.set(rows[1], kind, EnumValue(-3)).unwrap();
    let mesh = column(table, ColumnType::ObjectRef);
    table.set(rows[0], mesh, ObjectRef::new("Assets/Meshes/crate.fbx")).unwrap();
    let initial = column(table, ColumnType::Char);
    table.set(rows[1], initial, 'λ').unwrap();
}

fn export(table: &StableTable) -> String {
    let mut out = Vec::new();
    export_csv(table, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn assert_same_cells(left: &StableTable, right: &StableTable) {
    assert_eq!(left.row_ids(), right.row_ids());
    for row in left.row_ids() {
        assert_eq!(left.row_name(*row).unwrap(), right.row_name(*row).unwrap());
        for column in left.column_ids() {
            assert_eq!(
                left.cell_value(*row, *column).unwrap(),
                right.cell_value(*row, *column).unwrap(),
                "row {row}, column {}",
                left.column_name(*column).unwrap()
            );
        }
    }
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn every_kind_survives_export_and_import() {
    let (mut original, rows) = every_kind();
    fill(&mut original, &rows);
    let text = export(&original);

    let (mut copy, _) = every_kind();
    let report = import_csv(&mut copy, text.as_bytes(), "every_kind.csv", &ImportOptions::default()).unwrap();

    assert!(report.is_clean(), "{:?}", report.warnings);
    assert_eq!(report.updated, rows);
    assert!(report.created.is_empty());
    assert_same_cells(&original, &copy);
}

#[test]
fn exported_text_is_stable() {
    let (mut table, rows) = every_kind();
    fill(&mut table, &rows);
    let once = export(&table);

    let (mut copy, _) = every_kind();
    import_csv(&mut copy, once.as_bytes(), "t.csv", &ImportOptions::default()).unwrap();

    assert_eq!(export(&copy), once);
}

#[test]
fn identifiers_survive_into_a_fresh_table() {
    let (mut original, rows) = every_kind();
    original.remove_row(rows[0]).unwrap();
    let text = export(&original);

    // Row 0 is free in the target too, so the surviving ids are matched.
    let (mut copy, copy_rows) = every_kind();
    copy.remove_row(copy_rows[0]).unwrap();
    let report = import_csv(&mut copy, text.as_bytes(), "t.csv", &ImportOptions::mirror()).unwrap();

    assert_eq!(report.updated, vec![rows[1], rows[2]]);
    assert!(report.removed.is_empty());
    assert_eq!(copy.row_ids(), &[rows[1], rows[2]]);
}

// =============================================================================
// Recoverable Problems
// =============================================================================

#[test]
fn bad_cells_warn_and_keep_values() {
    let mut table = StableTable::new();
    let hp = table.add_column(ColumnType::I16, "Hp", None).unwrap();
    let alive = table.add_column(ColumnType::Bool, "Alive", None).unwrap();
    let row = table.add_row("orc", None).unwrap();
    table.set(row, hp, 12_i16).unwrap();

    let text = "Row Identifier,Row Name,Hp,Alive\n0,orc,lots,yes\n";
    let report = import_csv(&mut table, text.as_bytes(), "orcs.csv", &ImportOptions::default()).unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().all(|w| w.record == 2 && w.row == Some(row)));
    assert!(report.warnings[0].message.contains("orcs.csv"));
    assert_eq!(table.get::<i16>(row, hp).unwrap(), 12);
    assert!(!table.get::<bool>(row, alive).unwrap());
}

#[test]
fn short_records_leave_trailing_cells_alone() {
    let mut table = StableTable::new();
    let a = table.add_column(ColumnType::I32, "A", None).unwrap();
    let b = table.add_column(ColumnType::I32, "B", None).unwrap();
    let row = table.add_row("r", None).unwrap();
    table.set(row, b, 8_i32).unwrap();

    let text = "Row Identifier,Row Name,A\n0,r,5\n";
    let report = import_csv(&mut table, text.as_bytes(), "t.csv", &ImportOptions::default()).unwrap();

    assert!(report.is_clean());
    assert_eq!(table.get::<i32>(row, a).unwrap(), 5);
    assert_eq!(table.get::<i32>(row, b).unwrap(), 8);
}

#[test]
fn quaternion_cells_default_to_identity() {
    let (table, rows) = every_kind();
    let rotation = column(&table, ColumnType::Quaternion);
    assert_eq!(
        table.cell_value(rows[0], rotation).unwrap(),
        CellValue::Quaternion(Quaternion::IDENTITY)
    );
}
