//! JSON import and export.
//!
//! The document mirrors the CSV layout with explicit column kinds:
//!
//! ```json
//! {
//!   "Headers": ["Priority", "Position"],
//!   "Types": ["i32", "vec3"],
//!   "Rows": [{ "Identifier": 0, "Name": "alpha", "Data": ["3", "1,2.5,-3"] }]
//! }
//! ```
//!
//! A row with a null or missing `Identifier` becomes a new row on import.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use stabletable_foundation::{ColumnType, Error, ErrorContext, ErrorKind, Result, RowId};
use stabletable_storage::StableTable;

use crate::interchange::{ImportRecord, apply_records};
use crate::options::{CellWarning, ImportOptions, ImportReport};

/// A whole table as a JSON document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDocument {
    /// Column names in display order.
    pub headers: Vec<String>,
    /// Column kind names, parallel to `headers`.
    #[serde(default)]
    pub types: Vec<String>,
    /// Rows in display order.
    pub rows: Vec<RowDocument>,
}

/// One row of a [`TableDocument`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RowDocument {
    /// Row identifier, or `None` for a row that does not exist yet.
    #[serde(default)]
    pub identifier: Option<u32>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Cell text in column display order.
    #[serde(default)]
    pub data: Vec<String>,
}

impl TableDocument {
    /// Captures every row and column of `table` in display order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the table is internally inconsistent.
    pub fn from_table(table: &StableTable) -> Result<Self> {
        let columns = table.column_ids();
        let mut headers = Vec::with_capacity(columns.len());
        let mut types = Vec::with_capacity(columns.len());
        for column in columns {
            headers.push(table.column_name(*column)?.to_string());
            types.push(table.column_type(*column)?.name().to_string());
        }

        let mut rows = Vec::with_capacity(table.row_count());
        for row in table.row_ids() {
            let data = columns
                .iter()
                .map(|column| table.cell_as_string(*row, *column))
                .collect::<Result<Vec<_>>>()?;
            rows.push(RowDocument {
                identifier: Some(row.raw()),
                name: table.row_name(*row)?.to_string(),
                data,
            });
        }

        Ok(Self {
            headers,
            types,
            rows,
        })
    }
}

/// Writes every row of `table` as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if writing fails.
pub fn export_json<W: Write>(table: &StableTable, writer: W) -> Result<()> {
    let document = TableDocument::from_table(table)?;
    serde_json::to_writer_pretty(writer, &document)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Reads a JSON document into `table`, matching rows by identifier.
///
/// Declared column kinds that differ from the table's are reported as
/// warnings; their cells are still attempted.
///
/// # Errors
///
/// Returns an interchange error if the document is not valid JSON or does
/// not have the expected shape. Nothing is changed in that case.
pub fn import_json<R: Read>(
    table: &mut StableTable,
    reader: R,
    source: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let document: TableDocument = serde_json::from_reader(reader).map_err(|e| {
        Error::interchange(e.to_string()).with_context(ErrorContext::new().with_source(source))
    })?;
    import_document(table, document, source, options)
}

/// Applies an already parsed document to `table`.
///
/// # Errors
///
/// Returns an error only if the table is internally inconsistent.
pub fn import_document(
    table: &mut StableTable,
    document: TableDocument,
    source: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let mut warnings = check_types(table, &document.types)?;

    // Record 1 is the document header, matching CSV numbering.
    let records = document
        .rows
        .into_iter()
        .zip(2u64..)
        .map(|(row, record)| ImportRecord {
            record,
            identifier: row.identifier.map(RowId::new),
            name: row.name,
            data: row.data,
        })
        .collect();

    let mut report = apply_records(table, records, source, options)?;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

fn check_types(table: &StableTable, declared: &[String]) -> Result<Vec<CellWarning>> {
    let mut warnings = Vec::new();
    for (name, column) in declared.iter().zip(table.column_ids()) {
        let actual = table.column_type(*column)?;
        let message = match name.parse::<ColumnType>() {
            Ok(ty) if ty == actual => continue,
            Ok(ty) => Error::type_mismatch(actual, ty).to_string(),
            Err(err) => err.to_string(),
        };
        let warning = CellWarning {
            record: 1,
            row: None,
            column: Some(*column),
            message,
        };
        log::warn!("{warning}");
        warnings.push(warning);
    }
    Ok(warnings)
}
