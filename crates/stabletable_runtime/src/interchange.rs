//! Import logic shared by the CSV and JSON formats.
//!
//! Both formats are read completely into [`ImportRecord`]s before the table
//! is touched, so a malformed document fails without partial changes. Cell
//! text that does not parse is recoverable: the cell keeps its value and the
//! problem is recorded in the report.

use std::collections::HashSet;

use log::{debug, warn};
use stabletable_foundation::{ColumnId, Error, ErrorContext, Result, RowId};
use stabletable_storage::StableTable;

use crate::options::{CellWarning, ImportOptions, ImportReport};

/// Header of the row identifier field in CSV documents.
pub const ROW_IDENTIFIER_HEADER: &str = "Row Identifier";

/// Header of the row name field in CSV documents.
pub const ROW_NAME_HEADER: &str = "Row Name";

/// One data record of an imported document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ImportRecord {
    /// 1-based record number in the source, header included.
    pub record: u64,
    /// Row to update, or `None` to create one.
    pub identifier: Option<RowId>,
    pub name: String,
    /// Cell text in column display order.
    pub data: Vec<String>,
}

/// Parses a row identifier field; blank means "new row".
pub(crate) fn parse_identifier(text: &str, source: &str, record: u64) -> Result<Option<RowId>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u32>().map(|raw| Some(RowId::new(raw))).map_err(|_| {
        Error::interchange(format!("row identifier {text:?} is not a number")).with_context(
            ErrorContext::new()
                .with_source(source)
                .with_record(record)
                .with_field(ROW_IDENTIFIER_HEADER),
        )
    })
}

/// Applies parsed records to the table.
///
/// Identifiers match only rows that existed before the import started; a
/// row created by an earlier record is never the target of a later one.
pub(crate) fn apply_records(
    table: &mut StableTable,
    records: Vec<ImportRecord>,
    source: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let columns = table.column_ids().to_vec();
    let existing_rows: HashSet<RowId> = table.row_ids().iter().copied().collect();
    let mut report = ImportReport::default();
    let mut seen = HashSet::new();

    for record in records {
        let existing = record.identifier.filter(|id| existing_rows.contains(id));
        let row = match existing {
            Some(row) => {
                if options.update_row_names && table.row_name(row)? != record.name {
                    table.set_row_name(row, record.name.as_str())?;
                }
                report.updated.push(row);
                row
            }
            None if options.create_missing_rows => {
                let row = table.add_row(record.name.as_str(), None)?;
                if let Some(requested) = record.identifier {
                    debug!("record {} names unknown row {requested}; created row {row}", record.record);
                }
                report.created.push(row);
                row
            }
            None => {
                skip(&mut report, &record, None, None, "no matching row; record skipped".to_string());
                continue;
            }
        };
        seen.insert(row);

        for (position, text) in record.data.iter().enumerate() {
            let Some(&column) = columns.get(position) else {
                let message = format!("surplus field {} ignored", position + 1);
                skip(&mut report, &record, Some(row), None, message);
                continue;
            };
            if let Err(err) = table.set_cell_from_string(row, column, text) {
                let context = ErrorContext::new()
                    .with_source(source)
                    .with_record(record.record)
                    .with_field(table.column_name(column)?);
                skip(&mut report, &record, Some(row), Some(column), format!("{err} {context}"));
            }
        }
    }

    if options.remove_missing_rows {
        let missing: Vec<RowId> = table
            .row_ids()
            .iter()
            .copied()
            .filter(|row| !seen.contains(row))
            .collect();
        for row in missing {
            table.remove_row(row)?;
            report.removed.push(row);
        }
    }

    debug!("imported {source}: {report}");
    Ok(report)
}

fn skip(
    report: &mut ImportReport,
    record: &ImportRecord,
    row: Option<RowId>,
    column: Option<ColumnId>,
    message: String,
) {
    let warning = CellWarning {
        record: record.record,
        row,
        column,
        message,
    };
    warn!("{warning}");
    report.warnings.push(warning);
}
