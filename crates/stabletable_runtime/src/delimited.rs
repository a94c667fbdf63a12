//! CSV import and export.
//!
//! Layout: a header record `Row Identifier, Row Name, <column names...>`
//! followed by one record per row, both in display order. Cells use each
//! kind's text form, so composite values such as `1,2,3` are quoted.

use std::io::{Read, Write};

use log::warn;
use stabletable_foundation::{Error, ErrorContext, ErrorKind, Result};
use stabletable_storage::StableTable;

use crate::interchange::{
    ImportRecord, ROW_IDENTIFIER_HEADER, ROW_NAME_HEADER, apply_records, parse_identifier,
};
use crate::options::{CellWarning, ImportOptions, ImportReport};

/// Writes every row of `table` as CSV.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn export_csv<W: Write>(table: &StableTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(false).from_writer(writer);

    let columns = table.column_ids();
    let mut header = vec![ROW_IDENTIFIER_HEADER.to_string(), ROW_NAME_HEADER.to_string()];
    for column in columns {
        header.push(table.column_name(*column)?.to_string());
    }
    csv_writer.write_record(&header).map_err(csv_error)?;

    let mut record = Vec::with_capacity(header.len());
    for row in table.row_ids() {
        record.clear();
        record.push(row.to_string());
        record.push(table.row_name(*row)?.to_string());
        for column in columns {
            record.push(table.cell_as_string(*row, *column)?);
        }
        csv_writer.write_record(&record).map_err(csv_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::new(ErrorKind::IoError(format!("failed to flush CSV: {e}"))))
}

/// Reads CSV into `table`, matching records to rows by identifier.
///
/// `source` names the document in warnings and errors. Records whose fields
/// are all empty are ignored and reported as warnings.
///
/// # Errors
///
/// Returns an interchange error if the document is empty, malformed, or
/// has a non-numeric row identifier. Nothing is changed in that case.
pub fn import_csv<R: Read>(
    table: &mut StableTable,
    reader: R,
    source: &str,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let (records, blank) = read_records(reader, source)?;
    let mut report = apply_records(table, records, source, options)?;
    for record in blank {
        let warning = CellWarning {
            record,
            row: None,
            column: None,
            message: "blank record ignored".to_string(),
        };
        warn!("{source}: {warning}");
        report.warnings.push(warning);
    }
    Ok(report)
}

/// Parses every data record, returning them with the numbers of blank ones.
fn read_records<R: Read>(reader: R, source: &str) -> Result<(Vec<ImportRecord>, Vec<u64>)> {
    // Headers are handled here so record numbers count the header line.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = csv_reader.records();
    match rows.next() {
        Some(header) => {
            let header = header.map_err(|e| located(csv_error(e), source, 1))?;
            if header.len() < 2 {
                return Err(located(
                    Error::interchange(format!(
                        "header must start with {ROW_IDENTIFIER_HEADER:?} and {ROW_NAME_HEADER:?}"
                    )),
                    source,
                    1,
                ));
            }
        }
        None => {
            return Err(Error::interchange("CSV document is empty")
                .with_context(ErrorContext::new().with_source(source)));
        }
    }

    let mut records = Vec::new();
    let mut blank = Vec::new();
    for (index, row) in rows.enumerate() {
        let number = index as u64 + 2;
        let row = row.map_err(|e| located(csv_error(e), source, number))?;
        if row.iter().all(str::is_empty) {
            blank.push(number);
            continue;
        }
        let identifier = parse_identifier(row.get(0).unwrap_or_default(), source, number)?;
        records.push(ImportRecord {
            record: number,
            identifier,
            name: row.get(1).unwrap_or_default().to_string(),
            data: row.iter().skip(2).map(ToString::to_string).collect(),
        });
    }
    Ok((records, blank))
}

fn csv_error(err: csv::Error) -> Error {
    if err.is_io_error() {
        Error::new(ErrorKind::IoError(err.to_string()))
    } else {
        Error::interchange(err.to_string())
    }
}

fn located(err: Error, source: &str, record: u64) -> Error {
    err.with_context(ErrorContext::new().with_source(source).with_record(record))
}
