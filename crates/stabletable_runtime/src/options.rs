//! Import options and reports.

use std::fmt;

use stabletable_foundation::{ColumnId, RowId};

/// Configuration for CSV and JSON import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Remove table rows that the imported document does not mention.
    pub remove_missing_rows: bool,

    /// Create rows for records with a blank or unknown identifier.
    /// When false such records are skipped with a warning.
    pub create_missing_rows: bool,

    /// Overwrite the names of matched rows with the imported names.
    pub update_row_names: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            remove_missing_rows: false,
            create_missing_rows: true,
            update_row_names: true,
        }
    }
}

impl ImportOptions {
    /// Creates options that make the table mirror the document exactly.
    #[must_use]
    pub fn mirror() -> Self {
        Self {
            remove_missing_rows: true,
            ..Self::default()
        }
    }

    /// Creates options that only update rows the table already has.
    #[must_use]
    pub fn update_only() -> Self {
        Self {
            remove_missing_rows: false,
            create_missing_rows: false,
            update_row_names: true,
        }
    }

    /// Builder method to enable/disable removal of unmentioned rows.
    #[must_use]
    pub fn with_remove_missing_rows(mut self, remove: bool) -> Self {
        self.remove_missing_rows = remove;
        self
    }

    /// Builder method to enable/disable creation of new rows.
    #[must_use]
    pub fn with_create_missing_rows(mut self, create: bool) -> Self {
        self.create_missing_rows = create;
        self
    }

    /// Builder method to enable/disable row renaming.
    #[must_use]
    pub fn with_update_row_names(mut self, update: bool) -> Self {
        self.update_row_names = update;
        self
    }
}

/// A record or cell the importer skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWarning {
    /// 1-based record number in the source document.
    pub record: u64,
    /// Row the record was applied to, if any.
    pub row: Option<RowId>,
    /// Column the field targeted, if it maps to one.
    pub column: Option<ColumnId>,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for CellWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}", self.record)?;
        if let Some(row) = self.row {
            write!(f, ", row {row}")?;
        }
        if let Some(column) = self.column {
            write!(f, ", column {column}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// What an import changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows created for unmatched records, in document order.
    pub created: Vec<RowId>,
    /// Existing rows the document matched, in document order.
    pub updated: Vec<RowId>,
    /// Rows removed because the document did not mention them.
    pub removed: Vec<RowId>,
    /// Skipped records and cells.
    pub warnings: Vec<CellWarning>,
}

impl ImportReport {
    /// Returns true if nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} removed, {} warnings",
            self.created.len(),
            self.updated.len(),
            self.removed.len(),
            self.warnings.len()
        )
    }
}
