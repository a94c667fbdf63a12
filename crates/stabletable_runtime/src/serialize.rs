//! Table serialization and deserialization using `MessagePack`.
//!
//! A [`TableFile`] wraps the table with an optional author-time [`Sidecar`]
//! (display name, source path, flags). Runtime consumers can drop the
//! sidecar with [`TableFile::into_table`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use stabletable_foundation::{Error, ErrorKind, Result};
use stabletable_storage::StableTable;

/// Author-time metadata stored next to a table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidecar {
    /// Human-readable table name.
    pub display_name: String,
    /// Path of the document the table was last imported from.
    pub source_path: Option<String>,
    /// Editor flags; meaning is up to the host.
    pub flags: u32,
}

impl Sidecar {
    /// Creates a sidecar with a display name.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the source path.
    #[must_use]
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Builder method to set the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }
}

/// The on-disk form of a table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFile {
    /// Author-time metadata, absent in runtime builds.
    pub sidecar: Option<Sidecar>,
    /// The table itself.
    pub table: StableTable,
}

impl TableFile {
    /// Wraps a table without a sidecar.
    #[must_use]
    pub fn new(table: StableTable) -> Self {
        Self {
            sidecar: None,
            table,
        }
    }

    /// Builder method to attach a sidecar.
    #[must_use]
    pub fn with_sidecar(mut self, sidecar: Sidecar) -> Self {
        self.sidecar = Some(sidecar);
        self
    }

    /// Discards the sidecar and returns the table.
    #[must_use]
    pub fn into_table(self) -> StableTable {
        self.table
    }
}

/// Serializes a table file to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(file: &TableFile) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(file).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a table file from `MessagePack` bytes.
///
/// The table's invariants are checked before it is returned.
///
/// # Errors
///
/// Returns an error if deserialization fails or the decoded table is
/// inconsistent.
pub fn from_bytes(bytes: &[u8]) -> Result<TableFile> {
    let file: TableFile =
        rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
    file.table.validate().map_err(|e| {
        Error::new(ErrorKind::SerializationError(format!("decoded table is inconsistent: {e}")))
    })?;
    Ok(file)
}

/// Saves a table file using `MessagePack` format.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(file: &TableFile, path: P) -> Result<()> {
    let path = path.as_ref();
    let handle = File::create(path).map_err(|e| io_error("create", path, &e))?;

    let mut writer = BufWriter::new(handle);
    let bytes = to_bytes(file)?;
    writer.write_all(&bytes).map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;
    log::debug!("saved {} rows to {}", file.table.row_count(), path.display());
    Ok(())
}

/// Loads a table file from `MessagePack`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, deserialization fails, or
/// the decoded table is inconsistent.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<TableFile> {
    let path = path.as_ref();
    let handle = File::open(path).map_err(|e| io_error("open", path, &e))?;

    let mut reader = BufReader::new(handle);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read", path, &e))?;

    from_bytes(&bytes)
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> Error {
    Error::new(ErrorKind::IoError(format!(
        "failed to {action} file '{}': {err}",
        path.display()
    )))
}
