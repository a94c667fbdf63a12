//! Stable row and column identifiers.
//!
//! Identifiers are handed out by the table and stay valid for the whole
//! lifetime of the row or column they name, regardless of where that entry
//! currently sits in packed storage. Once an entry is removed its identifier
//! may be recycled for a later entry.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a table row.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RowId(pub u32);

/// Stable identifier of a table column.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColumnId(pub u32);

impl RowId {
    /// Creates a row identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a slot index into identifier-indexed arrays.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl ColumnId {
    /// Creates a column identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a slot index into identifier-indexed arrays.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RowId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<u32> for ColumnId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
