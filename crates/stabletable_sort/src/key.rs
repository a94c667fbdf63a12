//! Sort keys.

use std::cmp::Ordering;
use std::fmt;

use stabletable_foundation::{ColumnId, ColumnType, Error, Result};

/// Raw column identifier that selects the row-name pseudo column when paired
/// with [`ColumnType::String`].
pub const ROW_NAME_RAW_ID: i64 = -1;

/// Sort direction for one key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Applies this direction to an ascending comparison.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// What a sort key reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SortTarget {
    /// Cell values of a column.
    Column(ColumnId),
    /// Row display names.
    RowName,
}

/// One level of a multi-key sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortKey {
    target: SortTarget,
    column_type: ColumnType,
    direction: SortDirection,
}

impl SortKey {
    /// Sorts by a column whose kind is expected to be `column_type`.
    #[must_use]
    pub const fn column(column: ColumnId, column_type: ColumnType, direction: SortDirection) -> Self {
        Self {
            target: SortTarget::Column(column),
            column_type,
            direction,
        }
    }

    /// Sorts by row display name.
    #[must_use]
    pub const fn row_name(direction: SortDirection) -> Self {
        Self {
            target: SortTarget::RowName,
            column_type: ColumnType::String,
            direction,
        }
    }

    /// Builds a key from a raw column identifier.
    ///
    /// [`ROW_NAME_RAW_ID`] paired with [`ColumnType::String`] selects the
    /// row-name pseudo column.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `raw` is neither a column
    /// identifier nor the row-name marker.
    pub fn from_raw(raw: i64, column_type: ColumnType, direction: SortDirection) -> Result<Self> {
        if raw == ROW_NAME_RAW_ID && column_type == ColumnType::String {
            return Ok(Self::row_name(direction));
        }
        let raw = u32::try_from(raw).map_err(|_| {
            Error::invalid_order(format!("sort key {raw} is not a column identifier"))
        })?;
        Ok(Self::column(ColumnId::new(raw), column_type, direction))
    }

    /// Returns what this key reads.
    #[must_use]
    pub const fn target(&self) -> SortTarget {
        self.target
    }

    /// Returns the kind this key compares.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns this key's direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}
