//! Configuration for table construction.

/// Configuration for a [`StableTable`](crate::StableTable).
///
/// Capacities are hints: the table grows past them as needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of row identifiers to reserve up front.
    pub row_capacity: usize,

    /// Number of column identifiers to reserve up front.
    pub column_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            row_capacity: 0,
            column_capacity: 0,
        }
    }
}

impl TableConfig {
    /// Creates a configuration for small lookup tables edited by hand.
    #[must_use]
    pub fn small() -> Self {
        Self {
            row_capacity: 16,
            column_capacity: 8,
        }
    }

    /// Creates a configuration for large generated or imported tables.
    #[must_use]
    pub fn bulk() -> Self {
        Self {
            row_capacity: 4096,
            column_capacity: 32,
        }
    }

    /// Builder method to set the reserved row capacity.
    #[must_use]
    pub fn with_row_capacity(mut self, capacity: usize) -> Self {
        self.row_capacity = capacity;
        self
    }

    /// Builder method to set the reserved column capacity.
    #[must_use]
    pub fn with_column_capacity(mut self, capacity: usize) -> Self {
        self.column_capacity = capacity;
        self
    }
}
