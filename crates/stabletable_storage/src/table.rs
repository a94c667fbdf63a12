//! The table facade.
//!
//! `StableTable` ties the row and column identifier maps, the name lists and
//! the packed per-kind storage together and keeps them consistent:
//!
//! - every column array is exactly `row_count()` long
//! - the entry at dense slot `i` is the entry shown at display position `i`
//! - a failed call returns `Err` before touching anything
//! - every successful mutation bumps [`StableTable::data_version`] once

use log::debug;
use stabletable_foundation::{
    CellValue, ColumnId, ColumnType, Error, ErrorKind, Result, RowId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::{CellType, ColumnStorage};
use crate::config::TableConfig;
use crate::identifier::IdentifierMap;

/// Where a column's values live.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnEntry {
    /// The column's value kind.
    pub column_type: ColumnType,
    /// Index of the column's array within its kind's store.
    pub typed_index: usize,
}

/// A row as seen from outside the table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowDescription {
    /// Stable row identifier.
    pub identifier: RowId,
    /// Display name.
    pub name: String,
    /// Display position.
    pub sort_order: usize,
}

/// A column as seen from outside the table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnDescription {
    /// Stable column identifier.
    pub identifier: ColumnId,
    /// Display name.
    pub name: String,
    /// Value kind.
    pub column_type: ColumnType,
    /// Display position.
    pub sort_order: usize,
}

/// Columnar table with stable row and column identifiers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StableTable {
    rows: IdentifierMap<RowId>,
    /// Row names in dense order.
    row_names: Vec<String>,
    columns: IdentifierMap<ColumnId>,
    /// Column names in dense order.
    column_names: Vec<String>,
    /// Indexed by column identifier slot; `None` for free slots.
    column_entries: Vec<Option<ColumnEntry>>,
    storage: ColumnStorage,
    version: u64,
}

impl StableTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with capacities reserved from `config`.
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            rows: IdentifierMap::with_capacity(config.row_capacity),
            row_names: Vec::with_capacity(config.row_capacity),
            columns: IdentifierMap::with_capacity(config.column_capacity),
            column_names: Vec::with_capacity(config.column_capacity),
            column_entries: Vec::with_capacity(config.column_capacity),
            storage: ColumnStorage::new(),
            version: 0,
        }
    }

    /// Returns the mutation counter.
    ///
    /// Starts at zero and increases on every successful mutation. Reads never
    /// change it.
    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.version
    }

    // --- Row Operations ---

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Checks if a row identifier is live.
    #[must_use]
    pub fn contains_row(&self, row: RowId) -> bool {
        self.rows.contains(row)
    }

    /// Returns every row identifier in display order.
    #[must_use]
    pub fn row_ids(&self) -> &[RowId] {
        self.rows.ids()
    }

    /// Adds a row of default values at `insert_at` (or at the end).
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `insert_at` is past the end.
    pub fn add_row(&mut self, name: impl Into<String>, insert_at: Option<usize>) -> Result<RowId> {
        let id = self.rows.insert(insert_at)?;
        let position = insert_at.unwrap_or(self.row_names.len());
        self.row_names.insert(position, name.into());
        self.storage.insert_rows(position, 1);
        self.bump();
        debug!("added row {id} at {position}");
        Ok(id)
    }

    /// Adds `count` consecutive rows starting at `insert_at` (or at the end).
    ///
    /// Rows are named `base_name` followed by their index within the batch.
    /// The whole batch counts as one mutation.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `insert_at` is past the end.
    pub fn add_rows(
        &mut self,
        count: usize,
        base_name: &str,
        insert_at: Option<usize>,
    ) -> Result<Vec<RowId>> {
        let len = self.rows.len();
        let start = insert_at.unwrap_or(len);
        if start > len {
            return Err(Error::invalid_order(format!(
                "insert position {start} out of range (length {len})"
            )));
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let ids = self.rows.insert_many(Some(start), count)?;
        self.row_names.splice(
            start..start,
            (0..count).map(|index| format!("{base_name}{index}")),
        );
        self.storage.insert_rows(start, count);
        self.bump();
        debug!("added {count} rows at {start}");
        Ok(ids)
    }

    /// Removes a row, shifting later rows up by one display position.
    ///
    /// The identifier stops resolving and may be reissued by a later add.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error if `row` is not live.
    pub fn remove_row(&mut self, row: RowId) -> Result<()> {
        let position = self.rows.remove(row)?;
        self.row_names.remove(position);
        self.storage.remove_rows(position, 1);
        self.bump();
        debug!("removed row {row} from {position}");
        Ok(())
    }

    /// Returns a row's display name.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error if `row` is not live.
    pub fn row_name(&self, row: RowId) -> Result<&str> {
        let dense = self.rows.resolve(row)?;
        Ok(&self.row_names[dense])
    }

    /// Renames a row, returning the new data version.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error if `row` is not live.
    pub fn set_row_name(&mut self, row: RowId, name: impl Into<String>) -> Result<u64> {
        let dense = self.rows.resolve(row)?;
        self.row_names[dense] = name.into();
        Ok(self.bump())
    }

    /// Describes a row.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error if `row` is not live.
    pub fn row_description(&self, row: RowId) -> Result<RowDescription> {
        let dense = self.rows.resolve(row)?;
        Ok(self.describe_row(dense, row))
    }

    /// Describes the row shown at a display position.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `order` is out of range.
    pub fn row_description_by_order(&self, order: usize) -> Result<RowDescription> {
        let row = self.rows.reverse(order).ok_or_else(|| {
            Error::invalid_order(format!(
                "row order {order} out of range (length {})",
                self.rows.len()
            ))
        })?;
        Ok(self.describe_row(order, row))
    }

    /// Describes every row in display order.
    #[must_use]
    pub fn row_descriptions(&self) -> Vec<RowDescription> {
        self.rows
            .ids()
            .iter()
            .enumerate()
            .map(|(dense, &row)| self.describe_row(dense, row))
            .collect()
    }

    /// Returns a row's display position.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error if `row` is not live.
    pub fn row_order(&self, row: RowId) -> Result<usize> {
        self.rows.resolve(row)
    }

    /// Moves a row to a display position; rows in between shift by one.
    ///
    /// # Errors
    ///
    /// Returns an invalid row identifier error for a dead row, or an invalid
    /// order argument error if `order` is out of range.
    pub fn set_row_order(&mut self, row: RowId, order: usize) -> Result<u64> {
        let plan = self.rows.plan_move(row, order)?;
        self.rows.apply(&plan);
        plan.apply(&mut self.row_names);
        self.storage.reorder_rows(&plan);
        debug!("moved row {row} to {order}");
        Ok(self.bump())
    }

    /// Reorders every row to match `order`, which must list each live row
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `order` is not a
    /// permutation of the live rows. The table is left untouched.
    pub fn set_all_row_orders(&mut self, order: &[RowId]) -> Result<u64> {
        let plan = self.rows.plan_permutation(order)?;
        self.rows.apply(&plan);
        plan.apply(&mut self.row_names);
        self.storage.reorder_rows(&plan);
        debug!("reordered {} rows", order.len());
        Ok(self.bump())
    }

    // --- Column Operations ---

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Checks if a column identifier is live.
    #[must_use]
    pub fn contains_column(&self, column: ColumnId) -> bool {
        self.columns.contains(column)
    }

    /// Returns every column identifier in display order.
    #[must_use]
    pub fn column_ids(&self) -> &[ColumnId] {
        self.columns.ids()
    }

    /// Adds a column of default values at `insert_at` (or at the end).
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `insert_at` is past the end.
    pub fn add_column(
        &mut self,
        column_type: ColumnType,
        name: impl Into<String>,
        insert_at: Option<usize>,
    ) -> Result<ColumnId> {
        let id = self.columns.insert(insert_at)?;
        let position = insert_at.unwrap_or(self.column_names.len());
        self.column_names.insert(position, name.into());

        let typed_index = self.storage.add_column(column_type, self.rows.len());
        let slot = id.slot();
        if self.column_entries.len() <= slot {
            self.column_entries.resize(slot + 1, None);
        }
        self.column_entries[slot] = Some(ColumnEntry {
            column_type,
            typed_index,
        });

        self.bump();
        debug!("added {column_type} column {id} at {position}");
        Ok(id)
    }

    /// Removes a column. Columns of other kinds are untouched.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live,
    /// or an internal error if the column bookkeeping is inconsistent. The
    /// table is unchanged on either error.
    pub fn remove_column(&mut self, column: ColumnId) -> Result<()> {
        let entry = self.entry(column)?;
        let count = self.storage.column_count(entry.column_type);
        if entry.typed_index >= count {
            return Err(internal(format!(
                "column {column} points past the {} store ({count} arrays)",
                entry.column_type
            )));
        }
        // The last array of the kind swaps into the hole; find its owner first.
        let last = count - 1;
        let displaced = if last == entry.typed_index {
            None
        } else {
            let slot = self
                .column_entries
                .iter()
                .position(|e| {
                    e.is_some_and(|e| e.column_type == entry.column_type && e.typed_index == last)
                })
                .ok_or_else(|| {
                    internal(format!("no column owns {} array {last}", entry.column_type))
                })?;
            Some(slot)
        };

        let position = self.columns.remove(column)?;
        self.column_names.remove(position);
        self.column_entries[column.slot()] = None;
        self.storage.remove_column(entry.column_type, entry.typed_index);
        if let Some(slot) = displaced {
            if let Some(moved) = self.column_entries[slot].as_mut() {
                moved.typed_index = entry.typed_index;
            }
        }

        self.bump();
        debug!("removed {} column {column} from {position}", entry.column_type);
        Ok(())
    }

    /// Returns a column's value kind.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live.
    pub fn column_type(&self, column: ColumnId) -> Result<ColumnType> {
        Ok(self.entry(column)?.column_type)
    }

    /// Returns a column's display name.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live.
    pub fn column_name(&self, column: ColumnId) -> Result<&str> {
        let dense = self.columns.resolve(column)?;
        Ok(&self.column_names[dense])
    }

    /// Renames a column, returning the new data version.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live.
    pub fn set_column_name(&mut self, column: ColumnId, name: impl Into<String>) -> Result<u64> {
        let dense = self.columns.resolve(column)?;
        self.column_names[dense] = name.into();
        Ok(self.bump())
    }

    /// Finds the first column, in display order, with the given name.
    #[must_use]
    pub fn find_column_by_name(&self, name: &str) -> Option<ColumnId> {
        self.column_names
            .iter()
            .position(|n| n == name)
            .and_then(|dense| self.columns.reverse(dense))
    }

    /// Describes a column.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live.
    pub fn column_description(&self, column: ColumnId) -> Result<ColumnDescription> {
        let dense = self.columns.resolve(column)?;
        self.describe_column(dense, column)
    }

    /// Describes the column shown at a display position.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `order` is out of range.
    pub fn column_description_by_order(&self, order: usize) -> Result<ColumnDescription> {
        let column = self.columns.reverse(order).ok_or_else(|| {
            Error::invalid_order(format!(
                "column order {order} out of range (length {})",
                self.columns.len()
            ))
        })?;
        self.describe_column(order, column)
    }

    /// Describes every column in display order.
    ///
    /// # Errors
    ///
    /// Returns an internal error if a live column has no storage entry.
    pub fn column_descriptions(&self) -> Result<Vec<ColumnDescription>> {
        self.columns
            .ids()
            .iter()
            .enumerate()
            .map(|(dense, &column)| self.describe_column(dense, column))
            .collect()
    }

    /// Returns a column's display position.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error if `column` is not live.
    pub fn column_order(&self, column: ColumnId) -> Result<usize> {
        self.columns.resolve(column)
    }

    /// Moves a column to a display position; columns in between shift by one.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error for a dead column, or an
    /// invalid order argument error if `order` is out of range.
    pub fn set_column_order(&mut self, column: ColumnId, order: usize) -> Result<u64> {
        let plan = self.columns.plan_move(column, order)?;
        self.columns.apply(&plan);
        plan.apply(&mut self.column_names);
        debug!("moved column {column} to {order}");
        Ok(self.bump())
    }

    /// Reorders every column to match `order`, which must list each live
    /// column exactly once.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `order` is not a
    /// permutation of the live columns. The table is left untouched.
    pub fn set_all_column_orders(&mut self, order: &[ColumnId]) -> Result<u64> {
        let plan = self.columns.plan_permutation(order)?;
        self.columns.apply(&plan);
        plan.apply(&mut self.column_names);
        debug!("reordered {} columns", order.len());
        Ok(self.bump())
    }

    /// Returns the type constraint of an object reference column.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error for a dead column, or a
    /// type mismatch if the column does not hold object references.
    pub fn type_constraint(&self, column: ColumnId) -> Result<&str> {
        let index = self.object_ref_index(column)?;
        self.storage
            .type_constraint(index)
            .ok_or_else(|| internal(format!("missing type constraint for {column}")))
    }

    /// Sets the type constraint of an object reference column.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error for a dead column, or a
    /// type mismatch if the column does not hold object references.
    pub fn set_type_constraint(
        &mut self,
        column: ColumnId,
        constraint: impl Into<String>,
    ) -> Result<u64> {
        let index = self.object_ref_index(column)?;
        if !self.storage.set_type_constraint(index, constraint.into()) {
            return Err(internal(format!("missing type constraint for {column}")));
        }
        Ok(self.bump())
    }

    // --- Cell Operations ---

    /// Returns a copy of one cell.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column, or a
    /// type mismatch if `T` is not the column's kind.
    pub fn get<T: CellType>(&self, row: RowId, column: ColumnId) -> Result<T> {
        self.get_ref(row, column).cloned()
    }

    /// Borrows one cell.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column, or a
    /// type mismatch if `T` is not the column's kind.
    pub fn get_ref<T: CellType>(&self, row: RowId, column: ColumnId) -> Result<&T> {
        let (dense, index) = self.locate::<T>(row, column)?;
        T::store(&self.storage)
            .get(index, dense)
            .ok_or_else(|| internal(format!("cell ({row}, {column}) missing from storage")))
    }

    /// Writes one cell, returning the new data version.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column, or a
    /// type mismatch if `T` is not the column's kind.
    pub fn set<T: CellType>(&mut self, row: RowId, column: ColumnId, value: T) -> Result<u64> {
        let (dense, index) = self.locate::<T>(row, column)?;
        let cell = T::store_mut(&mut self.storage)
            .get_mut(index, dense)
            .ok_or_else(|| internal(format!("cell ({row}, {column}) missing from storage")))?;
        *cell = value;
        Ok(self.bump())
    }

    /// Returns one cell as a type-erased value.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column.
    pub fn cell_value(&self, row: RowId, column: ColumnId) -> Result<CellValue> {
        let dense = self.rows.resolve(row)?;
        let entry = self.entry(column)?;
        self.storage
            .value(entry.column_type, entry.typed_index, dense)
            .ok_or_else(|| internal(format!("cell ({row}, {column}) missing from storage")))
    }

    /// Writes one type-erased cell, returning the new data version.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column, or a
    /// type mismatch if the value's kind is not the column's kind.
    pub fn set_cell_value(
        &mut self,
        row: RowId,
        column: ColumnId,
        value: CellValue,
    ) -> Result<u64> {
        let dense = self.rows.resolve(row)?;
        let entry = self.entry(column)?;
        if entry.column_type != value.column_type() {
            return Err(Error::type_mismatch(entry.column_type, value.column_type()));
        }
        self.storage.set_value(entry.typed_index, dense, value)?;
        Ok(self.bump())
    }

    /// Formats one cell in its kind's text form.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column.
    pub fn cell_as_string(&self, row: RowId, column: ColumnId) -> Result<String> {
        Ok(self.cell_value(row, column)?.to_string())
    }

    /// Parses text as the column's kind and writes it, returning the new
    /// data version.
    ///
    /// # Errors
    ///
    /// Returns an invalid identifier error for a dead row or column, or a
    /// parse error if the text is not a valid value of the column's kind.
    /// The cell keeps its previous value on error.
    pub fn set_cell_from_string(&mut self, row: RowId, column: ColumnId, text: &str) -> Result<u64> {
        self.rows.resolve(row)?;
        let value = CellValue::parse(self.entry(column)?.column_type, text)?;
        self.set_cell_value(row, column, value)
    }

    /// Borrows a whole column in display order.
    ///
    /// # Errors
    ///
    /// Returns an invalid column identifier error for a dead column, or a
    /// type mismatch if `T` is not the column's kind.
    pub fn column_values<T: CellType>(&self, column: ColumnId) -> Result<&[T]> {
        let entry = self.typed_entry::<T>(column)?;
        T::store(&self.storage)
            .column(entry.typed_index)
            .ok_or_else(|| internal(format!("column {column} missing from storage")))
    }

    // --- Debug ---

    /// Checks every structural invariant of the table.
    ///
    /// # Errors
    ///
    /// Returns an internal error describing the first broken invariant.
    pub fn validate(&self) -> Result<()> {
        self.rows.validate()?;
        self.columns.validate()?;

        if self.row_names.len() != self.rows.len() {
            return Err(internal("row names out of step with rows"));
        }
        if self.column_names.len() != self.columns.len() {
            return Err(internal("column names out of step with columns"));
        }
        if !self.storage.rows_match(self.rows.len()) {
            return Err(internal("a column array is not row_count long"));
        }
        if !self.storage.constraints_match() {
            return Err(internal("type constraints out of step with object reference columns"));
        }

        let mut claimed: Vec<(ColumnType, usize)> = Vec::with_capacity(self.columns.len());
        for (slot, entry) in self.column_entries.iter().enumerate() {
            let live = self.columns.contains(ColumnId::new(slot_id(slot)));
            match (entry, live) {
                (Some(entry), true) => {
                    if entry.typed_index >= self.storage.column_count(entry.column_type) {
                        return Err(internal(format!("column slot {slot} points past its store")));
                    }
                    claimed.push((entry.column_type, entry.typed_index));
                }
                (None, false) => {}
                (Some(_), false) => {
                    return Err(internal(format!("free column slot {slot} has an entry")));
                }
                (None, true) => {
                    return Err(internal(format!("live column slot {slot} has no entry")));
                }
            }
        }
        if claimed.len() != self.columns.len() {
            return Err(internal("live columns without entries"));
        }
        claimed.sort_by_key(|(ty, index)| (ty.name(), *index));
        if claimed.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(internal("two columns share one array"));
        }
        let stored: usize = ColumnType::ALL
            .iter()
            .map(|ty| self.storage.column_count(*ty))
            .sum();
        if stored != claimed.len() {
            return Err(internal("column arrays without owners"));
        }
        Ok(())
    }

    // --- Private helpers ---

    fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    fn entry(&self, column: ColumnId) -> Result<ColumnEntry> {
        if !self.columns.contains(column) {
            return Err(Error::invalid_column(column));
        }
        self.column_entries
            .get(column.slot())
            .copied()
            .flatten()
            .ok_or_else(|| internal(format!("live column {column} has no entry")))
    }

    fn typed_entry<T: CellType>(&self, column: ColumnId) -> Result<ColumnEntry> {
        let entry = self.entry(column)?;
        if entry.column_type == T::TYPE {
            Ok(entry)
        } else {
            Err(Error::type_mismatch(entry.column_type, T::TYPE))
        }
    }

    fn locate<T: CellType>(&self, row: RowId, column: ColumnId) -> Result<(usize, usize)> {
        let dense = self.rows.resolve(row)?;
        let entry = self.typed_entry::<T>(column)?;
        Ok((dense, entry.typed_index))
    }

    fn object_ref_index(&self, column: ColumnId) -> Result<usize> {
        let entry = self.entry(column)?;
        if entry.column_type == ColumnType::ObjectRef {
            Ok(entry.typed_index)
        } else {
            Err(Error::type_mismatch(ColumnType::ObjectRef, entry.column_type))
        }
    }

    fn describe_row(&self, dense: usize, row: RowId) -> RowDescription {
        RowDescription {
            identifier: row,
            name: self.row_names[dense].clone(),
            sort_order: dense,
        }
    }

    fn describe_column(&self, dense: usize, column: ColumnId) -> Result<ColumnDescription> {
        Ok(ColumnDescription {
            identifier: column,
            name: self.column_names[dense].clone(),
            column_type: self.entry(column)?.column_type,
            sort_order: dense,
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn slot_id(slot: usize) -> u32 {
    slot as u32
}

fn internal(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Internal(message.into()))
}
