//! Packed per-kind column storage.
//!
//! Every supported kind gets one [`TypedColumnStore`]: a list of arrays, one
//! per column of that kind, each exactly as long as the table has rows.
//! [`ColumnStorage`] holds one store per kind and dispatches on
//! [`ColumnType`] so callers never need per-kind code of their own.
//!
//! Within a kind, columns are addressed by their dense index in that kind's
//! store. Removing a column swaps the last array of the same kind into its
//! place, so the caller must re-point whichever column owned that array.

use stabletable_foundation::{
    Bounds, BoundsI, CellValue, Color, ColumnType, EnumValue, Error, ErrorKind, Hash128, ObjectRef,
    Quaternion, Rect, RectI, Result, TextForm, Vec2, Vec2I, Vec3, Vec3I, Vec4,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::order::Reorder;

/// All columns of one value kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypedColumnStore<T> {
    /// One array per column, each `row_count` long.
    columns: Vec<Vec<T>>,
}

impl<T> Default for TypedColumnStore<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<T: Default> TypedColumnStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of columns of this kind.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Appends a column of `row_count` default values, returning its dense index.
    pub fn add_column(&mut self, row_count: usize) -> usize {
        self.columns
            .push(std::iter::repeat_with(T::default).take(row_count).collect());
        self.columns.len() - 1
    }

    /// Swap-removes the column at `index`.
    ///
    /// Returns the former index of the array that moved into `index`, or
    /// `None` if the removed column was the last one.
    pub fn remove_column(&mut self, index: usize) -> Option<usize> {
        let last = self.columns.len().checked_sub(1)?;
        if index > last {
            return None;
        }
        self.columns.swap_remove(index);
        (index != last).then_some(last)
    }

    /// Returns the values of one column in dense row order.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&[T]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Returns one cell.
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<&T> {
        self.columns.get(column)?.get(row)
    }

    /// Returns one cell mutably.
    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut T> {
        self.columns.get_mut(column)?.get_mut(row)
    }

    /// Inserts `count` default rows at `position` in every column.
    pub fn insert_rows(&mut self, position: usize, count: usize) {
        for column in &mut self.columns {
            column.splice(
                position..position,
                std::iter::repeat_with(T::default).take(count),
            );
        }
    }

    /// Removes `count` rows starting at `position` from every column.
    pub fn remove_rows(&mut self, position: usize, count: usize) {
        for column in &mut self.columns {
            column.drain(position..position + count);
        }
    }

    /// Rearranges rows in every column.
    pub fn reorder_rows(&mut self, reorder: &Reorder) {
        for column in &mut self.columns {
            reorder.apply(column);
        }
    }

    /// Returns the length of every column, which must all be equal.
    fn row_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.iter().map(Vec::len)
    }
}

/// A Rust type that can be stored in a column.
///
/// Implemented once for each supported kind; the associated constant ties
/// the Rust type to its [`ColumnType`].
pub trait CellType: Default + Clone + Into<CellValue> + TextForm + 'static {
    /// The kind this type is stored as.
    const TYPE: ColumnType;

    /// Returns this kind's store.
    fn store(storage: &ColumnStorage) -> &TypedColumnStore<Self>;

    /// Returns this kind's store mutably.
    fn store_mut(storage: &mut ColumnStorage) -> &mut TypedColumnStore<Self>;

    /// Extracts a value of this kind from a type-erased cell.
    fn from_cell(value: CellValue) -> Option<Self>;
}

macro_rules! column_storage {
    ($($field:ident: $kind:ident($ty:ty)),+ $(,)?) => {
        /// One [`TypedColumnStore`] per supported kind.
        #[derive(Clone, Debug, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct ColumnStorage {
            $($field: TypedColumnStore<$ty>,)+
            /// Type constraint for each object reference column, indexed like
            /// that kind's store.
            object_ref_constraints: Vec<String>,
        }

        $(
            impl CellType for $ty {
                const TYPE: ColumnType = ColumnType::$kind;

                fn store(storage: &ColumnStorage) -> &TypedColumnStore<Self> {
                    &storage.$field
                }

                fn store_mut(storage: &mut ColumnStorage) -> &mut TypedColumnStore<Self> {
                    &mut storage.$field
                }

                fn from_cell(value: CellValue) -> Option<Self> {
                    match value {
                        CellValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )+

        impl ColumnStorage {
            /// Returns the number of columns of a kind.
            #[must_use]
            pub fn column_count(&self, ty: ColumnType) -> usize {
                match ty {
                    $(ColumnType::$kind => self.$field.column_count()),+
                }
            }

            fn add_typed_column(&mut self, ty: ColumnType, row_count: usize) -> usize {
                match ty {
                    $(ColumnType::$kind => self.$field.add_column(row_count)),+
                }
            }

            fn remove_typed_column(&mut self, ty: ColumnType, index: usize) -> Option<usize> {
                match ty {
                    $(ColumnType::$kind => self.$field.remove_column(index)),+
                }
            }

            /// Returns one cell as a type-erased value.
            #[must_use]
            pub fn value(&self, ty: ColumnType, column: usize, row: usize) -> Option<CellValue> {
                match ty {
                    $(ColumnType::$kind => self.$field.get(column, row).cloned().map(CellValue::$kind)),+
                }
            }

            /// Writes one type-erased cell into a column of the value's own kind.
            ///
            /// # Errors
            ///
            /// Returns an internal error if the cell does not exist.
            pub fn set_value(&mut self, column: usize, row: usize, value: CellValue) -> Result<()> {
                match value {
                    $(CellValue::$kind(v) => {
                        let slot = self.$field.get_mut(column, row).ok_or_else(|| missing_cell(ColumnType::$kind, column, row))?;
                        *slot = v;
                    })+
                }
                Ok(())
            }

            /// Inserts `count` default rows at `position` in every column of every kind.
            pub fn insert_rows(&mut self, position: usize, count: usize) {
                $(self.$field.insert_rows(position, count);)+
            }

            /// Removes `count` rows at `position` from every column of every kind.
            pub fn remove_rows(&mut self, position: usize, count: usize) {
                $(self.$field.remove_rows(position, count);)+
            }

            /// Rearranges rows in every column of every kind.
            pub fn reorder_rows(&mut self, reorder: &Reorder) {
                $(self.$field.reorder_rows(reorder);)+
            }

            /// Returns true if every column of every kind has `row_count` rows.
            #[must_use]
            pub fn rows_match(&self, row_count: usize) -> bool {
                true $(&& self.$field.row_counts().all(|n| n == row_count))+
            }
        }
    };
}

column_storage!(
    strings: String(String),
    chars: Char(char),
    bools: Bool(bool),
    i8s: I8(i8),
    u8s: U8(u8),
    i16s: I16(i16),
    u16s: U16(u16),
    i32s: I32(i32),
    u32s: U32(u32),
    i64s: I64(i64),
    u64s: U64(u64),
    f32s: F32(f32),
    f64s: F64(f64),
    vec2s: Vec2(Vec2),
    vec3s: Vec3(Vec3),
    vec4s: Vec4(Vec4),
    vec2is: Vec2I(Vec2I),
    vec3is: Vec3I(Vec3I),
    quaternions: Quaternion(Quaternion),
    rects: Rect(Rect),
    rectis: RectI(RectI),
    colors: Color(Color),
    bounds: Bounds(Bounds),
    boundsis: BoundsI(BoundsI),
    hashes: Hash128(Hash128),
    enums: Enum(EnumValue),
    object_refs: ObjectRef(ObjectRef),
);

impl ColumnStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column of `row_count` default values, returning its dense
    /// index within its kind.
    pub fn add_column(&mut self, ty: ColumnType, row_count: usize) -> usize {
        let index = self.add_typed_column(ty, row_count);
        if ty == ColumnType::ObjectRef {
            self.object_ref_constraints.push(String::new());
        }
        index
    }

    /// Swap-removes a column within its kind.
    ///
    /// Returns the former index of the column that moved into `index`, if any.
    pub fn remove_column(&mut self, ty: ColumnType, index: usize) -> Option<usize> {
        let moved = self.remove_typed_column(ty, index);
        if ty == ColumnType::ObjectRef && index < self.object_ref_constraints.len() {
            self.object_ref_constraints.swap_remove(index);
        }
        moved
    }

    /// Returns the type constraint of an object reference column.
    #[must_use]
    pub fn type_constraint(&self, index: usize) -> Option<&str> {
        self.object_ref_constraints.get(index).map(String::as_str)
    }

    /// Sets the type constraint of an object reference column.
    ///
    /// Returns false if no such column exists.
    pub fn set_type_constraint(&mut self, index: usize, constraint: String) -> bool {
        match self.object_ref_constraints.get_mut(index) {
            Some(slot) => {
                *slot = constraint;
                true
            }
            None => false,
        }
    }

    /// Returns true if the constraint list matches the object reference store.
    #[must_use]
    pub fn constraints_match(&self) -> bool {
        self.object_ref_constraints.len() == self.object_refs.column_count()
    }
}

fn missing_cell(ty: ColumnType, column: usize, row: usize) -> Error {
    Error::new(ErrorKind::Internal(format!(
        "{ty} cell ({column}, {row}) does not exist"
    )))
}
