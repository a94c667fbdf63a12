//! Stable identifier allocation and dense index mapping.
//!
//! An `IdentifierMap` hands out identifiers from a free list when one is
//! available, otherwise it grows. Each live identifier maps to the dense slot
//! its data occupies, and each dense slot maps back to its identifier.
//! Removing an entry shifts every later slot down by one so the relative
//! order of the remaining entries never changes.

// Allow usize to u32 casts - identifier slots never exceed u32::MAX
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use stabletable_foundation::{ColumnId, Error, Result, RowId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::order::Reorder;

/// An identifier kind managed by an [`IdentifierMap`].
pub trait StableId: Copy + Eq + fmt::Debug {
    /// Builds an identifier from its slot in identifier-indexed arrays.
    fn from_slot(slot: u32) -> Self;

    /// Returns the identifier's slot in identifier-indexed arrays.
    fn slot(self) -> usize;

    /// Returns the error reported when this identifier does not resolve.
    fn invalid(self) -> Error;
}

impl StableId for RowId {
    fn from_slot(slot: u32) -> Self {
        RowId::new(slot)
    }

    fn slot(self) -> usize {
        RowId::slot(self)
    }

    fn invalid(self) -> Error {
        Error::invalid_row(self)
    }
}

impl StableId for ColumnId {
    fn from_slot(slot: u32) -> Self {
        ColumnId::new(slot)
    }

    fn slot(self) -> usize {
        ColumnId::slot(self)
    }

    fn invalid(self) -> Error {
        Error::invalid_column(self)
    }
}

/// Bidirectional map between stable identifiers and dense slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentifierMap<I> {
    /// Dense slot of each identifier; meaningful only while the identifier is live.
    dense_of: Vec<u32>,
    /// Liveness flag for each identifier slot.
    live: Vec<bool>,
    /// Identifier stored at each dense slot.
    ids: Vec<I>,
    /// Freed identifier slots available for reuse, most recent last.
    free_list: Vec<u32>,
}

impl<I: StableId> Default for IdentifierMap<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: StableId> IdentifierMap<I> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dense_of: Vec::new(),
            live: Vec::new(),
            ids: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` identifiers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense_of: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            ids: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Returns the number of live identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if there are no live identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of identifier slots ever allocated.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.live.len()
    }

    /// Returns the number of identifiers waiting on the free list.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Checks if an identifier is live.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.live.get(id.slot()).copied().unwrap_or(false)
    }

    /// Resolves an identifier to its dense slot.
    ///
    /// # Errors
    ///
    /// Returns the identifier's invalid-identifier error if it is out of
    /// range or currently free.
    pub fn resolve(&self, id: I) -> Result<usize> {
        if self.contains(id) {
            Ok(self.dense_of[id.slot()] as usize)
        } else {
            Err(id.invalid())
        }
    }

    /// Returns the identifier stored at a dense slot.
    #[must_use]
    pub fn reverse(&self, dense: usize) -> Option<I> {
        self.ids.get(dense).copied()
    }

    /// Returns every live identifier in dense order.
    #[must_use]
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    /// Allocates an identifier and places it at `position` (or at the end).
    ///
    /// Entries at and after `position` shift up by one slot.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `position` is past the end.
    pub fn insert(&mut self, position: Option<usize>) -> Result<I> {
        let len = self.ids.len();
        let position = position.unwrap_or(len);
        if position > len {
            return Err(Error::invalid_order(format!(
                "insert position {position} out of range (length {len})"
            )));
        }

        let id = self.allocate();
        self.ids.insert(position, id);
        self.refresh(position..self.ids.len());
        Ok(id)
    }

    /// Allocates `count` identifiers and places them consecutively at
    /// `position` (or at the end), in allocation order.
    ///
    /// Later entries shift up by `count` slots in a single pass.
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if `position` is past the end.
    pub fn insert_many(&mut self, position: Option<usize>, count: usize) -> Result<Vec<I>> {
        let len = self.ids.len();
        let position = position.unwrap_or(len);
        if position > len {
            return Err(Error::invalid_order(format!(
                "insert position {position} out of range (length {len})"
            )));
        }

        let batch: Vec<I> = (0..count).map(|_| self.allocate()).collect();
        self.ids.splice(position..position, batch.iter().copied());
        self.refresh(position..self.ids.len());
        Ok(batch)
    }

    /// Removes an identifier, returning the dense slot it occupied.
    ///
    /// Entries after that slot shift down by one. The identifier goes onto
    /// the free list and no longer resolves.
    ///
    /// # Errors
    ///
    /// Returns the identifier's invalid-identifier error if it is not live.
    pub fn remove(&mut self, id: I) -> Result<usize> {
        let position = self.resolve(id)?;
        self.ids.remove(position);
        self.live[id.slot()] = false;
        self.free_list.push(id.slot() as u32);
        self.refresh(position..self.ids.len());
        Ok(position)
    }

    /// Plans moving an identifier to a new position without touching the map.
    ///
    /// # Errors
    ///
    /// Returns an invalid-identifier error for a dead identifier, or an
    /// invalid order argument error for an out-of-range position.
    pub fn plan_move(&self, id: I, position: usize) -> Result<Reorder> {
        let from = self.resolve(id)?;
        if position >= self.ids.len() {
            return Err(Error::invalid_order(format!(
                "order {position} out of range (length {})",
                self.ids.len()
            )));
        }
        Ok(Reorder::Move { from, to: position })
    }

    /// Plans a full reorder from the desired identifier sequence.
    ///
    /// The sequence must be a permutation of every live identifier. Nothing
    /// is modified; apply the result with [`IdentifierMap::apply`].
    ///
    /// # Errors
    ///
    /// Returns an invalid order argument error if the sequence has the wrong
    /// length, names an identifier that is not live, or repeats one.
    pub fn plan_permutation(&self, order: &[I]) -> Result<Reorder> {
        if order.len() != self.ids.len() {
            return Err(Error::invalid_order(format!(
                "expected {} identifiers, got {}",
                self.ids.len(),
                order.len()
            )));
        }

        let mut seen = vec![false; self.ids.len()];
        let mut source = Vec::with_capacity(order.len());
        for &id in order {
            let dense = self
                .resolve(id)
                .map_err(|_| Error::invalid_order(format!("{id:?} is not live")))?;
            if seen[dense] {
                return Err(Error::invalid_order(format!("{id:?} appears more than once")));
            }
            seen[dense] = true;
            source.push(dense);
        }
        Ok(Reorder::Permute(source))
    }

    /// Applies a plan produced by this map.
    pub fn apply(&mut self, reorder: &Reorder) {
        reorder.apply(&mut self.ids);
        self.refresh(reorder.affected());
    }

    /// Verifies that both directions of the map agree and the free list is sound.
    ///
    /// # Errors
    ///
    /// Returns an internal error describing the first broken invariant.
    pub fn validate(&self) -> Result<()> {
        if self.dense_of.len() != self.live.len() {
            return Err(internal("dense map and liveness flags differ in length"));
        }
        let live_count = self.live.iter().filter(|l| **l).count();
        if live_count != self.ids.len() {
            return Err(internal("live identifier count differs from dense length"));
        }
        for (dense, id) in self.ids.iter().enumerate() {
            if !self.contains(*id) || self.dense_of[id.slot()] as usize != dense {
                return Err(internal(&format!("{id:?} does not resolve to slot {dense}")));
            }
        }
        let mut queued = vec![false; self.live.len()];
        for &slot in &self.free_list {
            let slot = slot as usize;
            if slot >= self.live.len() || self.live[slot] || queued[slot] {
                return Err(internal(&format!("free list entry {slot} is invalid")));
            }
            queued[slot] = true;
        }
        if self.free_list.len() + live_count != self.live.len() {
            return Err(internal("identifier slots leaked outside the free list"));
        }
        Ok(())
    }

    // --- Private helpers ---

    fn allocate(&mut self) -> I {
        if let Some(slot) = self.free_list.pop() {
            self.live[slot as usize] = true;
            I::from_slot(slot)
        } else {
            let slot = self.live.len() as u32;
            self.live.push(true);
            self.dense_of.push(0);
            I::from_slot(slot)
        }
    }

    fn refresh(&mut self, range: std::ops::Range<usize>) {
        for dense in range {
            let slot = self.ids[dense].slot();
            self.dense_of[slot] = dense as u32;
        }
    }
}

fn internal(message: &str) -> Error {
    Error::new(stabletable_foundation::ErrorKind::Internal(message.to_string()))
}
