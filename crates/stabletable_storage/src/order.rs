//! Display-order changes applied in lockstep to parallel arrays.
//!
//! Dense storage order and display order are the same thing: after any
//! structural change or reorder, the entry at dense index `i` is the entry
//! shown at position `i`. A [`Reorder`] describes how dense slots move so the
//! identifier map, the name list, and every column array can be rearranged
//! by the same plan.

use std::ops::Range;

/// A validated rearrangement of dense slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reorder {
    /// Moves one slot; every slot between `from` and `to` shifts by one
    /// toward `from`.
    Move {
        /// Current position of the moved slot.
        from: usize,
        /// Position the slot ends up at.
        to: usize,
    },
    /// Full permutation: `source[new_position] == old_position`.
    Permute(Vec<usize>),
}

impl Reorder {
    /// Rearranges `data` according to this plan.
    ///
    /// `data` must be as long as the identifier map that produced the plan.
    pub fn apply<T>(&self, data: &mut [T]) {
        match self {
            Self::Move { from, to } => {
                if from < to {
                    data[*from..=*to].rotate_left(1);
                } else if from > to {
                    data[*to..=*from].rotate_right(1);
                }
            }
            Self::Permute(source) => permute_in_place(data, source),
        }
    }

    /// Returns the range of dense slots whose contents may change.
    #[must_use]
    pub fn affected(&self) -> Range<usize> {
        match self {
            Self::Move { from, to } => (*from).min(*to)..(*from).max(*to) + 1,
            Self::Permute(source) => 0..source.len(),
        }
    }

    /// Returns true if applying this plan changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Move { from, to } => from == to,
            Self::Permute(source) => source.iter().enumerate().all(|(i, &s)| i == s),
        }
    }
}

/// Applies `source` (where `source[new] == old`) by following its cycles.
///
/// Every element is swapped into place at most once, so no element needs to
/// be cloned or defaulted.
fn permute_in_place<T>(data: &mut [T], source: &[usize]) {
    let mut placed = vec![false; source.len()];
    for start in 0..source.len() {
        if placed[start] {
            continue;
        }
        let mut current = start;
        loop {
            placed[current] = true;
            let next = source[current];
            if next == start {
                break;
            }
            data.swap(current, next);
            current = next;
        }
    }
}
