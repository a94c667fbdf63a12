//! Integration tests for identifier maps
//!
//! Tests allocation, recycling, and the identifier/dense-slot bijection.

use stabletable_foundation::{ColumnId, RowId};
use stabletable_storage::{IdentifierMap, Reorder};

fn assert_bijection(map: &IdentifierMap<RowId>) {
    for (dense, &id) in map.ids().iter().enumerate() {
        assert_eq!(map.resolve(id).unwrap(), dense);
        assert_eq!(map.reverse(dense), Some(id));
    }
    assert_eq!(map.reverse(map.len()), None);
}

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn identifiers_are_sequential_when_nothing_is_free() {
    let mut map = IdentifierMap::<ColumnId>::new();
    let ids: Vec<_> = (0..4).map(|_| map.insert(None).unwrap()).collect();
    assert_eq!(ids, (0..4).map(ColumnId::new).collect::<Vec<_>>());
    assert_eq!(map.allocated(), 4);
}

#[test]
fn freed_identifiers_are_reused_most_recent_first() {
    let mut map = IdentifierMap::<RowId>::new();
    let ids: Vec<_> = (0..5).map(|_| map.insert(None).unwrap()).collect();

    map.remove(ids[1]).unwrap();
    map.remove(ids[3]).unwrap();
    assert_eq!(map.free_count(), 2);

    assert_eq!(map.insert(None).unwrap(), ids[3]);
    assert_eq!(map.insert(None).unwrap(), ids[1]);
    assert_eq!(map.insert(None).unwrap(), RowId::new(5));
    assert_eq!(map.free_count(), 0);
    map.validate().unwrap();
}

#[test]
fn reused_identifier_never_collides_with_live_one() {
    let mut map = IdentifierMap::<RowId>::new();
    let ids: Vec<_> = (0..3).map(|_| map.insert(None).unwrap()).collect();
    map.remove(ids[0]).unwrap();

    let again = map.insert(None).unwrap();
    assert!(!ids[1..].contains(&again));
    assert_eq!(map.len(), 3);
}

#[test]
fn insert_past_end_fails() {
    let mut map = IdentifierMap::<RowId>::new();
    assert!(map.insert(Some(1)).is_err());
    assert!(map.is_empty());
    assert_eq!(map.allocated(), 0);
}

// =============================================================================
// Bijection
// =============================================================================

#[test]
fn bijection_holds_after_inserts_and_removes() {
    let mut map = IdentifierMap::<RowId>::new();
    let a = map.insert(None).unwrap();
    let b = map.insert(None).unwrap();
    map.insert(Some(0)).unwrap();
    map.insert(Some(2)).unwrap();
    assert_bijection(&map);

    map.remove(a).unwrap();
    assert_bijection(&map);
    assert!(map.resolve(a).unwrap_err().is_invalid_identifier());

    map.remove(b).unwrap();
    assert_bijection(&map);
}

#[test]
fn removal_shifts_later_entries_down() {
    let mut map = IdentifierMap::<RowId>::new();
    let ids: Vec<_> = (0..4).map(|_| map.insert(None).unwrap()).collect();

    assert_eq!(map.remove(ids[1]).unwrap(), 1);
    assert_eq!(map.ids(), &[ids[0], ids[2], ids[3]]);
    assert_eq!(map.resolve(ids[3]).unwrap(), 2);
}

// =============================================================================
// Reorder Plans
// =============================================================================

#[test]
fn move_plan_rotates_the_span() {
    let mut map = IdentifierMap::<RowId>::new();
    let ids: Vec<_> = (0..4).map(|_| map.insert(None).unwrap()).collect();

    let plan = map.plan_move(ids[0], 2).unwrap();
    assert_eq!(plan, Reorder::Move { from: 0, to: 2 });
    map.apply(&plan);

    assert_eq!(map.ids(), &[ids[1], ids[2], ids[0], ids[3]]);
    assert_bijection(&map);
}

#[test]
fn permutation_plan_is_checked_before_use() {
    let mut map = IdentifierMap::<RowId>::new();
    let ids: Vec<_> = (0..3).map(|_| map.insert(None).unwrap()).collect();

    assert!(map.plan_permutation(&[ids[0], ids[1]]).is_err());
    assert!(map.plan_permutation(&[ids[0], ids[0], ids[1]]).is_err());
    assert!(map.plan_permutation(&[ids[0], ids[1], RowId::new(9)]).is_err());
    assert_eq!(map.ids(), ids.as_slice());

    let plan = map.plan_permutation(&[ids[2], ids[0], ids[1]]).unwrap();
    map.apply(&plan);
    assert_eq!(map.ids(), &[ids[2], ids[0], ids[1]]);
    assert_bijection(&map);
}
