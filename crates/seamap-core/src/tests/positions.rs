use std::rc::Rc;

use crate::*;

fn map(entries: &[(&str, f64, f64)]) -> PositionMap {
    entries
        .iter()
        .map(|(id, x, y)| (NodeId::from(*id), point(*x, *y)))
        .collect()
}

#[test]
fn updated_positions_keeps_only_changed_entries() {
    let current = map(&[("a", 1.0, 2.0), ("b", 3.0, 4.0), ("c", 5.0, 6.0)]);
    let target = map(&[("a", 1.0, 2.0), ("b", 3.0, 4.5), ("c", 5.0, 6.0)]);

    let changed = updated_positions(&current, &target);
    assert_eq!(changed, map(&[("b", 3.0, 4.5)]));
}

#[test]
fn updated_positions_includes_keys_missing_from_current() {
    let current = map(&[("a", 1.0, 2.0)]);
    let target = map(&[("a", 1.0, 2.0), ("new", 0.0, 0.0)]);

    let changed = updated_positions(&current, &target);
    assert_eq!(changed, map(&[("new", 0.0, 0.0)]));
}

#[test]
fn updated_positions_ignores_keys_only_in_current() {
    let current = map(&[("a", 1.0, 2.0), ("gone", 9.0, 9.0)]);
    let target = map(&[("a", 1.0, 2.0)]);

    assert!(updated_positions(&current, &target).is_empty());
}

#[test]
fn updated_positions_compares_exactly() {
    let current = map(&[("a", 1.0, 2.0)]);
    let target = map(&[("a", 1.0 + f64::EPSILON, 2.0)]);

    assert_eq!(updated_positions(&current, &target).len(), 1);
}

#[test]
fn memo_returns_the_cached_result_for_the_same_snapshots() {
    let current = Rc::new(map(&[("a", 0.0, 0.0)]));
    let target = Rc::new(map(&[("a", 1.0, 1.0)]));
    let mut memo = UpdatedPositionsMemo::new();

    let first = memo.get(&current, &target);
    let second = memo.get(&current, &target);
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(*first, map(&[("a", 1.0, 1.0)]));
}

#[test]
fn memo_recomputes_for_new_snapshots_with_equal_contents() {
    let current = Rc::new(map(&[("a", 0.0, 0.0)]));
    let target = Rc::new(map(&[("a", 1.0, 1.0)]));
    let mut memo = UpdatedPositionsMemo::new();

    let first = memo.get(&current, &target);
    let same_contents = Rc::new(PositionMap::clone(&target));
    let second = memo.get(&current, &same_contents);
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(first, second);
}

#[test]
fn memo_only_remembers_the_last_pair() {
    let a = Rc::new(map(&[("a", 0.0, 0.0)]));
    let b = Rc::new(map(&[("a", 1.0, 0.0)]));
    let mut memo = UpdatedPositionsMemo::new();

    let ab = memo.get(&a, &b);
    let _ba = memo.get(&b, &a);
    let ab_again = memo.get(&a, &b);
    assert!(!Rc::ptr_eq(&ab, &ab_again));
    assert_eq!(ab, ab_again);
}

#[test]
fn node_selection_single() {
    assert_eq!(
        NodeSelection::single(NodeId::from("x")),
        NodeSelection::Only(vec![NodeId::from("x")])
    );
    assert_eq!(NodeSelection::default(), NodeSelection::All);
}
