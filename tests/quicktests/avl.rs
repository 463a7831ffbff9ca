use std::collections::{BTreeSet, HashSet};

use avl_tree::{AvlTree, Error};
use quickcheck_macros::quickcheck;

use crate::Op;

/// Largest height an AVL tree holding `len` values may have.
fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2()
}

fn balanced(tree: &AvlTree<i8>) -> bool {
    tree.validate().is_ok() && f64::from(tree.height()) <= height_bound(tree.len())
}

#[quickcheck]
fn stays_balanced_under_any_operations(ops: Vec<Op<i8>>) -> bool {
    let mut tree = AvlTree::new();
    let mut set = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert(v) => {
                tree.insert(v).unwrap();
                set.insert(v);
            }
            Op::Remove(v) => {
                if tree.remove(&v).unwrap() != set.take(&v) {
                    return false;
                }
            }
            Op::Iter => {
                if !tree.values().eq(set.iter()) {
                    return false;
                }
            }
        }
        if !balanced(&tree) {
            return false;
        }
    }

    tree.len() == set.len()
}

#[quickcheck]
fn search_finds_inserted_node(xs: Vec<i8>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        let node = tree.insert(*x).unwrap();
        if tree.search(x) != Ok(Some(node)) {
            return false;
        }
    }

    xs.iter().all(|x| tree.contains(x) == Ok(true))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x) == Ok(None))
}

#[quickcheck]
fn in_order_is_sorted_and_deduplicated(xs: Vec<i16>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let expected: BTreeSet<_> = xs.iter().collect();

    tree.values().eq(expected.into_iter())
}

#[quickcheck]
fn successor_and_predecessor_are_inverse(xs: Vec<i8>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    let nodes: Vec<_> = tree.in_order().collect();
    let forward = nodes.windows(2).all(|pair| {
        tree.successor(pair[0]) == Ok(Some(pair[1]))
            && tree.predecessor(pair[1]) == Ok(Some(pair[0]))
    });
    let ends = match (nodes.first(), nodes.last()) {
        (Some(&first), Some(&last)) => {
            tree.predecessor(first) == Ok(None) && tree.successor(last) == Ok(None)
        }
        _ => true,
    };

    forward && ends
}

#[quickcheck]
fn deleting_everything_empties_the_tree(xs: Vec<i8>) -> bool {
    let mut tree = AvlTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    for x in &xs {
        if let Some(node) = tree.search(x).unwrap() {
            tree.delete(node).unwrap();
        }
        if !balanced(&tree) || tree.contains(x) != Ok(false) {
            return false;
        }
    }

    tree.is_empty() && tree.root().is_none() && tree.height() == -1
}

#[test]
fn ascending_insertions_build_a_perfect_tree() {
    let mut tree = AvlTree::new();
    for x in 1..=15 {
        tree.insert(x).unwrap();
    }

    assert_eq!(tree.height(), 3);
    assert_eq!(tree.root().and_then(|root| tree.value(root)), Some(&8));
    for node in tree.in_order() {
        assert_eq!(tree.balance_factor(node), Some(0));
    }
}

#[test]
fn deleting_from_an_empty_tree_fails() {
    let mut tree = AvlTree::new();
    let one = tree.insert(1).unwrap();
    assert_eq!(tree.delete(one), Ok(None));
    assert_eq!(tree.delete(one), Err(Error::EmptyTree));
}

#[test]
fn stale_handles_are_not_found() {
    let mut tree = AvlTree::new();
    let one = tree.insert(1).unwrap();
    tree.insert(2).unwrap();
    tree.delete(one).unwrap();

    assert_eq!(tree.delete(one), Err(Error::NotFound));
    assert_eq!(tree.successor(one), Ok(None));

    // The freed slot goes to the next insertion, but the old handle must not reach it.
    let three = tree.insert(3).unwrap();
    assert_ne!(three, one);
    assert_eq!(tree.value(one), None);
    assert_eq!(tree.delete(one), Err(Error::NotFound));
    assert_eq!(tree.successor(one), Ok(None));
    assert_eq!(tree.predecessor(one), Ok(None));
    assert_eq!(tree.contains(&3), Ok(true));
    assert!(tree.values().copied().eq([2, 3]));
    tree.validate().unwrap();
}

#[test]
fn clear_invalidates_handles() {
    let mut tree = AvlTree::new();
    let one = tree.insert(1).unwrap();
    tree.clear();
    tree.insert(2).unwrap();

    assert_eq!(tree.value(one), None);
    assert_eq!(tree.delete(one), Err(Error::NotFound));
    assert_eq!(tree.len(), 1);
}

#[test]
fn incomparable_values_are_rejected() {
    let mut tree = AvlTree::new();
    tree.insert(1.0).unwrap();

    assert_eq!(tree.insert(f64::NAN), Err(Error::InvalidOperand));
    assert_eq!(tree.remove(&f64::NAN), Err(Error::InvalidOperand));
    assert_eq!(tree.len(), 1);
    tree.validate().unwrap();
}
