use std::collections::BTreeSet;

use avl_tree::SearchTree;
use quickcheck_macros::quickcheck;

use crate::Op;

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = SearchTree::new();
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
        if tree.validate().is_err() {
            return false;
        }
    }

    set.iter().all(|v| tree.contains(v) == Ok(true)) && tree.len() == set.len()
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = SearchTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    for delete in &deletes {
        tree.remove(delete).unwrap();
    }

    let mut still_present: BTreeSet<_> = xs.into_iter().collect();
    for delete in &deletes {
        still_present.remove(delete);
    }

    tree.validate().is_ok() && tree.values().eq(still_present.iter())
}

#[quickcheck]
fn minimum_and_maximum_match_the_extremes(xs: Vec<i8>) -> bool {
    let mut tree = SearchTree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    let min = tree.minimum().and_then(|node| tree.value(node));
    let max = tree.maximum().and_then(|node| tree.value(node));
    min == xs.iter().min() && max == xs.iter().max()
}

#[test]
fn sorted_insertions_degenerate_into_a_chain() {
    let mut tree = SearchTree::new();
    for x in 0..100 {
        tree.insert(x).unwrap();
    }

    assert_eq!(tree.height(), 99);
    tree.validate().unwrap();
}
