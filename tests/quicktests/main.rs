use quickcheck::{Arbitrary, Gen};

mod avl;
mod search;

/// The kinds of "things" to do to a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<V> {
    /// Insert the value into the tree
    Insert(V),
    /// Remove the value from the tree
    Remove(V),
    /// Compare the in-order values against the model
    Iter,
}

impl<V: Arbitrary> Arbitrary for Op<V> {
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2]).unwrap() {
            0 => Op::Insert(V::arbitrary(g)),
            1 => Op::Remove(V::arbitrary(g)),
            2 => Op::Iter,
            _ => unreachable!(),
        }
    }
}
