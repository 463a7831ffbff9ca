//! Walks an AVL tree through insertion, lookups, traversals and deletion, printing the tree along
//! the way. Set `RUST_LOG=trace` to also see every rotation.

use std::io;

use avl_tree::{AvlTree, Error, NodeId, Result};
use tracing::info;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn show(tree: &AvlTree<i32>, node: Option<NodeId>) -> String {
    match node.and_then(|node| tree.value(node)) {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}

fn main() -> Result<()> {
    init_tracing();

    info!("inserting");
    let mut tree = AvlTree::with_root(1);
    for value in [3, 4, 6, 7, 8, 10, 13, 14] {
        tree.insert(value)?;
    }
    info!(len = tree.len(), height = tree.height(), "inserted");

    println!("walked in-order:");
    tree.walk_in_order(tree.root(), |_, value| print!(" {value}"));
    println!();

    println!("cursor in-order:");
    for node in tree.in_order() {
        print!(" {}", show(&tree, Some(node)));
    }
    println!();

    for key in [6, 12] {
        let found = tree.search(&key)?;
        println!("search {key}: {}", show(&tree, found));
    }
    println!("minimum: {}", show(&tree, tree.minimum()));
    println!("maximum: {}", show(&tree, tree.maximum()));

    let nodes: Vec<NodeId> = tree.in_order().collect();
    println!("successors:");
    for &node in &nodes {
        let next = tree.successor(node)?;
        println!("  {} -> {}", show(&tree, Some(node)), show(&tree, next));
    }
    println!("predecessors:");
    for &node in &nodes {
        let prev = tree.predecessor(node)?;
        println!("  {} -> {}", show(&tree, Some(node)), show(&tree, prev));
    }

    println!("outline:");
    print!("{}", tree.outline());

    info!("deleting");
    let values: Vec<i32> = tree.values().copied().collect();
    for value in values {
        // Deleting a node with two children moves its successor's value, so look each one up
        // again instead of reusing the handles collected above.
        let node = tree.search(&value)?.ok_or(Error::NotFound)?;
        println!("deleting {value}:");
        tree.delete(node)?;
        print!("{}", tree.outline());
    }
    info!(len = tree.len(), "done");

    Ok(())
}
