// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree basics.
//!
//! Builds a tree from an item and its shape, reports a shape mismatch, derives a new
//! tree with the mapper, and routes a state blob through the lens.
//!
//! Run:
//! - `cargo run -p multi_item_demos --example tree_basics`

use multi_item::{Item, LeafKinds, LeafRef, Path, Shape, TreeMapper, build_tree, lens};
use serde_json::{Value, json};

fn main() {
    // Two pages of content blocks.
    let shape = Shape::array(Shape::array(Shape::Content));
    let item: Item<&str, (), ()> = Item::List(vec![
        Item::List(vec![
            Item::Content("What is 2 + 2?"),
            Item::Content("Show your work."),
        ]),
        Item::List(vec![Item::Content("What is 3 * 3?")]),
    ]);

    let tree = match build_tree(&item, &shape) {
        Ok(tree) => tree,
        Err(err) => {
            println!("build failed: {err}");
            return;
        }
    };

    println!("== Leaves (pre-order) ==");
    tree.for_each_leaf(LeafKinds::all(), |path, leaf| {
        if let LeafRef::Content(text) = leaf {
            println!("  {path}\t{text}");
        }
    });

    // Derive a state-shaped tree: one JSON value per leaf.
    let Ok(lengths) = TreeMapper::new(
        |text: &&&str, _: &Path| json!({ "chars": text.len() }),
        |_: &&(), _: &Path| Value::Null,
        |_: &&(), _: &Path| Value::Null,
    )
    .map_tree(&tree, &shape) else {
        return;
    };
    let mut state = lens::from_tree(lengths);
    println!("\n== Derived state ==\n  {state}");

    lens::set(&mut state, &Path::from(vec![1, 3]), json!({ "chars": 0 }));
    println!("\n== After set at /1/3 ==\n  {state}");
    for path in [vec![0, 1], vec![1, 2], vec![4, 0]] {
        let path = Path::from(path);
        println!("  get {path}\t-> {:?}", lens::get(&state, &path));
    }

    // The same item against a shape it does not match.
    let flat = Shape::array(Shape::Content);
    if let Err(err) = build_tree(&item, &flat) {
        println!("\n== Mismatch ==\n  {err}");
    }
}
