// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi Item: shape-described trees of content, hint and tags nodes.
//!
//! Multi Item is the data layer of a multi-item question renderer.
//!
//! - A [`Shape`] declares, position by position, whether a node is a content leaf, a hint
//!   leaf, a tags leaf, or an array of a sub-shape.
//! - An [`Item`] is the source snapshot with that topology.
//! - [`build_tree`] validates an item against its shape and produces a [`Tree`] that
//!   borrows the item's payloads, or a [`ShapeMismatch`] naming the first offending path.
//! - [`TreeMapper`] derives new trees (renderers, scores, state) with per-kind transforms,
//!   preserving structure and [`Path`]s exactly.
//! - [`lens`] reads and writes plain nested state blobs using the same paths.
//!
//! ## Where this fits
//!
//! The composition engine (`multi_item_renderer`) builds a tree of renderer cells from
//! an item once, caches it, and re-derives score and state trees from it on demand.
//! Everything here is synchronous, allocation-light and free of I/O.
//!
//! ## Traversal order
//!
//! Every walk in this crate is the same fixed pre-order: top to bottom, left to right.
//! [`Tree::for_each_leaf`] takes a [`LeafKinds`] filter to restrict the visited leaves.
//!
//! # Example
//!
//! ```rust
//! use multi_item::{build_tree, Item, LeafKinds, Path, Shape, TreeMapper};
//!
//! // Two content blocks and two hints, as parallel arrays.
//! let shape = Shape::array(Shape::array(Shape::Content));
//! let item: Item<&str, (), ()> = Item::List(vec![
//!     Item::List(vec![Item::Content("intro"), Item::Content("question")]),
//!     Item::List(vec![Item::Content("follow-up")]),
//! ]);
//!
//! let tree = build_tree(&item, &shape).unwrap();
//! assert_eq!(tree.leaf_count(LeafKinds::CONTENT), 3);
//!
//! // Derive a tree of lengths, keeping positions.
//! let lengths = TreeMapper::identity()
//!     // The tree borrows the item, so payloads arrive as `&&&str`.
//!     .content(|text: &&&str, _: &Path| text.len())
//!     .map_tree(&tree, &shape)
//!     .unwrap();
//! assert!(lengths.conforms_to(&shape));
//! assert_eq!(
//!     lengths.leaf_at(&Path::from(vec![1, 0])),
//!     Some(multi_item::LeafRef::Content(&9)),
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod item;
pub mod lens;
mod mapper;
mod path;
mod shape;
mod tree;
mod types;

pub use error::ShapeMismatch;
pub use item::Item;
pub use mapper::{HookedTreeMapper, TreeMapper};
pub use path::{Path, Step};
pub use shape::Shape;
pub use tree::{HintRun, LeafRef, Tree, build_tree};
pub use types::{LeafKinds, NodeKind};
