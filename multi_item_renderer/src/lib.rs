// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi Item Renderer: a cached composition engine over `multi_item` trees.
//!
//! ## Overview
//!
//! A multi-item question is an [`Item`](multi_item::Item) of content and hint leaves laid
//! out by a [`Shape`](multi_item::Shape). [`MultiRenderer`] turns it into a tree of
//! [`RendererCell`]s, one element per leaf built by your [`ElementFactory`], and keeps that
//! tree until the item's identity changes.
//!
//! Leaf instances are external. Each one mounts itself through the [`LeafHandle`] its
//! element was given, and from then on the engine reaches it through the [`Leaf`] trait to:
//!
//! - fan out widget discovery across branches, excluding the caller
//!   ([`MultiRenderer::find_external_widgets`], [`LeafHandle::find_external_widgets`]);
//! - fold leaf scores into one [`Score`] and collect the guesses ([`MultiRenderer::score`]);
//! - snapshot and restore state as a nested JSON value
//!   ([`MultiRenderer::serialized_state`], [`MultiRenderer::restore_serialized_state`]).
//!
//! ## Errors
//!
//! A shape mismatch never escapes a rebuild. The renderer records it, logs it with
//! `tracing`, and answers every derivation with its identity result until a new item
//! arrives. [`MultiRenderer::render`] hands the error back so the caller can show it.
//!
//! ## Restoration
//!
//! Restoring state may complete asynchronously. Each dispatched leaf receives a
//! [`Completion`]; the caller's callback runs once, after the last one completes.
//! Completions that outlive a rebuild are ignored.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use multi_item::{Item, Shape};
//! use multi_item_renderer::{Completion, ElementFactory, Leaf, LeafHandle, MultiRenderer, Score};
//! use serde_json::{json, Value};
//!
//! struct Blank {
//!     answer: u32,
//!     typed: Cell<u32>,
//! }
//!
//! impl Leaf for Blank {
//!     type Widget = u32;
//!     type Guess = u32;
//!     type Criterion = ();
//!
//!     fn find_internal_widgets(&self, _: &()) -> Vec<u32> {
//!         vec![self.answer]
//!     }
//!     fn score(&self) -> Score {
//!         Score::points(u32::from(self.typed.get() == self.answer), 1)
//!     }
//!     fn user_input(&self) -> u32 {
//!         self.typed.get()
//!     }
//!     fn serialized_state(&self) -> Value {
//!         json!(self.typed.get())
//!     }
//!     fn restore_serialized_state(&self, state: Value, done: Completion) {
//!         if let Some(n) = state.as_u64().and_then(|n| u32::try_from(n).ok()) {
//!             self.typed.set(n);
//!         }
//!         done.complete();
//!     }
//! }
//!
//! /// Builds nothing but the handle; the "view" mounts leaves directly.
//! struct Handles;
//!
//! impl ElementFactory for Handles {
//!     type Content = u32;
//!     type Hint = ();
//!     type Tags = ();
//!     type Leaf = Blank;
//!     type Element = LeafHandle<Blank>;
//!
//!     fn content(&mut self, _: &u32, handle: LeafHandle<Blank>) -> LeafHandle<Blank> {
//!         handle
//!     }
//!     fn hint(&mut self, _: &(), handle: LeafHandle<Blank>) -> LeafHandle<Blank> {
//!         handle
//!     }
//! }
//!
//! let item = Rc::new(Item::List(vec![Item::Content(4), Item::Content(9)]));
//! let renderer = MultiRenderer::new(Handles, item, Shape::array(Shape::Content));
//!
//! // Mount one leaf per content position.
//! let leaves: Vec<_> = [4, 9]
//!     .into_iter()
//!     .map(|answer| Rc::new(Blank { answer, typed: Cell::new(0) }))
//!     .collect();
//! for (handle, leaf) in renderer.handles().iter().zip(&leaves) {
//!     handle.mount(leaf);
//! }
//!
//! renderer.restore_serialized_state(&json!([4, 2]), || {});
//! assert_eq!(renderer.score().score, Score::points(1, 2));
//! assert_eq!(renderer.serialized_state(), json!([4, 2]));
//! assert_eq!(renderer.find_external_widgets(&renderer.handles()[0], &()), vec![9]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`; install a
//! subscriber to see rebuilds, build failures and restorations.

#![no_std]

extern crate alloc;

mod cell;
mod leaf;
mod renderer;
mod restore;
mod score;

pub use cell::{LeafHandle, RendererCell};
pub use leaf::Leaf;
pub use renderer::{CellOf, CellTree, ElementFactory, ItemOf, MultiRenderer, RenderTree};
pub use restore::Completion;
pub use score::{CombineFn, Graded, LeafScore, Score};
