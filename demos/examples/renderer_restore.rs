// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer restore.
//!
//! Restores serialized state into leaves that finish at different times. The callback
//! fires once, after the last leaf completes. A restoration still in flight when the
//! item changes is ignored.
//!
//! Run:
//! - `cargo run -p multi_item_demos --example renderer_restore`

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

use multi_item::{Item, Shape};
use multi_item_renderer::{Completion, ElementFactory, Leaf, LeafHandle, MultiRenderer, Score};
use serde_json::{Value, json};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// A leaf that finishes restoring only when told to.
struct SlowLeaf {
    name: String,
    state: RefCell<Value>,
    pending: RefCell<Option<Completion>>,
}

impl SlowLeaf {
    fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_owned(),
            state: RefCell::new(Value::Null),
            pending: RefCell::new(None),
        })
    }

    fn finish(&self) {
        let done = self.pending.borrow_mut().take();
        if let Some(done) = done {
            println!("  {} finishes ({})", self.name, done.path());
            done.complete();
        }
    }
}

impl Leaf for SlowLeaf {
    type Widget = ();
    type Guess = Value;
    type Criterion = ();

    fn find_internal_widgets(&self, _: &()) -> Vec<()> {
        Vec::new()
    }

    fn score(&self) -> Score {
        Score::ZERO
    }

    fn user_input(&self) -> Value {
        self.state.borrow().clone()
    }

    fn serialized_state(&self) -> Value {
        self.state.borrow().clone()
    }

    fn restore_serialized_state(&self, state: Value, done: Completion) {
        *self.state.borrow_mut() = state;
        *self.pending.borrow_mut() = Some(done);
    }
}

struct Handles;

impl ElementFactory for Handles {
    type Content = &'static str;
    type Hint = &'static str;
    type Tags = ();
    type Leaf = SlowLeaf;
    type Element = LeafHandle<SlowLeaf>;

    fn content(&mut self, _: &&'static str, handle: LeafHandle<SlowLeaf>) -> Self::Element {
        handle
    }

    fn hint(&mut self, _: &&'static str, handle: LeafHandle<SlowLeaf>) -> Self::Element {
        handle
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // One run of hints per part of the question.
    let shape = Shape::array(Shape::array(Shape::Hint));
    let item = Rc::new(Item::List(vec![
        Item::List(vec![Item::Hint("think small"), Item::Hint("try 4")]),
        Item::List(vec![Item::Hint("squares")]),
    ]));
    let mut renderer = MultiRenderer::new(Handles, item, shape.clone());

    let leaves: Vec<_> = renderer
        .handles()
        .iter()
        .map(|handle| {
            let leaf = SlowLeaf::new(&format!("hint {}", handle.path()));
            handle.mount(&leaf);
            leaf
        })
        .collect();

    let done = Rc::new(Cell::new(0));
    let on_done = {
        let done = Rc::clone(&done);
        move || {
            done.set(done.get() + 1);
            println!("  all leaves restored");
        }
    };

    // The last hint was added after this state was saved.
    let saved = json!([[{ "seen": true }, { "seen": false }], []]);
    println!("== Restore ==");
    let dispatched = renderer.restore_serialized_state(&saved, on_done);
    println!("  dispatched to {dispatched} of {} leaves", leaves.len());

    leaves[1].finish();
    leaves[0].finish();
    println!("  callback fired {} time(s)", done.get());

    println!("\n== Restore interrupted by a rebuild ==");
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    renderer.restore_serialized_state(&saved, move || flag.set(true));
    let next = Rc::new(Item::List(vec![Item::List(vec![Item::Hint("fresh")])]));
    renderer.rebuild(&next, &shape);
    leaves[0].finish();
    leaves[1].finish();
    println!("  stale callback fired: {}", fired.get());
    Ok(())
}
