// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer scoring.
//!
//! A two-page question of numeric blanks. Leaves mount through their handles, one leaf
//! discovers the inputs of the others, and the renderer folds their scores. Rebuilds
//! are gated on item identity, and a mismatched item leaves the renderer errored.
//!
//! Run:
//! - `cargo run -p multi_item_demos --example renderer_scoring`

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;

use multi_item::{Item, Shape};
use multi_item_renderer::{Completion, ElementFactory, Leaf, LeafHandle, MultiRenderer, Score};
use serde_json::{Value, json};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// A numeric blank.
struct Blank {
    id: &'static str,
    answer: i64,
    typed: Cell<Option<i64>>,
}

impl Leaf for Blank {
    type Widget = String;
    type Guess = Option<i64>;
    type Criterion = str;

    fn find_internal_widgets(&self, prefix: &str) -> Vec<String> {
        if self.id.starts_with(prefix) {
            vec![format!("{} = {:?}", self.id, self.typed.get())]
        } else {
            Vec::new()
        }
    }

    fn score(&self) -> Score {
        match self.typed.get() {
            None => Score::points(0, 1),
            Some(n) if n == self.answer => Score::points(1, 1),
            Some(n) => Score::Points {
                earned: 0,
                total: 1,
                message: Some(format!("{} is not {n}", self.id)),
            },
        }
    }

    fn user_input(&self) -> Option<i64> {
        self.typed.get()
    }

    fn serialized_state(&self) -> Value {
        json!({ "typed": self.typed.get() })
    }

    fn restore_serialized_state(&self, state: Value, done: Completion) {
        self.typed.set(state["typed"].as_i64());
        done.complete();
    }
}

/// The "view": elements are labels paired with their handles.
struct View;

struct Element {
    label: String,
    blank: Option<(&'static str, i64)>,
    handle: LeafHandle<Blank>,
}

impl ElementFactory for View {
    type Content = (&'static str, i64);
    type Hint = &'static str;
    type Tags = ();
    type Leaf = Blank;
    type Element = Element;

    fn content(&mut self, content: &(&'static str, i64), handle: LeafHandle<Blank>) -> Element {
        Element {
            label: format!("blank {} at {}", content.0, handle.path()),
            blank: Some(*content),
            handle,
        }
    }

    fn hint(&mut self, hint: &&'static str, handle: LeafHandle<Blank>) -> Element {
        Element {
            label: format!("hint {hint:?}"),
            blank: None,
            handle,
        }
    }
}

fn question() -> Rc<Item<(&'static str, i64), &'static str, ()>> {
    Rc::new(Item::List(vec![
        Item::List(vec![Item::Content(("a", 4)), Item::Content(("b", 9))]),
        Item::List(vec![Item::Content(("c", 16))]),
    ]))
}

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let shape = Shape::array(Shape::array(Shape::Content));
    let item = question();
    let mut renderer = MultiRenderer::new(View, Rc::clone(&item), shape.clone());

    // Mount a leaf per element, as a view layer would once it instantiates them.
    let mut leaves = Vec::new();
    renderer.render(|tree| {
        tree.for_each_element(|_, _, element| {
            println!("built {}", element.label);
            if let Some((id, answer)) = element.blank {
                let leaf = Rc::new(Blank {
                    id,
                    answer,
                    typed: Cell::new(None),
                });
                element.handle.mount(&leaf);
                leaves.push(leaf);
            }
        });
    })?;

    leaves[0].typed.set(Some(4));
    leaves[1].typed.set(Some(8));

    println!("\n== Discovery from blank a ==");
    for widget in renderer.handles()[0].find_external_widgets("") {
        println!("  {widget}");
    }

    let graded = renderer.score();
    println!("\n== Score ==\n  {}", serde_json::to_string(&graded.score)?);
    println!("  guesses: {:?}", graded.guesses);
    println!("  state: {}", renderer.serialized_state());

    println!("\n== Rebuilds ==");
    println!("  same item rebuilt: {}", renderer.rebuild(&item, &shape));
    println!("  copy rebuilt: {}", renderer.rebuild(&Rc::new((*item).clone()), &shape));
    println!("  score after rebuild: {:?}", renderer.score().score);

    let flat = Rc::new(Item::List(vec![Item::List(vec![Item::Hint("no")])]));
    renderer.rebuild(&flat, &shape);
    if let Err(err) = renderer.render(|_| ()) {
        println!("  errored: {err}");
    }
    Ok(())
}
