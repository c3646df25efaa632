// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition engine.
//!
//! ## Overview
//!
//! [`MultiRenderer`] builds a tree of [`RendererCell`]s from an item and its shape, one
//! cell per content or hint leaf, and keeps it cached until the item changes. Scores,
//! guesses and serialized state are derived from the cached tree on demand.
//!
//! ## States
//!
//! - Ready: the cell tree and the registry of leaf handles are cached.
//! - Errored: the last build failed; the [`ShapeMismatch`] is kept for display.
//!
//! Every derivation on an errored renderer returns its identity result instead of
//! failing: no widgets, [`Score::ZERO`], `null` state.
//!
//! ## Rebuilds
//!
//! A rebuild happens only when [`MultiRenderer::rebuild`] is given an item that is not
//! the same `Rc` as the cached one. Deep equality is not consulted, so an unrelated
//! re-render that passes the cached item back never resets the leaves' cells.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use multi_item::{
    HintRun, Item, LeafKinds, LeafRef, NodeKind, Path, Shape, ShapeMismatch, Tree, TreeMapper,
    build_tree, lens,
};
use serde_json::Value;

use crate::cell::{LeafHandle, Registry, RendererCell};
use crate::leaf::Leaf;
use crate::restore;
use crate::score::{CombineFn, Graded, LeafScore, Score};

/// Builds the element for each leaf of an item.
///
/// The factory is the consumer's seam: it receives each leaf payload together with the
/// [`LeafHandle`] the eventual leaf instance must [`mount`](LeafHandle::mount) itself
/// through.
pub trait ElementFactory {
    /// Content leaf payload.
    type Content;
    /// Hint leaf payload.
    type Hint;
    /// Tags leaf payload, carried through to the cell tree unchanged.
    type Tags: Clone;
    /// Mounted leaf type.
    type Leaf: Leaf + ?Sized;
    /// What the factory builds per leaf.
    type Element;

    /// Build the element for a content leaf.
    fn content(&mut self, content: &Self::Content, handle: LeafHandle<Self::Leaf>)
    -> Self::Element;

    /// Build the element for a hint leaf.
    fn hint(&mut self, hint: &Self::Hint, handle: LeafHandle<Self::Leaf>) -> Self::Element;
}

/// Item type a factory renders.
pub type ItemOf<F> =
    Item<<F as ElementFactory>::Content, <F as ElementFactory>::Hint, <F as ElementFactory>::Tags>;

/// Cell type a factory's leaves are cached in.
pub type CellOf<F> = RendererCell<<F as ElementFactory>::Element, <F as ElementFactory>::Leaf>;

/// The cached tree of a ready renderer.
pub type CellTree<F> = Tree<CellOf<F>, CellOf<F>, <F as ElementFactory>::Tags>;

type GuessOf<F> = <<F as ElementFactory>::Leaf as Leaf>::Guess;
type WidgetOf<F> = <<F as ElementFactory>::Leaf as Leaf>::Widget;
type CriterionOf<F> = <<F as ElementFactory>::Leaf as Leaf>::Criterion;

enum State<F: ElementFactory> {
    Ready {
        cells: CellTree<F>,
        registry: Rc<Registry<F::Leaf>>,
    },
    Errored(ShapeMismatch),
}

/// Cached composition engine over one item.
///
/// ## Usage
///
/// - Construct with [`MultiRenderer::new`]; the initial tree is built eagerly.
/// - Mount leaf instances through the handles passed to the factory.
/// - Call [`MultiRenderer::rebuild`] whenever the surrounding system re-renders; it is
///   a no-op unless the item's identity changed.
/// - Derive [`MultiRenderer::score`], [`MultiRenderer::scores`] and
///   [`MultiRenderer::serialized_state`], or push state back with
///   [`MultiRenderer::restore_serialized_state`].
/// - Draw with [`MultiRenderer::render`].
/// - Optionally configure the score operator with [`MultiRenderer::set_combine`].
pub struct MultiRenderer<F: ElementFactory> {
    factory: F,
    item: Rc<ItemOf<F>>,
    shape: Shape,
    state: State<F>,
    live: Rc<Cell<u64>>,
    combine: CombineFn,
}

impl<F: ElementFactory> fmt::Debug for MultiRenderer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiRenderer")
            .field("generation", &self.generation())
            .field("shape", &self.shape)
            .field("error", &self.error())
            .field("leaves", &self.handles().len())
            .finish_non_exhaustive()
    }
}

impl<F: ElementFactory> MultiRenderer<F> {
    /// Build the renderer for `item`, described by `shape`.
    ///
    /// A shape mismatch does not fail construction; the renderer starts out errored.
    pub fn new(mut factory: F, item: Rc<ItemOf<F>>, shape: Shape) -> Self {
        let state = build_state(&mut factory, &item, &shape, 1);
        Self {
            factory,
            item,
            shape,
            state,
            live: Rc::new(Cell::new(1)),
            combine: Score::combine,
        }
    }

    /// Set the operator [`MultiRenderer::score`] folds leaf scores with.
    ///
    /// Must be associative with identity [`Score::ZERO`]. Defaults to [`Score::combine`].
    pub fn set_combine(&mut self, combine: CombineFn) {
        self.combine = combine;
    }

    /// Rebuild the cell tree if `item` is not the cached item.
    ///
    /// Returns whether a rebuild happened. `shape` is only taken when it does.
    pub fn rebuild(&mut self, item: &Rc<ItemOf<F>>, shape: &Shape) -> bool {
        if Rc::ptr_eq(&self.item, item) {
            return false;
        }
        self.item = Rc::clone(item);
        self.shape = shape.clone();
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        let generation = self.live.get() + 1;
        self.live.set(generation);
        self.state = build_state(&mut self.factory, &self.item, &self.shape, generation);
    }

    /// The cached item.
    pub fn item(&self) -> &Rc<ItemOf<F>> {
        &self.item
    }

    /// The shape the cached tree was built from.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The current rebuild generation, starting at 1.
    pub fn generation(&self) -> u64 {
        self.live.get()
    }

    /// Whether the last build succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// The last build's error, if it failed.
    pub fn error(&self) -> Option<&ShapeMismatch> {
        match &self.state {
            State::Errored(err) => Some(err),
            State::Ready { .. } => None,
        }
    }

    /// Handles of every content and hint leaf, in pre-order. Empty when errored.
    pub fn handles(&self) -> &[LeafHandle<F::Leaf>] {
        match &self.state {
            State::Ready { registry, .. } => registry.handles(),
            State::Errored(_) => &[],
        }
    }

    /// The cached cell tree, `None` when errored.
    pub fn cells(&self) -> Option<&CellTree<F>> {
        match &self.state {
            State::Ready { cells, .. } => Some(cells),
            State::Errored(_) => None,
        }
    }

    /// Widgets matching `criterion` in every mounted leaf except `caller`'s, in pre-order.
    ///
    /// Empty when errored, or when `caller` belongs to an earlier build.
    pub fn find_external_widgets(
        &self,
        caller: &LeafHandle<F::Leaf>,
        criterion: &CriterionOf<F>,
    ) -> Vec<WidgetOf<F>> {
        if !caller.is_current() {
            return Vec::new();
        }
        match &self.state {
            State::Ready { registry, .. } => registry.find_external_widgets(caller, criterion),
            State::Errored(_) => Vec::new(),
        }
    }

    /// Per-leaf guesses and scores.
    ///
    /// Content leaves map to their leaf's input and score, or `None` while unmounted.
    /// Hint and tags leaves map to `()`. `None` when errored.
    pub fn scores(&self) -> Option<Tree<Option<LeafScore<GuessOf<F>>>, (), ()>> {
        let cells = self.cells()?;
        TreeMapper::new(
            |cell: &CellOf<F>, _: &Path| {
                let (guess, score) = cell.leaf()?.guess_and_score();
                Some(LeafScore { guess, score })
            },
            |_, _| (),
            |_, _| (),
        )
        .map_tree(cells, &self.shape)
        .ok()
    }

    /// Composite score with the configured operator, plus the guess tree.
    pub fn score(&self) -> Graded<GuessOf<F>> {
        self.score_with(self.combine)
    }

    /// Composite score folded with `combine`, plus the guess tree.
    ///
    /// Mounted content leaves contribute in pre-order, folded from [`Score::ZERO`]; with
    /// no mounted leaves the result is [`Score::ZERO`].
    pub fn score_with(&self, combine: CombineFn) -> Graded<GuessOf<F>> {
        let mut score = Score::ZERO;
        let guesses = self.cells().and_then(|cells| {
            TreeMapper::new(
                |cell: &CellOf<F>, _: &Path| {
                    let (guess, leaf_score) = cell.leaf()?.guess_and_score();
                    score = combine(core::mem::take(&mut score), leaf_score);
                    Some(guess)
                },
                |_, _| (),
                |_, _| (),
            )
            .map_tree(cells, &self.shape)
            .ok()
        });
        Graded { score, guesses }
    }

    /// Snapshot of every mounted leaf's state, nested like the item.
    ///
    /// Unmounted leaves and tags are `null`; an errored renderer yields `null`.
    pub fn serialized_state(&self) -> Value {
        let Some(cells) = self.cells() else {
            return Value::Null;
        };
        let state = |cell: &CellOf<F>, _: &Path| {
            cell.leaf()
                .map_or(Value::Null, |leaf| leaf.serialized_state())
        };
        TreeMapper::new(state, state, |_, _| Value::Null)
            .map_tree(cells, &self.shape)
            .map_or(Value::Null, lens::from_tree)
    }

    /// Hand each mounted leaf its part of `state`; `on_done` runs once all have finished.
    ///
    /// Leaves whose path is absent from `state` are skipped and keep their current
    /// state. Returns the number of leaves dispatched to. `on_done` runs before this
    /// returns when nothing was dispatched, when every leaf completed synchronously, or
    /// when the renderer is errored. Completions arriving after a rebuild are ignored.
    pub fn restore_serialized_state(
        &self,
        state: &Value,
        on_done: impl FnOnce() + 'static,
    ) -> usize {
        match &self.state {
            State::Ready { registry, .. } => restore::dispatch(
                registry.handles(),
                state,
                self.generation(),
                &self.live,
                Box::new(on_done),
            ),
            State::Errored(_) => {
                on_done();
                0
            }
        }
    }

    /// Expose the built elements to `compose`, or return the build error.
    pub fn render<R>(
        &self,
        compose: impl FnOnce(RenderTree<'_, F::Element, F::Tags>) -> R,
    ) -> Result<R, ShapeMismatch> {
        let cells = match &self.state {
            State::Ready { cells, .. } => cells,
            State::Errored(err) => return Err(err.clone()),
        };
        let hint_arrays = RefCell::new(Vec::new());
        let tree = TreeMapper::new(
            |cell: &CellOf<F>, _: &Path| &cell.element,
            |cell: &CellOf<F>, _: &Path| &cell.element,
            |tags: &F::Tags, _: &Path| tags,
        )
        .array(|children, _, element, path| {
            if *element == Shape::Hint {
                hint_arrays.borrow_mut().push(path.clone());
            }
            children
        })
        .map_tree(cells, &self.shape)?;
        Ok(compose(RenderTree {
            tree,
            hint_arrays: hint_arrays.take(),
        }))
    }
}

fn build_state<F: ElementFactory>(
    factory: &mut F,
    item: &ItemOf<F>,
    shape: &Shape,
    generation: u64,
) -> State<F> {
    match build_cells(factory, item, shape, generation) {
        Ok((cells, registry)) => {
            tracing::debug!(
                generation,
                leaves = registry.handles().len(),
                "built multi-item tree"
            );
            State::Ready { cells, registry }
        }
        Err(err) => {
            tracing::error!(%err, generation, "failed to build multi-item tree");
            State::Errored(err)
        }
    }
}

fn build_cells<F: ElementFactory>(
    factory: &mut F,
    item: &ItemOf<F>,
    shape: &Shape,
    generation: u64,
) -> Result<(CellTree<F>, Rc<Registry<F::Leaf>>), ShapeMismatch> {
    let data = build_tree(item, shape)?;
    let registry = Rc::new(Registry::new(generation));
    let weak = Rc::downgrade(&registry);
    let handles = RefCell::new(Vec::new());
    let handle_for = |path: &Path, kind: NodeKind| {
        let handle = LeafHandle::new(path.clone(), kind, generation, weak.clone());
        handles.borrow_mut().push(handle.clone());
        handle
    };
    // Both leaf constructors call into the factory.
    let factory = RefCell::new(factory);
    let cells = TreeMapper::new(
        |content: &&F::Content, path: &Path| {
            let handle = handle_for(path, NodeKind::Content);
            RendererCell {
                element: factory.borrow_mut().content(content, handle.clone()),
                handle,
            }
        },
        |hint: &&F::Hint, path: &Path| {
            let handle = handle_for(path, NodeKind::Hint);
            RendererCell {
                element: factory.borrow_mut().hint(hint, handle.clone()),
                handle,
            }
        },
        |tags: &&F::Tags, _: &Path| (*tags).clone(),
    )
    .map_tree(&data, shape)?;
    registry.fill(handles.into_inner());
    Ok((cells, registry))
}

/// Borrowed view of a ready renderer's elements, handed to the `render` callback.
///
/// Mirrors the item: content and hint positions hold their elements, tags positions
/// their payload. Arrays made of hint leaves additionally expose a [`HintRun`].
pub struct RenderTree<'a, E, T> {
    tree: Tree<&'a E, &'a E, &'a T>,
    hint_arrays: Vec<Path>,
}

impl<E, T> fmt::Debug for RenderTree<'_, E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTree")
            .field("hint_arrays", &self.hint_arrays)
            .finish_non_exhaustive()
    }
}

impl<'a, E, T> RenderTree<'a, E, T> {
    /// The element tree.
    pub fn tree(&self) -> &Tree<&'a E, &'a E, &'a T> {
        &self.tree
    }

    /// Paths of every array whose elements are hint leaves, in post-order.
    pub fn hint_arrays(&self) -> &[Path] {
        &self.hint_arrays
    }

    /// The "first N hints" view of the hint array at `path`.
    pub fn hints_at(&self, path: &Path) -> Option<HintRun<'_, &'a E, &'a E, &'a T>> {
        if !self.hint_arrays.contains(path) {
            return None;
        }
        self.tree.node_at(path)?.hint_run()
    }

    /// Visit every content and hint element in pre-order.
    pub fn for_each_element(&self, mut f: impl FnMut(&Path, NodeKind, &'a E)) {
        self.tree
            .for_each_leaf(LeafKinds::CONTENT | LeafKinds::HINT, |path, leaf| {
                match leaf {
                    LeafRef::Content(e) => f(path, NodeKind::Content, *e),
                    LeafRef::Hint(e) => f(path, NodeKind::Hint, *e),
                    LeafRef::Tags(_) => {}
                }
            });
    }
}
