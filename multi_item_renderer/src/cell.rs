// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-leaf cells, their handles, and the per-generation registry.
//!
//! ## Ownership
//!
//! - The engine owns the [`Registry`] of the current generation, which owns one
//!   [`LeafHandle`] per content or hint leaf.
//! - Each handle points back at the registry weakly, and at its mounted leaf weakly.
//! - Elements built by the factory hold handle clones, and leaves hold nothing of the
//!   engine beyond what their element hands them.
//!
//! A rebuild drops the old registry, which makes every handle of that generation stale:
//! discovery through a stale handle finds nothing.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{OnceCell, RefCell};
use core::fmt;

use multi_item::{NodeKind, Path};

use crate::leaf::Leaf;

pub(crate) struct Slot<L: ?Sized> {
    path: Path,
    kind: NodeKind,
    generation: u64,
    leaf: RefCell<Option<Weak<L>>>,
    registry: Weak<Registry<L>>,
}

/// Stable setter handed to an element when it is built.
///
/// One handle exists per content or hint leaf per generation; clones share the same
/// cell. The mounted leaf registers itself with [`LeafHandle::mount`], which is the
/// only mutation a cell ever sees.
pub struct LeafHandle<L: ?Sized>(Rc<Slot<L>>);

impl<L: ?Sized> Clone for LeafHandle<L> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<L: ?Sized> fmt::Debug for LeafHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafHandle")
            .field("path", &self.0.path)
            .field("kind", &self.0.kind)
            .field("generation", &self.0.generation)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl<L: ?Sized> LeafHandle<L> {
    pub(crate) fn new(
        path: Path,
        kind: NodeKind,
        generation: u64,
        registry: Weak<Registry<L>>,
    ) -> Self {
        Self(Rc::new(Slot {
            path,
            kind,
            generation,
            leaf: RefCell::new(None),
            registry,
        }))
    }

    /// Record `leaf` as this cell's mounted instance.
    ///
    /// Only a weak reference is kept; the leaf's owner decides its lifetime.
    pub fn mount(&self, leaf: &Rc<L>) {
        *self.0.leaf.borrow_mut() = Some(Rc::downgrade(leaf));
    }

    /// Forget the mounted instance.
    pub fn unmount(&self) {
        self.0.leaf.borrow_mut().take();
    }

    /// The mounted leaf, if any and still alive.
    pub fn leaf(&self) -> Option<Rc<L>> {
        self.0.leaf.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Whether a live leaf is mounted.
    pub fn is_mounted(&self) -> bool {
        self.0
            .leaf
            .borrow()
            .as_ref()
            .is_some_and(|leaf| leaf.strong_count() > 0)
    }

    /// Position of the cell's leaf.
    pub fn path(&self) -> &Path {
        &self.0.path
    }

    /// [`NodeKind::Content`] or [`NodeKind::Hint`].
    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    /// The rebuild generation that created this cell.
    pub fn generation(&self) -> u64 {
        self.0.generation
    }

    /// Whether this cell belongs to the engine's current tree.
    pub fn is_current(&self) -> bool {
        self.0.registry.strong_count() > 0
    }

    /// Whether both handles refer to the same cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<L: Leaf + ?Sized> LeafHandle<L> {
    /// Widgets matching `criterion` in every other mounted leaf of this cell's tree.
    ///
    /// Empty once the cell is stale.
    pub fn find_external_widgets(&self, criterion: &L::Criterion) -> Vec<L::Widget> {
        match self.0.registry.upgrade() {
            Some(registry) => registry.find_external_widgets(self, criterion),
            None => Vec::new(),
        }
    }
}

/// A cached leaf: the element built for it plus its handle.
pub struct RendererCell<E, L: ?Sized> {
    pub(crate) element: E,
    pub(crate) handle: LeafHandle<L>,
}

impl<E: fmt::Debug, L: ?Sized> fmt::Debug for RendererCell<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererCell")
            .field("element", &self.element)
            .field("handle", &self.handle)
            .finish()
    }
}

impl<E, L: ?Sized> RendererCell<E, L> {
    /// The element the factory built for this leaf.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The cell's handle.
    pub fn handle(&self) -> &LeafHandle<L> {
        &self.handle
    }

    /// The mounted leaf, if any.
    pub fn leaf(&self) -> Option<Rc<L>> {
        self.handle.leaf()
    }
}

/// Every handle of one generation, in pre-order.
pub(crate) struct Registry<L: ?Sized> {
    generation: u64,
    handles: OnceCell<Vec<LeafHandle<L>>>,
}

impl<L: ?Sized> Registry<L> {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            handles: OnceCell::new(),
        }
    }

    /// Install the generation's handles. Later calls are ignored.
    pub(crate) fn fill(&self, handles: Vec<LeafHandle<L>>) {
        if self.handles.set(handles).is_err() {
            tracing::warn!(generation = self.generation, "registry already filled");
        }
    }

    pub(crate) fn handles(&self) -> &[LeafHandle<L>] {
        self.handles.get().map(Vec::as_slice).unwrap_or_default()
    }
}

impl<L: Leaf + ?Sized> Registry<L> {
    pub(crate) fn find_external_widgets(
        &self,
        caller: &LeafHandle<L>,
        criterion: &L::Criterion,
    ) -> Vec<L::Widget> {
        let mut found = Vec::new();
        for handle in self.handles() {
            if handle.same_cell(caller) {
                continue;
            }
            if let Some(leaf) = handle.leaf() {
                found.extend(leaf.find_internal_widgets(criterion));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Named(&'static str);

    #[test]
    fn mount_is_weak_and_reversible() {
        let registry = Rc::new(Registry::<Named>::new(1));
        let handle = LeafHandle::new(
            Path::from(vec![0]),
            NodeKind::Content,
            1,
            Rc::downgrade(&registry),
        );
        assert!(handle.leaf().is_none());

        let leaf = Rc::new(Named("a"));
        handle.clone().mount(&leaf);
        assert_eq!(handle.leaf().map(|l| l.0), Some("a"));
        assert!(handle.is_mounted());

        handle.unmount();
        assert!(!handle.is_mounted());

        handle.mount(&leaf);
        drop(leaf);
        assert!(handle.leaf().is_none(), "handles never keep leaves alive");
    }

    #[test]
    fn handles_go_stale_with_their_registry() {
        let registry = Rc::new(Registry::<Named>::new(3));
        let handle = LeafHandle::new(Path::root(), NodeKind::Hint, 3, Rc::downgrade(&registry));
        registry.fill(vec![handle.clone()]);
        assert!(handle.is_current());
        assert_eq!(registry.handles().len(), 1);
        assert!(registry.handles()[0].same_cell(&handle));

        drop(registry);
        assert!(!handle.is_current());
        assert_eq!(handle.generation(), 3);
        assert_eq!(handle.kind(), NodeKind::Hint);
    }
}
