// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out of serialized state to mounted leaves, with a single completion callback.
//!
//! ## Counting
//!
//! A batch starts with one outstanding count held by the dispatcher itself. Each
//! dispatch adds one before the leaf is called, so a leaf completing synchronously can
//! never bring the count to zero while later leaves are still waiting to be dispatched.
//! The dispatcher releases its own count after the loop. `on_done` runs when the count
//! reaches zero, exactly once.
//!
//! ## Staleness
//!
//! Every batch is tagged with the generation it was dispatched for. Completions that
//! arrive after the engine rebuilt (or was dropped) are ignored and never run `on_done`.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use multi_item::{Path, lens};
use serde_json::Value;

use crate::cell::LeafHandle;
use crate::leaf::Leaf;

pub(crate) type DoneFn = Box<dyn FnOnce()>;

struct Batch {
    generation: u64,
    live: Weak<Cell<u64>>,
    pending: Cell<usize>,
    on_done: RefCell<Option<DoneFn>>,
}

impl Batch {
    fn is_current(&self) -> bool {
        self.live
            .upgrade()
            .is_some_and(|live| live.get() == self.generation)
    }

    fn arm(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    fn release(&self) {
        let pending = self.pending.get().saturating_sub(1);
        self.pending.set(pending);
        if pending == 0 {
            let done = self.on_done.borrow_mut().take();
            if let Some(done) = done {
                done();
            }
        }
    }
}

/// Token a leaf consumes once its restoration has finished.
///
/// Dropping a completion without calling [`Completion::complete`] leaves the batch
/// waiting forever.
#[must_use = "a restoration is only finished once its completion is completed"]
pub struct Completion {
    batch: Rc<Batch>,
    path: Path,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("path", &self.path)
            .field("generation", &self.batch.generation)
            .finish_non_exhaustive()
    }
}

impl Completion {
    /// Position of the leaf being restored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the engine still holds the tree this restoration was dispatched to.
    pub fn is_current(&self) -> bool {
        self.batch.is_current()
    }

    /// Report this leaf's restoration as finished.
    pub fn complete(self) {
        if !self.batch.is_current() {
            tracing::trace!(
                path = %self.path,
                generation = self.batch.generation,
                "ignoring stale restore completion"
            );
            return;
        }
        self.batch.release();
    }
}

/// Dispatch `state` to every mounted leaf in `handles` whose path resolves in it.
///
/// Returns how many leaves were handed state.
pub(crate) fn dispatch<L: Leaf + ?Sized>(
    handles: &[LeafHandle<L>],
    state: &Value,
    generation: u64,
    live: &Rc<Cell<u64>>,
    on_done: DoneFn,
) -> usize {
    let batch = Rc::new(Batch {
        generation,
        live: Rc::downgrade(live),
        pending: Cell::new(0),
        on_done: RefCell::new(Some(on_done)),
    });
    // Held by the dispatcher until every leaf has been called.
    batch.arm();
    let mut dispatched = 0;
    for handle in handles {
        let Some(leaf) = handle.leaf() else {
            continue;
        };
        let Some(value) = lens::get(state, handle.path()) else {
            continue;
        };
        batch.arm();
        dispatched += 1;
        leaf.restore_serialized_state(
            value.clone(),
            Completion {
                batch: Rc::clone(&batch),
                path: handle.path().clone(),
            },
        );
    }
    tracing::debug!(
        generation,
        dispatched,
        leaves = handles.len(),
        "dispatched state restoration"
    );
    batch.release();
    dispatched
}
