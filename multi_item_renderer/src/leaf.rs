// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability contract every mounted leaf fulfills.

use alloc::vec::Vec;

use serde_json::Value;

use crate::restore::Completion;
use crate::score::Score;

/// A mounted leaf instance, as seen by the composition engine.
///
/// Leaves are external: the engine never constructs them. A leaf registers itself
/// with [`LeafHandle::mount`](crate::LeafHandle::mount) once instantiated, after which
/// the engine reaches it through these methods only. Leaves live behind `Rc` and take
/// `&self`, so any mutable state is their own interior state.
pub trait Leaf {
    /// What discovery yields, e.g. an input field another leaf can reference.
    type Widget;
    /// The leaf's current user input.
    type Guess;
    /// Discovery query.
    type Criterion: ?Sized;

    /// Widgets of this leaf matching `criterion`.
    fn find_internal_widgets(&self, criterion: &Self::Criterion) -> Vec<Self::Widget>;

    /// This leaf's score for its current input.
    fn score(&self) -> Score;

    /// This leaf's current user input.
    fn user_input(&self) -> Self::Guess;

    /// Current input and its score, read together.
    fn guess_and_score(&self) -> (Self::Guess, Score) {
        (self.user_input(), self.score())
    }

    /// Snapshot of the leaf's persistent state.
    fn serialized_state(&self) -> Value;

    /// Restore state previously produced by [`Leaf::serialized_state`].
    ///
    /// `done` must be completed exactly once, either before returning or later.
    fn restore_serialized_state(&self, state: Value, done: Completion);
}
