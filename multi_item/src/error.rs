// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building or mapping trees.

use thiserror::Error;

use crate::path::Path;
use crate::types::NodeKind;

/// The item (or tree) topology disagrees with the shape at `path`.
///
/// Returned by [`build_tree`](crate::build_tree) and
/// [`TreeMapper::map_tree`](crate::TreeMapper::map_tree) for the first offending node in pre-order.
/// Leaf payloads are never inspected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("shape mismatch at {path}: expected {expected}, found {found}")]
pub struct ShapeMismatch {
    /// Position of the offending node.
    pub path: Path,
    /// Kind the shape describes at that position.
    pub expected: NodeKind,
    /// Kind actually present.
    pub found: NodeKind,
}
