// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional addressing shared by tree traversal, the [`lens`](crate::lens) and state routing.

use alloc::vec::Vec;
use core::fmt;

/// One step of a [`Path`], as yielded by [`Path::steps`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Step {
    /// Descend into the array child at this index.
    Index(usize),
    /// The addressed node is the one reached by the preceding steps.
    Leaf,
}

/// Position of a node inside a [`Tree`](crate::Tree), as a sequence of array indices from the root.
///
/// The root path is empty. Paths are produced by [`TreeMapper`](crate::TreeMapper) and
/// [`Tree::for_each_leaf`](crate::Tree::for_each_leaf) in pre-order, and the same value
/// addresses the matching position of a serialized state blob via [`lens::get`](crate::lens::get).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

impl Path {
    /// The path of the root node.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of array descents.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Array indices from the root.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// A new path that descends one level further, into child `index`.
    pub fn child(&self, index: usize) -> Self {
        let mut out = self.clone();
        out.push(index);
        out
    }

    /// The path of the enclosing array, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Steps from the root: one [`Step::Index`] per descent, terminated by [`Step::Leaf`].
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.0
            .iter()
            .copied()
            .map(Step::Index)
            .chain(core::iter::once(Step::Leaf))
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for i in &self.0 {
            write!(f, "/{i}")?;
        }
        Ok(())
    }
}
