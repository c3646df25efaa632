// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node kinds and leaf-kind filters shared by shapes, items and trees.

use core::fmt;

/// The four kinds of node a [`Shape`](crate::Shape), [`Item`](crate::Item) or [`Tree`](crate::Tree) position can hold.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Renderable content leaf.
    Content,
    /// Renderable hint leaf.
    Hint,
    /// Metadata leaf; never rendered.
    Tags,
    /// Ordered sequence of sub-nodes sharing one element shape.
    Array,
}

impl NodeKind {
    /// The [`LeafKinds`] bit for this kind. Empty for [`NodeKind::Array`].
    pub const fn leaf_kinds(self) -> LeafKinds {
        match self {
            Self::Content => LeafKinds::CONTENT,
            Self::Hint => LeafKinds::HINT,
            Self::Tags => LeafKinds::TAGS,
            Self::Array => LeafKinds::empty(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Content => "content",
            Self::Hint => "hint",
            Self::Tags => "tags",
            Self::Array => "array",
        })
    }
}

bitflags::bitflags! {
    /// Leaf kinds selected by a traversal such as [`Tree::for_each_leaf`](crate::Tree::for_each_leaf).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LeafKinds: u8 {
        /// Content leaves.
        const CONTENT = 0b0000_0001;
        /// Hint leaves.
        const HINT    = 0b0000_0010;
        /// Tags leaves.
        const TAGS    = 0b0000_0100;
    }
}

impl Default for LeafKinds {
    /// Renderable leaves: content and hints.
    fn default() -> Self {
        Self::CONTENT | Self::HINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_selects_nothing() {
        assert!(NodeKind::Array.leaf_kinds().is_empty());
        assert!(LeafKinds::all().contains(NodeKind::Tags.leaf_kinds()));
        assert!(!LeafKinds::default().contains(NodeKind::Tags.leaf_kinds()));
    }
}
