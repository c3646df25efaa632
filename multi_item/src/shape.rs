// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative topology descriptors.

use alloc::boxed::Box;

use crate::path::Path;
use crate::types::NodeKind;

/// Describes the structure of an [`Item`](crate::Item) and of every tree derived from it.
///
/// A shape carries no data. Every position is either a leaf kind or an array whose
/// elements all share one sub-shape.
///
/// ```
/// use multi_item::{NodeKind, Path, Shape};
///
/// // A question as a list of pages, each a list of content blocks.
/// let shape = Shape::array(Shape::array(Shape::Content));
/// assert_eq!(shape.kind(), NodeKind::Array);
/// assert_eq!(shape.at(&Path::from(vec![0, 3])), Some(&Shape::Content));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A content leaf.
    Content,
    /// A hint leaf.
    Hint,
    /// A tags (metadata) leaf.
    Tags,
    /// An array of nodes described by the element shape.
    Array(Box<Shape>),
}

impl Shape {
    /// An array whose elements are described by `element`.
    pub fn array(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Kind of node at this position.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Content => NodeKind::Content,
            Self::Hint => NodeKind::Hint,
            Self::Tags => NodeKind::Tags,
            Self::Array(_) => NodeKind::Array,
        }
    }

    /// Element shape for arrays, `None` for leaves.
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this position is a leaf.
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::Array(_))
    }

    /// Shape addressed by `path`.
    ///
    /// Shapes do not know array lengths, so any index descends into the element
    /// shape. Returns `None` if the path descends through a leaf.
    pub fn at(&self, path: &Path) -> Option<&Self> {
        let mut cur = self;
        for _ in path.indices() {
            cur = cur.element()?;
        }
        Some(cur)
    }
}
