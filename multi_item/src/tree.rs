// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic content/hint/tags tree, its builder, and pre-order traversal.

use alloc::vec::Vec;
use core::fmt;

use crate::error::ShapeMismatch;
use crate::item::Item;
use crate::path::Path;
use crate::shape::Shape;
use crate::types::{LeafKinds, NodeKind};

/// A tree mirroring a [`Shape`], carrying payloads instead of shape descriptors.
///
/// Trees are never mutated in place. Deriving a tree of different payloads goes
/// through [`TreeMapper`](crate::TreeMapper), which preserves structure and paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tree<C, H, T> {
    /// Content leaf.
    Content(C),
    /// Hint leaf.
    Hint(H),
    /// Tags leaf.
    Tags(T),
    /// Ordered children sharing one element shape.
    Array(Vec<Self>),
}

/// Borrowed leaf payload, as yielded by [`Tree::for_each_leaf`] and [`Tree::leaf_at`].
#[derive(Debug, PartialEq, Eq)]
pub enum LeafRef<'a, C, H, T> {
    /// Content payload.
    Content(&'a C),
    /// Hint payload.
    Hint(&'a H),
    /// Tags payload.
    Tags(&'a T),
}

impl<C, H, T> Clone for LeafRef<'_, C, H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, H, T> Copy for LeafRef<'_, C, H, T> {}

impl<C, H, T> LeafRef<'_, C, H, T> {
    /// Kind of this leaf.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Content(_) => NodeKind::Content,
            Self::Hint(_) => NodeKind::Hint,
            Self::Tags(_) => NodeKind::Tags,
        }
    }
}

/// Build a tree borrowing the payloads of `item`, validated against `shape`.
///
/// Walks both in lock-step. Content, hint and tags shapes expect an item leaf of the
/// same kind; array shapes expect a list and recurse into every element, so each array
/// has exactly the item's length. The first disagreement in pre-order is reported with
/// its path.
///
/// ```
/// use multi_item::{build_tree, Item, NodeKind, Shape, Tree};
///
/// let item: Item<&str, &str, ()> = Item::List(vec![Item::Content("2 + 2 = ?")]);
/// let tree = build_tree(&item, &Shape::array(Shape::Content)).unwrap();
/// assert_eq!(tree, Tree::Array(vec![Tree::Content(&"2 + 2 = ?")]));
///
/// let err = build_tree(&item, &Shape::Content).unwrap_err();
/// assert_eq!(err.found, NodeKind::Array);
/// ```
pub fn build_tree<'a, C, H, T>(
    item: &'a Item<C, H, T>,
    shape: &Shape,
) -> Result<Tree<&'a C, &'a H, &'a T>, ShapeMismatch> {
    let mut path = Path::root();
    build_at(item, shape, &mut path)
}

fn build_at<'a, C, H, T>(
    item: &'a Item<C, H, T>,
    shape: &Shape,
    path: &mut Path,
) -> Result<Tree<&'a C, &'a H, &'a T>, ShapeMismatch> {
    match (shape, item) {
        (Shape::Content, Item::Content(c)) => Ok(Tree::Content(c)),
        (Shape::Hint, Item::Hint(h)) => Ok(Tree::Hint(h)),
        (Shape::Tags, Item::Tags(t)) => Ok(Tree::Tags(t)),
        (Shape::Array(element), Item::List(items)) => {
            let mut children = Vec::with_capacity(items.len());
            for (i, child) in items.iter().enumerate() {
                path.push(i);
                let built = build_at(child, element, path);
                path.pop();
                children.push(built?);
            }
            Ok(Tree::Array(children))
        }
        (shape, item) => Err(ShapeMismatch {
            path: path.clone(),
            expected: shape.kind(),
            found: item.kind(),
        }),
    }
}

impl<C, H, T> Tree<C, H, T> {
    /// Kind of node at this position.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Content(_) => NodeKind::Content,
            Self::Hint(_) => NodeKind::Hint,
            Self::Tags(_) => NodeKind::Tags,
            Self::Array(_) => NodeKind::Array,
        }
    }

    /// Children of an array node, `None` for leaves.
    pub fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Array(children) => Some(children),
            _ => None,
        }
    }

    /// Leaf payload of this node, `None` for arrays.
    pub fn as_leaf(&self) -> Option<LeafRef<'_, C, H, T>> {
        match self {
            Self::Content(c) => Some(LeafRef::Content(c)),
            Self::Hint(h) => Some(LeafRef::Hint(h)),
            Self::Tags(t) => Some(LeafRef::Tags(t)),
            Self::Array(_) => None,
        }
    }

    /// Node addressed by `path`, or `None` if the path leaves the tree.
    pub fn node_at(&self, path: &Path) -> Option<&Self> {
        let mut cur = self;
        for &i in path.indices() {
            cur = cur.children()?.get(i)?;
        }
        Some(cur)
    }

    /// Leaf addressed by `path`, or `None` if absent or an array.
    pub fn leaf_at(&self, path: &Path) -> Option<LeafRef<'_, C, H, T>> {
        self.node_at(path)?.as_leaf()
    }

    /// Visit every leaf whose kind is in `kinds`, in pre-order (top to bottom, left to right).
    pub fn for_each_leaf<'s>(
        &'s self,
        kinds: LeafKinds,
        mut f: impl FnMut(&Path, LeafRef<'s, C, H, T>),
    ) {
        let mut path = Path::root();
        self.visit(kinds, &mut path, &mut f);
    }

    fn visit<'s, F>(&'s self, kinds: LeafKinds, path: &mut Path, f: &mut F)
    where
        F: FnMut(&Path, LeafRef<'s, C, H, T>),
    {
        if let Self::Array(children) = self {
            for (i, child) in children.iter().enumerate() {
                path.push(i);
                child.visit(kinds, path, f);
                path.pop();
            }
        } else if let Some(leaf) = self.as_leaf()
            && kinds.contains(leaf.kind().leaf_kinds())
        {
            f(path, leaf);
        }
    }

    /// Paths of every leaf whose kind is in `kinds`, in pre-order.
    pub fn leaf_paths(&self, kinds: LeafKinds) -> Vec<Path> {
        let mut out = Vec::new();
        self.for_each_leaf(kinds, |path, _| out.push(path.clone()));
        out
    }

    /// Number of leaves whose kind is in `kinds`.
    pub fn leaf_count(&self, kinds: LeafKinds) -> usize {
        let mut n = 0;
        self.for_each_leaf(kinds, |_, _| n += 1);
        n
    }

    /// Whether this tree's topology matches `shape` at every position.
    pub fn conforms_to(&self, shape: &Shape) -> bool {
        match (self, shape) {
            (Self::Content(_), Shape::Content)
            | (Self::Hint(_), Shape::Hint)
            | (Self::Tags(_), Shape::Tags) => true,
            (Self::Array(children), Shape::Array(element)) => {
                children.iter().all(|c| c.conforms_to(element))
            }
            _ => false,
        }
    }

    /// A view over the hint payloads of an array made only of hint leaves.
    ///
    /// Returns `None` for leaves and for arrays holding any other kind of child.
    pub fn hint_run(&self) -> Option<HintRun<'_, C, H, T>> {
        let children = self.children()?;
        children
            .iter()
            .all(|c| matches!(c, Self::Hint(_)))
            .then_some(HintRun { children })
    }
}

/// Non-owning view over a hint-only array, with a "first N" accessor.
///
/// Obtained from [`Tree::hint_run`]. The view borrows the same hint payloads as the
/// tree and adds no leaves of its own.
pub struct HintRun<'a, C, H, T> {
    children: &'a [Tree<C, H, T>],
}

impl<C, H, T> Clone for HintRun<'_, C, H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, H, T> Copy for HintRun<'_, C, H, T> {}

impl<C, H, T> fmt::Debug for HintRun<'_, C, H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HintRun")
            .field("len", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl<'a, C, H, T> HintRun<'a, C, H, T> {
    /// Number of hints.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the array holds no hints.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// All hints in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a H> + 'a {
        self.children.iter().filter_map(|c| match c {
            Tree::Hint(h) => Some(h),
            _ => None,
        })
    }

    /// The first `n` hints in order (fewer if the array is shorter).
    pub fn first(&self, n: usize) -> impl Iterator<Item = &'a H> + 'a {
        self.iter().take(n)
    }
}
