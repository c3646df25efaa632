// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configurable, structure-preserving tree transformer.
//!
//! ## Overview
//!
//! A [`TreeMapper`] holds one transform per leaf kind plus an optional array hook, and
//! turns a `Tree<C, H, T>` into a `Tree<C2, H2, T2>` by walking the tree and its
//! [`Shape`] in lock-step.
//!
//! ## Ordering
//!
//! Traversal is a fixed pre-order: top to bottom, left to right. Every transform runs
//! synchronously, exactly once per matching node, and receives the node's [`Path`].
//! The array hook runs after all children of its array have been mapped, so nested
//! arrays are post-processed before their parents.
//!
//! ## Example
//!
//! ```
//! use multi_item::{Path, Shape, Tree, TreeMapper};
//!
//! let tree: Tree<u32, &str, ()> = Tree::Array(vec![Tree::Content(2), Tree::Content(5)]);
//! let shape = Shape::array(Shape::Content);
//!
//! let doubled = TreeMapper::identity()
//!     .content(|n: &u32, _: &Path| n * 2)
//!     .map_tree(&tree, &shape)
//!     .unwrap();
//! assert_eq!(doubled, Tree::Array(vec![Tree::Content(4), Tree::Content(10)]));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::error::ShapeMismatch;
use crate::path::Path;
use crate::shape::Shape;
use crate::tree::Tree;

type LeafFn<'a, In, Out> = Box<dyn FnMut(&'a In, &Path) -> Out + 'a>;

type ArrayFn<'a, C, H, T, C2, H2, T2> = Box<
    dyn FnMut(Vec<Tree<C2, H2, T2>>, &'a [Tree<C, H, T>], &Shape, &Path) -> Vec<Tree<C2, H2, T2>>
        + 'a,
>;

/// Builder and executor for lock-step tree transforms.
///
/// ## Usage
///
/// - Start from [`TreeMapper::new`] with all three leaf transforms, or from
///   [`TreeMapper::identity`] which clones every payload.
/// - Replace individual leaf transforms with [`TreeMapper::content`],
///   [`TreeMapper::hint`] and [`TreeMapper::tags`].
/// - Optionally install an array hook with [`TreeMapper::array`]. This fixes the output
///   types and yields a [`HookedTreeMapper`], which has no leaf setters.
/// - Call `map_tree` with the tree and the shape it was built from.
///
/// The lifetime `'a` bounds both the borrowed input tree and anything the transforms
/// capture, which lets transforms return borrows of the input payloads.
pub struct TreeMapper<'a, C, H, T, C2 = C, H2 = H, T2 = T> {
    content: LeafFn<'a, C, C2>,
    hint: LeafFn<'a, H, H2>,
    tags: LeafFn<'a, T, T2>,
}

impl<C, H, T, C2, H2, T2> fmt::Debug for TreeMapper<'_, C, H, T, C2, H2, T2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeMapper").finish_non_exhaustive()
    }
}

/// A [`TreeMapper`] with an array hook installed.
///
/// Leaf transforms can no longer be replaced, since that would change the types the
/// hook works on:
///
/// ```compile_fail
/// use multi_item::{Path, TreeMapper};
///
/// let _ = TreeMapper::<u32, (), ()>::identity()
///     .array(|children, _, _, _| children)
///     .content(|n: &u32, _: &Path| n + 1);
/// ```
pub struct HookedTreeMapper<'a, C, H, T, C2 = C, H2 = H, T2 = T> {
    leaves: TreeMapper<'a, C, H, T, C2, H2, T2>,
    array: Option<ArrayFn<'a, C, H, T, C2, H2, T2>>,
}

impl<C, H, T, C2, H2, T2> fmt::Debug for HookedTreeMapper<'_, C, H, T, C2, H2, T2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookedTreeMapper")
            .field("leaves", &self.leaves)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Clone + 'a, H: Clone + 'a, T: Clone + 'a> TreeMapper<'a, C, H, T> {
    /// A mapper that clones every payload unchanged.
    pub fn identity() -> Self {
        Self {
            content: Box::new(|c: &'a C, _: &Path| c.clone()),
            hint: Box::new(|h: &'a H, _: &Path| h.clone()),
            tags: Box::new(|t: &'a T, _: &Path| t.clone()),
        }
    }
}

impl<'a, C: 'a, H: 'a, T: 'a, C2, H2, T2> TreeMapper<'a, C, H, T, C2, H2, T2> {
    /// A mapper with the given content, hint and tags transforms and no array hook.
    pub fn new(
        content: impl FnMut(&'a C, &Path) -> C2 + 'a,
        hint: impl FnMut(&'a H, &Path) -> H2 + 'a,
        tags: impl FnMut(&'a T, &Path) -> T2 + 'a,
    ) -> Self {
        Self {
            content: Box::new(content),
            hint: Box::new(hint),
            tags: Box::new(tags),
        }
    }

    /// Replace the content transform.
    pub fn content<C3>(
        self,
        f: impl FnMut(&'a C, &Path) -> C3 + 'a,
    ) -> TreeMapper<'a, C, H, T, C3, H2, T2> {
        TreeMapper {
            content: Box::new(f),
            hint: self.hint,
            tags: self.tags,
        }
    }

    /// Replace the hint transform.
    pub fn hint<H3>(
        self,
        f: impl FnMut(&'a H, &Path) -> H3 + 'a,
    ) -> TreeMapper<'a, C, H, T, C2, H3, T2> {
        TreeMapper {
            content: self.content,
            hint: Box::new(f),
            tags: self.tags,
        }
    }

    /// Replace the tags transform.
    pub fn tags<T3>(
        self,
        f: impl FnMut(&'a T, &Path) -> T3 + 'a,
    ) -> TreeMapper<'a, C, H, T, C2, H2, T3> {
        TreeMapper {
            content: self.content,
            hint: self.hint,
            tags: Box::new(f),
        }
    }

    /// Install a hook that post-processes each array's mapped children.
    ///
    /// The hook receives the mapped children, the original children, the array's
    /// element shape and the array's path, and returns the children to keep.
    pub fn array(
        self,
        f: impl FnMut(Vec<Tree<C2, H2, T2>>, &'a [Tree<C, H, T>], &Shape, &Path) -> Vec<Tree<C2, H2, T2>>
        + 'a,
    ) -> HookedTreeMapper<'a, C, H, T, C2, H2, T2> {
        HookedTreeMapper {
            leaves: self,
            array: Some(Box::new(f)),
        }
    }

    /// Map `tree`, which must conform to `shape`.
    ///
    /// Fails with [`ShapeMismatch`] at the first position where tree and shape disagree.
    pub fn map_tree(
        &mut self,
        tree: &'a Tree<C, H, T>,
        shape: &Shape,
    ) -> Result<Tree<C2, H2, T2>, ShapeMismatch> {
        let mut path = Path::root();
        self.map_at(tree, shape, &mut path, &mut None)
    }

    fn map_at(
        &mut self,
        tree: &'a Tree<C, H, T>,
        shape: &Shape,
        path: &mut Path,
        hook: &mut Option<ArrayFn<'a, C, H, T, C2, H2, T2>>,
    ) -> Result<Tree<C2, H2, T2>, ShapeMismatch> {
        match (tree, shape) {
            (Tree::Content(c), Shape::Content) => Ok(Tree::Content((self.content)(c, &*path))),
            (Tree::Hint(h), Shape::Hint) => Ok(Tree::Hint((self.hint)(h, &*path))),
            (Tree::Tags(t), Shape::Tags) => Ok(Tree::Tags((self.tags)(t, &*path))),
            (Tree::Array(children), Shape::Array(element)) => {
                let element: &Shape = element;
                let mut mapped = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    path.push(i);
                    let out = self.map_at(child, element, path, hook);
                    path.pop();
                    mapped.push(out?);
                }
                if let Some(array) = hook.as_mut() {
                    mapped = array(mapped, children.as_slice(), element, &*path);
                }
                Ok(Tree::Array(mapped))
            }
            (tree, shape) => Err(ShapeMismatch {
                path: path.clone(),
                expected: shape.kind(),
                found: tree.kind(),
            }),
        }
    }
}

impl<'a, C: 'a, H: 'a, T: 'a, C2, H2, T2> HookedTreeMapper<'a, C, H, T, C2, H2, T2> {
    /// Map `tree`, which must conform to `shape`, running the array hook on every array.
    ///
    /// Fails with [`ShapeMismatch`] at the first position where tree and shape disagree.
    pub fn map_tree(
        &mut self,
        tree: &'a Tree<C, H, T>,
        shape: &Shape,
    ) -> Result<Tree<C2, H2, T2>, ShapeMismatch> {
        let mut path = Path::root();
        self.leaves.map_at(tree, shape, &mut path, &mut self.array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::tree::build_tree;
    use crate::types::{LeafKinds, NodeKind};
    use alloc::string::{String, ToString};
    use alloc::vec;

    fn sample() -> (Item<u32, &'static str, char>, Shape) {
        let item = Item::List(vec![
            Item::List(vec![Item::Content(1), Item::Content(2)]),
            Item::List(vec![Item::Content(3)]),
            Item::List(vec![]),
        ]);
        (item, Shape::array(Shape::array(Shape::Content)))
    }

    #[test]
    fn identity_preserves_topology() {
        let (item, shape) = sample();
        let data = build_tree(&item, &shape).unwrap();
        let mapped = TreeMapper::identity().map_tree(&data, &shape).unwrap();
        assert!(mapped.conforms_to(&shape));
        assert_eq!(mapped, data);
    }

    #[test]
    fn leaf_transforms_receive_preorder_paths() {
        let (item, shape) = sample();
        let data = build_tree(&item, &shape).unwrap();
        let mut visited = Vec::new();
        let labels = TreeMapper::identity()
            .content(|n: &&u32, path: &Path| {
                visited.push(path.clone());
                alloc::format!("{n}@{path}")
            })
            .map_tree(&data, &shape)
            .unwrap();
        assert_eq!(
            visited,
            vec![
                Path::from(vec![0, 0]),
                Path::from(vec![0, 1]),
                Path::from(vec![1, 0])
            ]
        );
        assert_eq!(
            labels.leaf_at(&Path::from(vec![0, 1])),
            Some(crate::tree::LeafRef::Content(&String::from("2@/0/1")))
        );
    }

    #[test]
    fn array_hook_sees_mapped_and_original_children() {
        let tree: Tree<u32, char, ()> = Tree::Array(vec![
            Tree::Array(vec![Tree::Hint('a'), Tree::Hint('b')]),
            Tree::Array(vec![Tree::Hint('c')]),
        ]);
        let shape = Shape::array(Shape::array(Shape::Hint));
        let mut calls = Vec::new();
        let mapped = TreeMapper::identity()
            .hint(|h: &char, _: &Path| h.to_ascii_uppercase())
            .array(|mut children, original, element, path| {
                calls.push((path.clone(), element.kind(), original.len()));
                // Keep only the first element of every inner array.
                if *element == Shape::Hint {
                    children.truncate(1);
                }
                children
            })
            .map_tree(&tree, &shape)
            .unwrap();
        assert_eq!(
            calls,
            vec![
                (Path::from(vec![0]), NodeKind::Hint, 2),
                (Path::from(vec![1]), NodeKind::Hint, 1),
                (Path::root(), NodeKind::Array, 2),
            ]
        );
        assert_eq!(
            mapped,
            Tree::Array(vec![
                Tree::Array(vec![Tree::Hint('A')]),
                Tree::Array(vec![Tree::Hint('C')]),
            ])
        );
    }

    #[test]
    fn hook_runs_with_every_replaced_transform() {
        let tree: Tree<u32, char, ()> =
            Tree::Array(vec![Tree::Content(3), Tree::Content(4)]);
        let shape = Shape::array(Shape::Content);
        let mut arrays = 0;
        let mut mapper = TreeMapper::identity()
            .content(|n: &u32, _: &Path| n * 10)
            .hint(|h: &char, _: &Path| h.to_string())
            .array(|mut children, _, _, _| {
                arrays += 1;
                children.reverse();
                children
            });
        let mapped = mapper.map_tree(&tree, &shape).unwrap();
        assert_eq!(
            mapped,
            Tree::Array(vec![Tree::Content(40), Tree::Content(30)])
        );
        drop(mapper);
        assert_eq!(arrays, 1);
    }

    #[test]
    fn new_maps_every_kind() {
        let tree: Tree<u32, char, &str> =
            Tree::Array(vec![Tree::Content(7), Tree::Hint('h'), Tree::Tags("x")]);
        let tags: Tree<u32, char, &str> = Tree::Tags("four");
        // Mixed arrays only arise from hand-built trees; the shape decides each kind.
        let shape = Shape::array(Shape::Content);
        let mut mapper = TreeMapper::new(
            |c: &u32, _: &Path| c.to_string(),
            |h: &char, _: &Path| h.to_string(),
            |t: &&str, _: &Path| t.len(),
        );
        let err = mapper.map_tree(&tree, &shape).unwrap_err();
        assert_eq!(err.path, Path::from(vec![1]));
        assert_eq!(err.expected, NodeKind::Content);
        assert_eq!(err.found, NodeKind::Hint);

        let mapped = mapper.map_tree(&tags, &Shape::Tags).unwrap();
        assert_eq!(mapped, Tree::Tags(4));
        assert_eq!(mapped.leaf_count(LeafKinds::TAGS), 1);
    }
}
