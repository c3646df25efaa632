// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path-addressed access into plain nested state blobs.
//!
//! Serialized state is a [`serde_json::Value`] mirroring the tree: arrays for array
//! nodes, arbitrary values at leaves. Blobs may be partial or stale relative to the
//! current shape, so reads never fail; missing structure is reported as absent.

use alloc::vec::Vec;

use serde_json::Value;

use crate::path::{Path, Step};
use crate::tree::Tree;

/// Value stored at `path`, or `None` if any step is missing.
///
/// A non-array intermediate, an out-of-range index and a JSON `null` at the
/// addressed position all read as absent.
///
/// ```
/// use multi_item::{lens, Path};
/// use serde_json::json;
///
/// let state = json!([[{"value": 3}], null]);
/// assert_eq!(lens::get(&state, &Path::from(vec![0, 0])), Some(&json!({"value": 3})));
/// assert_eq!(lens::get(&state, &Path::from(vec![1])), None);
/// assert_eq!(lens::get(&state, &Path::from(vec![1, 4])), None);
/// ```
pub fn get<'v>(state: &'v Value, path: &Path) -> Option<&'v Value> {
    let mut cur = state;
    for step in path.steps() {
        match step {
            Step::Index(i) => cur = cur.as_array()?.get(i)?,
            Step::Leaf => break,
        }
    }
    (!cur.is_null()).then_some(cur)
}

/// Store `value` at `path`, creating intermediate arrays as needed.
///
/// Short arrays are padded with `null`; non-array intermediates are replaced. Padding
/// allocates up to each index, so paths should come from a built tree.
///
/// Returns `false`, leaving `state` untouched, if an index cannot be padded to.
pub fn set(state: &mut Value, path: &Path, value: Value) -> bool {
    if path.indices().iter().any(|i| i.checked_add(1).is_none()) {
        return false;
    }
    let mut cur = state;
    for &i in path.indices() {
        if !cur.is_array() {
            *cur = Value::Array(Vec::new());
        }
        let Value::Array(items) = cur else {
            return false;
        };
        if items.len() <= i {
            items.resize(i + 1, Value::Null);
        }
        cur = &mut items[i];
    }
    *cur = value;
    true
}

/// Collapse a tree of values into the nested blob addressed by [`get`].
pub fn from_tree(tree: Tree<Value, Value, Value>) -> Value {
    match tree {
        Tree::Content(v) | Tree::Hint(v) | Tree::Tags(v) => v,
        Tree::Array(children) => Value::Array(children.into_iter().map(from_tree).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use serde_json::json;

    #[test]
    fn get_tolerates_missing_structure() {
        let state = json!([1, {"not": "an array"}]);
        assert_eq!(get(&state, &Path::root()), Some(&state));
        assert_eq!(get(&state, &Path::from(vec![0])), Some(&json!(1)));
        assert_eq!(get(&state, &Path::from(vec![1, 0])), None);
        assert_eq!(get(&state, &Path::from(vec![5])), None);
        assert_eq!(get(&Value::Null, &Path::from(vec![0, 0])), None);
    }

    #[test]
    fn set_pads_and_replaces() {
        let mut state = json!("scalar");
        assert!(set(&mut state, &Path::from(vec![2, 1]), json!("x")));
        assert_eq!(state, json!([null, null, [null, "x"]]));
        set(&mut state, &Path::from(vec![0]), json!(7));
        assert_eq!(get(&state, &Path::from(vec![0])), Some(&json!(7)));
        assert_eq!(get(&state, &Path::from(vec![2, 1])), Some(&json!("x")));

        set(&mut state, &Path::root(), json!({"replaced": true}));
        assert_eq!(state, json!({"replaced": true}));
    }

    #[test]
    fn set_rejects_unpaddable_index() {
        let mut state = json!([1]);
        assert!(!set(&mut state, &Path::from(vec![0, usize::MAX]), json!("x")));
        assert_eq!(state, json!([1]));
    }

    #[test]
    fn from_tree_mirrors_arrays() {
        let tree = Tree::Array(vec![
            Tree::Content(json!({"answer": 4})),
            Tree::Array(vec![Tree::Hint(json!(null)), Tree::Tags(Value::Null)]),
        ]);
        let state = from_tree(tree);
        assert_eq!(state, json!([{"answer": 4}, [null, null]]));
        assert_eq!(
            get(&state, &Path::from(vec![0])),
            Some(&json!({"answer": 4}))
        );
        assert_eq!(get(&state, &Path::from(vec![1, 0])), None);
    }
}
