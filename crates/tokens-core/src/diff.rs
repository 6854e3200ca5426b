//! Change summaries between two token trees

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::{Leaf, TokenNode};
use crate::path::flatten;

/// Dotted token paths that were added, modified or removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

/// Compare the leaves of two trees.
///
/// `added` and `modified` follow the traversal order of `new`, `removed`
/// follows the traversal order of `old`. A leaf is modified when its value,
/// type or comment differ.
pub fn diff(old: &TokenNode, new: &TokenNode) -> ChangeSet {
    let old_leaves = leaf_map(old);
    let new_leaves = leaf_map(new);
    let mut changes = ChangeSet::default();

    for (path, new_leaf) in &new_leaves {
        match old_leaves.get(path) {
            None => changes.added.push(path.clone()),
            Some(old_leaf) if old_leaf != new_leaf => changes.modified.push(path.clone()),
            Some(_) => {}
        }
    }
    changes.removed = old_leaves
        .keys()
        .filter(|path| !new_leaves.contains_key(*path))
        .cloned()
        .collect();

    changes
}

fn leaf_map(tree: &TokenNode) -> IndexMap<String, Leaf> {
    flatten(tree)
        .into_iter()
        .map(|token| {
            let path = token.dot_path();
            (path, token.into_leaf().1)
        })
        .collect()
}
