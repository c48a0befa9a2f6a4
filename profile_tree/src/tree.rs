/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Structural traversals over [`TreeNode`].
//!
//! All walks go through the fold helpers below rather than bespoke
//! recursion.

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::model::NodeKind;
use crate::model::TreeNode;

/// A single row in the flattened view of the tree.
#[derive(Debug, Clone)]
pub struct FlatRow<'a> {
    /// The node backing this row.
    pub node: &'a TreeNode,
    /// The row's parent, `None` for top-level profiles.
    pub parent: Option<&'a TreeNode>,
    /// Indentation level; profiles are at depth 0.
    pub depth: usize,
}

/// Generic tree fold.
///
/// Applies `f` to each node after its children, passing the children's
/// results.
pub fn fold_tree<'a, B, F>(node: &'a TreeNode, f: &F) -> B
where
    F: Fn(&'a TreeNode, Vec<B>) -> B,
{
    let child_results: Vec<B> = node
        .children
        .iter()
        .map(|child| fold_tree(child, f))
        .collect();
    f(node, child_results)
}

/// Mutable pre-order walk with early exit via `ControlFlow`.
pub fn fold_tree_mut<B, F>(node: &mut TreeNode, f: &mut F) -> ControlFlow<B>
where
    F: for<'a> FnMut(&'a mut TreeNode) -> ControlFlow<B>,
{
    f(node)?;
    for child in &mut node.children {
        fold_tree_mut(child, f)?;
    }
    ControlFlow::Continue(())
}

/// Flatten the tree into the rows a renderer shows.
///
/// The root is synthetic and never rendered; its children appear at
/// depth 0 whatever its own `extended` flag says. Below the root a
/// node's children are included only when it is `extended`.
pub fn flatten_tree(root: &TreeNode) -> Vec<FlatRow<'_>> {
    let mut rows = Vec::new();
    for child in &root.children {
        flatten_visible(child, None, 0, &mut rows);
    }
    rows
}

fn flatten_visible<'a>(
    node: &'a TreeNode,
    parent: Option<&'a TreeNode>,
    depth: usize,
    out: &mut Vec<FlatRow<'a>>,
) {
    out.push(FlatRow {
        node,
        parent,
        depth,
    });
    if node.extended {
        for child in &node.children {
            flatten_visible(child, Some(node), depth + 1, out);
        }
    }
}

/// Find the first node of `kind` with the given key (mutable).
///
/// Keys are unique per kind among siblings, and profiles are unique
/// under the root, so the first match is the only match for profiles.
pub fn find_by_key_mut<'a>(
    node: &'a mut TreeNode,
    kind: NodeKind,
    key: &str,
) -> Option<&'a mut TreeNode> {
    if node.kind == kind && node.key == key {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_by_key_mut(child, kind, key))
}

/// Collapse every node.
pub fn collapse_all(root: &mut TreeNode) {
    let _ = fold_tree_mut(root, &mut |n| {
        n.extended = false;
        ControlFlow::<()>::Continue(())
    });
}

/// Keys of all profiles currently expanded.
pub fn extended_profiles(root: &TreeNode) -> HashSet<String> {
    root.children
        .iter()
        .filter(|p| p.extended)
        .map(|p| p.key.clone())
        .collect()
}

/// Re-open the profiles named in `keys`, leaving the rest as built.
pub fn restore_extended(root: &mut TreeNode, keys: &HashSet<String>) {
    for profile in &mut root.children {
        if keys.contains(&profile.key) {
            profile.extended = true;
        }
    }
}

/// Raw structure of the tree: each profile key with its ordered
/// timewindow keys, sorted by profile key.
///
/// Decorations, highlight state and expansion are ignored, so two
/// rebuilds over the same store state compare equal.
pub fn raw_shape(root: &TreeNode) -> Vec<(String, Vec<String>)> {
    let mut shape: Vec<(String, Vec<String>)> = root
        .children
        .iter()
        .map(|p| (p.key.clone(), p.children.iter().map(|t| t.key.clone()).collect()))
        .collect();
    shape.sort();
    shape
}

/// Total number of nodes, root included.
pub fn count_nodes(root: &TreeNode) -> usize {
    fold_tree(root, &|_, child_counts: Vec<usize>| {
        1 + child_counts.into_iter().sum::<usize>()
    })
}
