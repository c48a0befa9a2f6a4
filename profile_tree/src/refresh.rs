/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The displayed tree and the rebuilds racing to replace it.
//!
//! Every rebuild is tagged with a generation from
//! [`TreeState::begin_refresh`]. Only the result of the latest issued
//! generation is applied; anything older is dropped. A failed rebuild
//! leaves the displayed tree in place.

use crate::error::TreeError;
use crate::model::TreeNode;
use crate::tree::count_nodes;
use crate::tree::extended_profiles;
use crate::tree::restore_extended;

/// Owner of the currently displayed tree.
#[derive(Debug, Default)]
pub struct TreeState {
    tree: Option<TreeNode>,
    latest_gen: u64,
    applied_gen: u64,
    settled_gen: u64,
    last_error: Option<String>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the generation for a new rebuild. Results of every earlier
    /// generation become stale.
    pub fn begin_refresh(&mut self) -> u64 {
        self.latest_gen += 1;
        self.latest_gen
    }

    /// Apply the outcome of rebuild `generation`.
    ///
    /// Returns true if the displayed tree was replaced. Stale results
    /// are dropped without touching any state. An error is recorded and
    /// the previous tree is kept. On success the new tree replaces the
    /// old one, with profiles that were expanded before staying
    /// expanded.
    pub fn apply(&mut self, generation: u64, result: Result<TreeNode, TreeError>) -> bool {
        if generation != self.latest_gen {
            tracing::debug!(
                generation,
                latest = self.latest_gen,
                "discarding stale rebuild"
            );
            return false;
        }
        self.settled_gen = generation;
        match result {
            Ok(mut tree) => {
                if let Some(previous) = &self.tree {
                    restore_extended(&mut tree, &extended_profiles(previous));
                }
                tracing::info!(
                    generation,
                    profiles = tree.children.len(),
                    nodes = count_nodes(&tree),
                    "refresh applied"
                );
                self.tree = Some(tree);
                self.applied_gen = generation;
                self.last_error = None;
                true
            }
            Err(err) => {
                tracing::warn!(generation, "refresh failed, keeping previous tree: {}", err);
                self.last_error = Some(err.to_string());
                false
            }
        }
    }

    /// The displayed tree, if any rebuild has succeeded yet.
    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Mutable access for expand/collapse.
    pub fn tree_mut(&mut self) -> Option<&mut TreeNode> {
        self.tree.as_mut()
    }

    /// The error of the latest rebuild, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Latest issued generation.
    pub fn latest_generation(&self) -> u64 {
        self.latest_gen
    }

    /// Generation of the displayed tree (0 before the first success).
    pub fn applied_generation(&self) -> u64 {
        self.applied_gen
    }

    /// Whether a rebuild has been issued but not yet applied.
    pub fn is_refreshing(&self) -> bool {
        self.latest_gen > self.settled_gen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn tree(profiles: &[&str]) -> TreeNode {
        TreeNode::root(
            profiles
                .iter()
                .map(|p| {
                    TreeNode::profile(
                        p.to_string(),
                        p.to_string(),
                        false,
                        vec![TreeNode::timewindow(
                            "timewindow1".into(),
                            "timewindow1".into(),
                            false,
                        )],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn latest_generation_is_applied() {
        let mut state = TreeState::new();
        let generation = state.begin_refresh();
        assert!(state.is_refreshing());
        assert!(state.apply(generation, Ok(tree(&["a"]))));
        assert_eq!(state.tree().unwrap().children.len(), 1);
        assert_eq!(state.applied_generation(), generation);
        assert!(!state.is_refreshing());
    }

    // A slow earlier rebuild finishing after a newer one was issued is
    // dropped, whether it lands before or after the newer result.
    #[test]
    fn stale_results_are_discarded() {
        let mut state = TreeState::new();
        let old = state.begin_refresh();
        let new = state.begin_refresh();
        assert!(!state.apply(old, Ok(tree(&["stale"]))));
        assert!(state.tree().is_none());

        assert!(state.apply(new, Ok(tree(&["fresh"]))));
        assert!(!state.apply(old, Ok(tree(&["stale"]))));
        assert_eq!(state.tree().unwrap().children[0].key, "fresh");
    }

    #[test]
    fn failure_keeps_previous_tree() {
        let mut state = TreeState::new();
        let first = state.begin_refresh();
        state.apply(first, Ok(tree(&["a", "b"])));

        let second = state.begin_refresh();
        let err = TreeError::StoreQuery(StoreError::Unavailable("down".into()));
        assert!(!state.apply(second, Err(err)));
        assert_eq!(state.tree().unwrap().children.len(), 2);
        assert_eq!(state.applied_generation(), first);
        assert!(state.last_error().unwrap().contains("down"));
        assert!(!state.is_refreshing());

        let third = state.begin_refresh();
        assert!(state.is_refreshing());
        state.apply(third, Ok(tree(&["a"])));
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn expansion_survives_refresh() {
        let mut state = TreeState::new();
        let generation = state.begin_refresh();
        state.apply(generation, Ok(tree(&["a", "b"])));
        state.tree_mut().unwrap().children[1].extended = true;

        let generation = state.begin_refresh();
        state.apply(generation, Ok(tree(&["b", "c"])));
        let root = state.tree().unwrap();
        assert!(root.child("b").unwrap().extended);
        assert!(!root.child("c").unwrap().extended);
    }
}
