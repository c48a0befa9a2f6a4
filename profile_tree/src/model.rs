/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Opaque profile key, usually an IP address.
pub type ProfileId = String;

/// Timewindow key with an embedded ordinal, e.g. `"timewindow3"`.
pub type TimewindowId = String;

/// Key and label of the synthetic root node.
pub const ROOT_KEY: &str = "root";

/// Structural kind of a tree node, fixed when the node is built.
///
/// Selection routing dispatches on this tag; it never sniffs the
/// label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic root; its children are the profiles.
    Root,
    /// A monitored profile.
    Profile,
    /// One observation window of a profile (always a leaf).
    Timewindow,
}

impl NodeKind {
    /// Short human-readable name for display.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Profile => "profile",
            NodeKind::Timewindow => "timewindow",
        }
    }
}

/// A display-ready node of the profile tree.
///
/// Children form an ordered mapping from raw key to node: iteration
/// order is display order, and [`TreeNode::child`] looks a child up by
/// its raw key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Raw identifier (profile id, timewindow id, or [`ROOT_KEY`]).
    pub key: String,
    /// Decorated display text; may carry highlight markup.
    pub label: String,
    /// Structural kind.
    pub kind: NodeKind,
    /// Whether the node is expanded in the UI. Built closed, the root
    /// included; the root's children are always shown regardless.
    pub extended: bool,
    /// Whether the node is highlighted as blocked.
    pub blocked: bool,
    /// Set on profile nodes whose sub-pipeline failed; such nodes carry
    /// their raw label and no children.
    pub degraded: bool,
    /// Direct children in display order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// The synthetic root over the given profile nodes.
    pub fn root(children: Vec<TreeNode>) -> Self {
        Self {
            key: ROOT_KEY.to_string(),
            label: ROOT_KEY.to_string(),
            kind: NodeKind::Root,
            extended: false,
            blocked: false,
            degraded: false,
            children,
        }
    }

    /// A profile node with a decorated label and ordered timewindow
    /// children.
    pub fn profile(
        key: ProfileId,
        label: String,
        blocked: bool,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            key,
            label,
            kind: NodeKind::Profile,
            extended: false,
            blocked,
            degraded: false,
            children,
        }
    }

    /// Fallback profile node used when the profile's sub-pipeline
    /// failed: raw label, not blocked, no children.
    pub fn degraded_profile(key: ProfileId) -> Self {
        Self {
            label: key.clone(),
            key,
            kind: NodeKind::Profile,
            extended: false,
            blocked: false,
            degraded: true,
            children: Vec::new(),
        }
    }

    /// A timewindow leaf.
    pub fn timewindow(key: TimewindowId, label: String, blocked: bool) -> Self {
        Self {
            key,
            label,
            kind: NodeKind::Timewindow,
            extended: false,
            blocked,
            degraded: false,
            children: Vec::new(),
        }
    }

    /// Look up a direct child by raw key.
    pub fn child(&self, key: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.key == key)
    }

    /// Mutable variant of [`TreeNode::child`].
    pub fn child_mut(&mut self, key: &str) -> Option<&mut TreeNode> {
        self.children.iter_mut().find(|c| c.key == key)
    }

    /// Whether the node has any children to fold/unfold.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
