/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Tree assembly and cross-panel selection routing for the profile
//! dashboard.
//!
//! The dashboard shows monitored network entities ("profiles") and
//! their observation windows ("timewindows") as a two-level tree. The
//! data lives in a key-value store populated by an external analysis
//! pipeline; this crate turns the store's flat per-profile records
//! into a display tree and turns a selection in that tree into calls
//! on the IP-info, timeline and evidence panels.
//!
//! Data flow:
//!
//! ```text
//! store ──► BlockedIndex + HostRoster
//!   │
//!   └──► per-profile fan-out (bounded) ──► order_timewindows
//!                                      ──► annotate
//!                                      ──► TreeNode (Profile)
//!        join ──► TreeNode (Root) ──► TreeState::apply ──► renderer
//!
//! renderer "select" ──► SelectionRouter ──► SelectionState
//!                                       ──► IpInfoPanel | TimelinePanel + EvidencePanel
//! ```
//!
//! Invariants maintained throughout the crate:
//! - **Two levels only**: Root → Profile → Timewindow. The node kind
//!   is a structural tag fixed at construction; selection routing
//!   never inspects label text to decide what was selected.
//! - **Stable keys**: every node carries its raw identifier in `key`;
//!   the decorated `label` is derived and may change between refreshes.
//! - **Ascending timewindows**: a profile's children are ordered by the
//!   first integer embedded in their identifier.
//! - **Full rebuilds**: each [`TreeAssembler::build_tree`] call starts
//!   from scratch; the blocked index is rebuilt, never patched.
//! - **Per-profile degradation**: a failing profile sub-pipeline
//!   yields a raw, childless, degraded node; only failures of the
//!   global batch (profiles, blocked records, host roster) fail the
//!   whole build.
//! - **Stale results lose**: [`TreeState`] drops rebuild results whose
//!   generation is older than the latest issued one.

pub mod assemble;
pub mod blocked;
pub mod config;
pub mod error;
pub mod host;
pub mod markup;
pub mod model;
pub mod order;
pub mod refresh;
pub mod select;
pub mod store;
pub mod tree;

pub use assemble::TreeAssembler;
pub use blocked::BlockedIndex;
pub use config::AssemblerConfig;
pub use error::TreeError;
pub use host::HostRoster;
pub use model::NodeKind;
pub use model::ProfileId;
pub use model::TimewindowId;
pub use model::TreeNode;
pub use refresh::TreeState;
pub use select::EvidencePanel;
pub use select::IpInfoPanel;
pub use select::Panels;
pub use select::SelectEvent;
pub use select::SelectionRouter;
pub use select::SelectionState;
pub use select::TimelinePanel;
pub use store::MemoryStore;
pub use store::ProfileStore;
pub use store::StoreError;
