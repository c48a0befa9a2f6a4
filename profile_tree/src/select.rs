/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Selection routing from the tree to the sibling panels.
//!
//! The renderer raises one event per selection. [`SelectionRouter`]
//! decides what was selected from the node's structural kind, recovers
//! raw identifiers from the decorated labels, records them in the
//! caller-owned [`SelectionState`], and calls the matching panels:
//!
//! - profile → [`IpInfoPanel::set_ip_info`]
//! - timewindow → [`EvidencePanel::set_evidence`] then
//!   [`TimelinePanel::set_timeline`]

use crate::error::TreeError;
use crate::host::ME_MARKER;
use crate::host::OLD_ME_MARKER;
use crate::markup::strip_markup;
use crate::model::NodeKind;
use crate::model::ProfileId;
use crate::model::TimewindowId;
use crate::tree::FlatRow;

/// The IP-info panel.
pub trait IpInfoPanel {
    /// Show information about `profile`.
    fn set_ip_info(&mut self, profile: &str);
}

/// The timeline panel.
pub trait TimelinePanel {
    /// Show the timeline of `timewindow` in `profile`.
    fn set_timeline(&mut self, profile: &str, timewindow: &str);
}

/// The evidence panel.
pub trait EvidencePanel {
    /// Show the evidence collected for `timewindow` in `profile`.
    fn set_evidence(&mut self, profile: &str, timewindow: &str);
}

/// The three sibling panels a selection is routed to.
pub struct Panels<'a> {
    pub ip_info: &'a mut dyn IpInfoPanel,
    pub timeline: &'a mut dyn TimelinePanel,
    pub evidence: &'a mut dyn EvidencePanel,
}

/// The currently selected profile and timewindow.
///
/// Owned by whichever component coordinates the panels and passed to
/// [`SelectionRouter::on_select`]; nothing else writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub profile: Option<ProfileId>,
    pub timewindow: Option<TimewindowId>,
}

/// A renderer "select" event: the chosen node's kind and label, plus
/// its parent's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectEvent<'a> {
    pub kind: NodeKind,
    pub label: &'a str,
    pub parent_label: Option<&'a str>,
}

impl<'a> SelectEvent<'a> {
    pub fn new(kind: NodeKind, label: &'a str, parent_label: Option<&'a str>) -> Self {
        Self {
            kind,
            label,
            parent_label,
        }
    }

    /// The event for a row of the flattened tree.
    pub fn from_row(row: &FlatRow<'a>) -> Self {
        Self {
            kind: row.node.kind,
            label: &row.node.label,
            parent_label: row.parent.map(|p| p.label.as_str()),
        }
    }
}

/// Recover a raw profile id from a decorated profile label.
///
/// Removes highlight markup and host markers, then keeps the token
/// before the first space, which drops any appended hostname.
pub fn raw_profile_id(label: &str) -> ProfileId {
    let plain = strip_markup(label)
        .replace(OLD_ME_MARKER, "")
        .replace(ME_MARKER, "");
    plain
        .trim_start()
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Recover a raw timewindow id from a timewindow label.
pub fn raw_timewindow_id(label: &str) -> TimewindowId {
    strip_markup(label)
}

/// Routes selection events to the sibling panels.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionRouter;

impl SelectionRouter {
    /// Handle one selection.
    ///
    /// Only the matching panels are called and only `state` is
    /// written. Selecting the root does nothing. A timewindow event
    /// without a parent label is rejected with
    /// [`TreeError::OrphanTimewindow`] and leaves `state` untouched.
    pub fn on_select(
        &self,
        event: &SelectEvent<'_>,
        state: &mut SelectionState,
        panels: &mut Panels<'_>,
    ) -> Result<(), TreeError> {
        match event.kind {
            NodeKind::Root => Ok(()),
            NodeKind::Profile => {
                let profile = raw_profile_id(event.label);
                tracing::debug!(profile = %profile, "profile selected");
                panels.ip_info.set_ip_info(&profile);
                state.profile = Some(profile);
                Ok(())
            }
            NodeKind::Timewindow => {
                let timewindow = raw_timewindow_id(event.label);
                let parent = event
                    .parent_label
                    .ok_or_else(|| TreeError::OrphanTimewindow(timewindow.clone()))?;
                let profile = raw_profile_id(parent);
                tracing::debug!(profile = %profile, timewindow = %timewindow, "timewindow selected");
                panels.evidence.set_evidence(&profile, &timewindow);
                panels.timeline.set_timeline(&profile, &timewindow);
                state.profile = Some(profile);
                state.timewindow = Some(timewindow);
                Ok(())
            }
        }
    }
}
