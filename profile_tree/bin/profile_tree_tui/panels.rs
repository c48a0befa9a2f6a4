/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Terminal stand-ins for the sibling panels.
//!
//! Each view records what it was last asked to show. Rendering looks
//! the target up in the current tree, so a refresh updates the panes
//! without another selection.

use profile_tree::EvidencePanel;
use profile_tree::IpInfoPanel;
use profile_tree::Panels;
use profile_tree::TimelinePanel;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct IpInfoView {
    pub(crate) profile: Option<String>,
}

impl IpInfoPanel for IpInfoView {
    fn set_ip_info(&mut self, profile: &str) {
        self.profile = Some(profile.to_string());
    }
}

/// A `(profile, timewindow)` pair shown by the timeline and evidence
/// panes.
pub(crate) type Target = (String, String);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TimelineView {
    pub(crate) target: Option<Target>,
}

impl TimelinePanel for TimelineView {
    fn set_timeline(&mut self, profile: &str, timewindow: &str) {
        self.target = Some((profile.to_string(), timewindow.to_string()));
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct EvidenceView {
    pub(crate) target: Option<Target>,
}

impl EvidencePanel for EvidenceView {
    fn set_evidence(&mut self, profile: &str, timewindow: &str) {
        self.target = Some((profile.to_string(), timewindow.to_string()));
    }
}

/// The three right-hand panes.
#[derive(Debug, Default)]
pub(crate) struct PanelViews {
    pub(crate) ip_info: IpInfoView,
    pub(crate) timeline: TimelineView,
    pub(crate) evidence: EvidenceView,
}

impl PanelViews {
    /// Borrow the views as the router's panel set.
    pub(crate) fn as_panels(&mut self) -> Panels<'_> {
        Panels {
            ip_info: &mut self.ip_info,
            timeline: &mut self.timeline,
            evidence: &mut self.evidence,
        }
    }
}
