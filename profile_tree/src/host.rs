/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Host identity labeling.

/// Marker appended to the profile of the current host.
pub const ME_MARKER: &str = " (me)";
/// Marker appended to profiles of earlier identities of this host.
pub const OLD_ME_MARKER: &str = " (old me)";

/// Identities of the machine running the dashboard, oldest first.
///
/// The last entry is the current identity; every earlier entry is a
/// previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRoster {
    identities: Vec<String>,
}

impl HostRoster {
    /// Wrap an ordered identity list.
    pub fn new(identities: Vec<String>) -> Self {
        Self { identities }
    }

    /// The current identity, if any.
    pub fn current(&self) -> Option<&str> {
        self.identities.last().map(String::as_str)
    }

    /// All identities, oldest first.
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl From<Vec<String>> for HostRoster {
    fn from(identities: Vec<String>) -> Self {
        Self::new(identities)
    }
}

/// Decorate `profile` with its hostname and host-identity markers.
///
/// Appends ` <hostname>` when the hostname is non-empty, then scans the
/// whole roster in order: a match against the last entry appends
/// ` (me)`, a match against any earlier entry appends ` (old me)`.
/// Matching is substring containment and every match is appended, so
/// a profile can carry several markers. Empty roster entries match
/// nothing.
pub fn annotate(profile: &str, hostname: Option<&str>, roster: &HostRoster) -> String {
    let mut label = profile.to_string();
    if let Some(name) = hostname.filter(|n| !n.is_empty()) {
        label.push(' ');
        label.push_str(name);
    }
    let last = roster.identities.len().saturating_sub(1);
    for (idx, identity) in roster.identities.iter().enumerate() {
        if identity.is_empty() || !profile.contains(identity.as_str()) {
            continue;
        }
        label.push_str(if idx == last { ME_MARKER } else { OLD_ME_MARKER });
    }
    label
}
