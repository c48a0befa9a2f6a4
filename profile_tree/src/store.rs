/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Read-only query contract against the profile store, and an
//! in-memory implementation backed by a JSON snapshot.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::model::ProfileId;
use crate::model::TimewindowId;

/// Prefix the store uses for profile keys (`profile_<id>`).
pub const PROFILE_KEY_PREFIX: &str = "profile_";

/// Errors surfaced by a [`ProfileStore`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or refused the query.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The query did not complete in time.
    #[error("store query timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with something that could not be decoded.
    #[error("malformed store response: {0}")]
    Malformed(String),
}

/// Queries the tree assembler issues against the store.
///
/// Every method is an asynchronous boundary. Implementations must be
/// shareable across the assembler's concurrent per-profile fetches.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profile keys. May be bare ids or `profile_<id>` keys.
    async fn list_profiles(&self) -> Result<Vec<String>, StoreError>;

    /// The timewindow ids recorded for `profile`.
    async fn list_timewindows(&self, profile: &str) -> Result<Vec<TimewindowId>, StoreError>;

    /// All blocked `profile_<id>_<timewindow>` records.
    async fn list_blocked(&self) -> Result<Vec<String>, StoreError>;

    /// Identities of this host, oldest first.
    async fn list_host_roster(&self) -> Result<Vec<String>, StoreError>;

    /// The resolved hostname of `profile`, if known.
    async fn lookup_hostname(&self, profile: &str) -> Result<Option<String>, StoreError>;
}

/// Strip the store's `profile_` key prefix, if present.
pub fn profile_id_from_key(key: &str) -> ProfileId {
    key.strip_prefix(PROFILE_KEY_PREFIX)
        .unwrap_or(key)
        .to_string()
}

/// One profile's record in a [`MemoryStore`] snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Timewindow ids, in store order.
    #[serde(default)]
    pub timewindows: Vec<TimewindowId>,
    /// Resolved hostname.
    #[serde(default)]
    pub hostname: Option<String>,
}

/// In-memory store, loadable from a JSON snapshot:
///
/// ```json
/// {
///   "profiles": {"1.2.3.4": {"timewindows": ["timewindow1"], "hostname": "gw"}},
///   "blocked": ["profile_1.2.3.4_timewindow1"],
///   "host_roster": ["1.2.3.4"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    /// Profiles keyed by id.
    #[serde(default)]
    pub profiles: HashMap<ProfileId, ProfileRecord>,
    /// Blocked records.
    #[serde(default)]
    pub blocked: Vec<String>,
    /// Host identities, oldest first.
    #[serde(default)]
    pub host_roster: Vec<String>,
}

impl MemoryStore {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    /// Read and parse a snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Add or replace a profile.
    pub fn with_profile(
        mut self,
        profile: &str,
        timewindows: &[&str],
        hostname: Option<&str>,
    ) -> Self {
        self.profiles.insert(
            profile.to_string(),
            ProfileRecord {
                timewindows: timewindows.iter().map(|s| s.to_string()).collect(),
                hostname: hostname.map(str::to_string),
            },
        );
        self
    }

    /// Append a blocked record.
    pub fn with_blocked(mut self, record: &str) -> Self {
        self.blocked.push(record.to_string());
        self
    }

    /// Look a profile up by bare id, falling back to its `profile_<id>`
    /// key.
    fn record(&self, profile: &str) -> Option<&ProfileRecord> {
        self.profiles
            .get(profile)
            .or_else(|| self.profiles.get(&format!("{PROFILE_KEY_PREFIX}{profile}")))
    }

    /// Replace the host roster.
    pub fn with_roster(mut self, roster: &[&str]) -> Self {
        self.host_roster = roster.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
        let mut profiles: Vec<String> = self.profiles.keys().cloned().collect();
        profiles.sort();
        Ok(profiles)
    }

    async fn list_timewindows(&self, profile: &str) -> Result<Vec<TimewindowId>, StoreError> {
        self.record(profile)
            .map(|r| r.timewindows.clone())
            .ok_or_else(|| StoreError::Unavailable(format!("no such profile: {}", profile)))
    }

    async fn list_blocked(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.blocked.clone())
    }

    async fn list_host_roster(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.host_roster.clone())
    }

    async fn lookup_hostname(&self, profile: &str) -> Result<Option<String>, StoreError> {
        Ok(self.record(profile).and_then(|r| r.hostname.clone()))
    }
}
