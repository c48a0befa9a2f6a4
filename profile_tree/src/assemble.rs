/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Assembly of the profile tree from store queries.
//!
//! A build runs in two phases joined at barriers:
//!
//! 1. **Global batch**: profile list, blocked records and host roster
//!    are queried together. Any failure here fails the build.
//! 2. **Per-profile fan-out**: each profile's timewindows and hostname
//!    are queried together, with at most
//!    [`AssemblerConfig::max_in_flight`] profiles in flight. A failure
//!    here degrades only that profile.
//!
//! The root is produced after every profile has settled. Nothing is
//! handed to the renderer before that.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use futures::stream;

use crate::blocked::BlockedIndex;
use crate::config::AssemblerConfig;
use crate::error::TreeError;
use crate::host::HostRoster;
use crate::host::annotate;
use crate::markup::highlight;
use crate::model::ProfileId;
use crate::model::TreeNode;
use crate::order::order_timewindows;
use crate::store::ProfileStore;
use crate::store::StoreError;
use crate::store::profile_id_from_key;

/// Builds [`TreeNode`] trees from a [`ProfileStore`].
///
/// Stateless across calls: every [`TreeAssembler::build_tree`] is an
/// independent full rebuild.
pub struct TreeAssembler<S: ?Sized> {
    store: Arc<S>,
    config: AssemblerConfig,
}

impl<S: ?Sized> Clone for TreeAssembler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: ProfileStore + ?Sized> TreeAssembler<S> {
    /// Create an assembler over `store`.
    pub fn new(store: Arc<S>, config: AssemblerConfig) -> Self {
        Self { store, config }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Run one store query under the configured deadline.
    async fn query<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => fut.await,
        }
    }

    /// Rebuild the whole tree.
    ///
    /// Fails only when the global batch fails; per-profile failures
    /// are logged and rendered as degraded nodes.
    pub async fn build_tree(&self) -> Result<TreeNode, TreeError> {
        let started = Instant::now();

        let (profile_keys, blocked_records, roster) = tokio::try_join!(
            self.query(self.store.list_profiles()),
            self.query(self.store.list_blocked()),
            self.query(self.store.list_host_roster()),
        )?;

        let mut seen = HashSet::new();
        let profiles: Vec<ProfileId> = profile_keys
            .iter()
            .map(|key| profile_id_from_key(key))
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let mut blocked = BlockedIndex::from_records(&blocked_records);
        blocked.retain_profiles(&seen);
        let roster = HostRoster::new(roster);

        // Futures are created up front so the stream holds no borrowing
        // closure; `buffered` keeps store order in the output.
        let pending: Vec<_> = profiles
            .into_iter()
            .map(|profile| self.profile_node(profile, &blocked, &roster))
            .collect();
        let children: Vec<TreeNode> = stream::iter(pending)
            .buffered(self.config.concurrency())
            .collect()
            .await;

        let degraded = children.iter().filter(|c| c.degraded).count();
        tracing::info!(
            profiles = children.len(),
            blocked_profiles = blocked.len(),
            degraded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "profile tree assembled"
        );
        Ok(TreeNode::root(children))
    }

    /// Build one profile node, degrading to a raw node on failure.
    async fn profile_node(
        &self,
        profile: ProfileId,
        blocked: &BlockedIndex,
        roster: &HostRoster,
    ) -> TreeNode {
        match self.try_profile_node(&profile, blocked, roster).await {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(profile = %profile, "rendering profile undecorated: {}", err);
                TreeNode::degraded_profile(profile)
            }
        }
    }

    /// Build one profile node: fetch its timewindows and hostname
    /// concurrently, order the timewindows, and decorate the label.
    pub async fn try_profile_node(
        &self,
        profile: &str,
        blocked: &BlockedIndex,
        roster: &HostRoster,
    ) -> Result<TreeNode, TreeError> {
        let started = Instant::now();
        let (timewindows, hostname) = tokio::try_join!(
            self.query(self.store.list_timewindows(profile)),
            self.query(self.store.lookup_hostname(profile)),
        )?;

        let children = order_timewindows(&timewindows, blocked.blocked_timewindows(profile))?;
        let is_blocked = blocked.is_profile_blocked(profile);
        let mut label = annotate(profile, hostname.as_deref(), roster);
        if is_blocked {
            label = highlight(&label);
        }

        tracing::debug!(
            profile,
            timewindows = children.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "profile node built"
        );
        Ok(TreeNode::profile(
            profile.to_string(),
            label,
            is_blocked,
            children,
        ))
    }
}
