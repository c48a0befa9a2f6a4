/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Configuration for tree assembly.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Default bound on concurrent per-profile fetches.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Default per-query timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Knobs for [`crate::TreeAssembler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Maximum number of profile sub-pipelines running at once.
    /// Zero is treated as one.
    pub max_in_flight: usize,
    /// Deadline applied to every individual store query. `None`
    /// disables the deadline.
    #[serde(with = "opt_millis")]
    pub query_timeout: Option<Duration>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            query_timeout: Some(DEFAULT_QUERY_TIMEOUT),
        }
    }
}

impl AssemblerConfig {
    /// Effective concurrency bound (never zero).
    pub fn concurrency(&self) -> usize {
        self.max_in_flight.max(1)
    }
}

/// Serialize `Option<Duration>` as optional milliseconds.
mod opt_millis {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
