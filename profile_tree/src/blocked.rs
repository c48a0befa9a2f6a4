/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Index of blocked profile/timewindow pairs.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::error::TreeError;
use crate::model::ProfileId;
use crate::model::TimewindowId;

/// Separator between the parts of a blocked record.
const RECORD_SEPARATOR: char = '_';

/// Split a `profile_<id>_<timewindow>` record into `(id, timewindow)`.
///
/// The record must split into exactly three parts; anything else is
/// [`TreeError::MalformedBlockedRecord`].
pub fn parse_blocked_record(record: &str) -> Result<(ProfileId, TimewindowId), TreeError> {
    let parts: Vec<&str> = record.split(RECORD_SEPARATOR).collect();
    match parts.as_slice() {
        [_, profile, timewindow] => Ok((profile.to_string(), timewindow.to_string())),
        _ => Err(TreeError::MalformedBlockedRecord(record.to_string())),
    }
}

/// Mapping from profile to the set of its blocked timewindows.
///
/// Built from scratch on every refresh. Sets make the result
/// independent of record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedIndex {
    by_profile: HashMap<ProfileId, BTreeSet<TimewindowId>>,
}

impl BlockedIndex {
    /// Index `records`, skipping malformed ones with a warning.
    pub fn from_records<S: AsRef<str>>(records: &[S]) -> Self {
        let mut index = Self::default();
        for record in records {
            match parse_blocked_record(record.as_ref()) {
                Ok((profile, timewindow)) => {
                    index.by_profile.entry(profile).or_default().insert(timewindow);
                }
                Err(err) => {
                    tracing::warn!(record = record.as_ref(), "skipping blocked record: {}", err);
                }
            }
        }
        index
    }

    /// Drop entries for profiles not in `known`.
    ///
    /// Blocked records can outlive the profiles they name; those are
    /// ignored rather than surfaced.
    pub fn retain_profiles(&mut self, known: &HashSet<ProfileId>) {
        self.by_profile.retain(|profile, _| {
            let keep = known.contains(profile);
            if !keep {
                tracing::debug!(profile = %profile, "ignoring blocked entry for unknown profile");
            }
            keep
        });
    }

    /// The blocked timewindows of `profile`, if any.
    pub fn blocked_timewindows(&self, profile: &str) -> Option<&BTreeSet<TimewindowId>> {
        self.by_profile.get(profile)
    }

    /// Whether `profile` has at least one blocked timewindow.
    pub fn is_profile_blocked(&self, profile: &str) -> bool {
        self.by_profile.get(profile).is_some_and(|s| !s.is_empty())
    }

    /// Number of profiles with blocked entries.
    pub fn len(&self) -> usize {
        self.by_profile.len()
    }

    /// Whether no profile has blocked entries.
    pub fn is_empty(&self) -> bool {
        self.by_profile.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_three_parts() {
        let (p, tw) = parse_blocked_record("profile_1.2.3.4_timewindow1").unwrap();
        assert_eq!(p, "1.2.3.4");
        assert_eq!(tw, "timewindow1");
    }

    #[test]
    fn parse_rejects_wrong_part_count() {
        for bad in ["profile_1.2.3.4", "profile_a_b_c", "", "nounderscore"] {
            assert!(
                matches!(
                    parse_blocked_record(bad),
                    Err(TreeError::MalformedBlockedRecord(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn malformed_records_are_skipped() {
        let index = BlockedIndex::from_records(&[
            "profile_10.0.0.1_timewindow2",
            "garbage",
            "profile_10.0.0.1_timewindow2_extra",
        ]);
        assert_eq!(index.len(), 1);
        let set = index.blocked_timewindows("10.0.0.1").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["timewindow2"]);
    }

    // Every permutation of the input yields the same index.
    #[test]
    fn index_is_order_independent() {
        let records = [
            "profile_a_timewindow1",
            "profile_b_timewindow4",
            "profile_a_timewindow3",
            "profile_a_timewindow1",
        ];
        let reference = BlockedIndex::from_records(&records);
        let n = records.len();
        for i in 0..n {
            for j in 0..n {
                let mut shuffled = records.to_vec();
                shuffled.swap(i, j);
                shuffled.rotate_left(i);
                assert_eq!(BlockedIndex::from_records(&shuffled), reference);
            }
        }
        assert_eq!(reference.blocked_timewindows("a").unwrap().len(), 2);
    }

    #[test]
    fn retain_drops_unknown_profiles() {
        let mut index =
            BlockedIndex::from_records(&["profile_a_timewindow1", "profile_gone_timewindow2"]);
        let known: HashSet<String> = ["a".to_string()].into_iter().collect();
        index.retain_profiles(&known);
        assert!(index.is_profile_blocked("a"));
        assert!(!index.is_profile_blocked("gone"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_index() {
        let index = BlockedIndex::from_records::<&str>(&[]);
        assert!(index.is_empty());
        assert!(!index.is_profile_blocked("anything"));
    }
}
