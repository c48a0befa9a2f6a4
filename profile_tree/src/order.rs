/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Ordering of a profile's timewindows.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::TreeError;
use crate::markup::highlight;
use crate::model::TimewindowId;
use crate::model::TreeNode;

/// Sort key of a timewindow id: its first run of ASCII digits, read as
/// a non-negative integer of any length.
///
/// Leading zeros are ignored, so `"007"` and `"7"` are equal. Longer
/// runs compare greater; equal-length runs compare digit by digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordinal<'a>(&'a str);

impl<'a> Ordinal<'a> {
    /// The decimal digits of the ordinal, without leading zeros.
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl Ord for Ordinal<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(other.0))
    }
}

impl PartialOrd for Ordinal<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the first run of ASCII digits in `id`.
///
/// `"timewindow12"` yields 12; `"tw3_of_9"` yields 3. Fails with
/// [`TreeError::MalformedIdentifier`] when there is no digit at all.
pub fn extract_ordinal(id: &str) -> Result<Ordinal<'_>, TreeError> {
    let start = id
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| TreeError::MalformedIdentifier(id.to_string()))?;
    let digits = &id[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let run = &digits[..end];
    let trimmed = run.trim_start_matches('0');
    Ok(Ordinal(if trimmed.is_empty() {
        &run[end - 1..]
    } else {
        trimmed
    }))
}

/// Order `timewindows` ascending by ordinal and build their leaf nodes.
///
/// Repeated ids collapse into one leaf. Leaves whose id is in `blocked`
/// get a highlighted label. The whole call fails if any id lacks an
/// ordinal; callers treat that as a failure of the owning profile only.
pub fn order_timewindows(
    timewindows: &[TimewindowId],
    blocked: Option<&BTreeSet<TimewindowId>>,
) -> Result<Vec<TreeNode>, TreeError> {
    let mut keyed = timewindows
        .iter()
        .map(|tw| extract_ordinal(tw).map(|ordinal| (ordinal, tw)))
        .collect::<Result<Vec<_>, TreeError>>()?;
    // The id breaks ordinal ties so the output never depends on input
    // order, and repeats end up adjacent.
    keyed.sort_by(|(a, a_id), (b, b_id)| a.cmp(b).then_with(|| a_id.cmp(b_id)));
    keyed.dedup_by(|a, b| a.1 == b.1);

    Ok(keyed
        .into_iter()
        .map(|(_, tw)| {
            let is_blocked = blocked.is_some_and(|set| set.contains(tw));
            let label = if is_blocked {
                highlight(tw)
            } else {
                tw.clone()
            };
            TreeNode::timewindow(tw.clone(), label, is_blocked)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::is_highlighted;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn ordinal(id: &str) -> &str {
        extract_ordinal(id).unwrap().as_str()
    }

    #[test]
    fn extract_ordinal_takes_first_digit_run() {
        assert_eq!(ordinal("timewindow0"), "0");
        assert_eq!(ordinal("timewindow42"), "42");
        assert_eq!(ordinal("tw3_of_9"), "3");
        assert_eq!(ordinal("7"), "7");
        assert_eq!(ordinal("timewindow007"), "7");
        assert_eq!(ordinal("timewindow000"), "0");
    }

    #[test]
    fn extract_ordinal_rejects_missing_digits() {
        assert!(matches!(
            extract_ordinal("timewindow"),
            Err(TreeError::MalformedIdentifier(id)) if id == "timewindow"
        ));
        assert!(extract_ordinal("").is_err());
    }

    // Ordinals wider than any machine integer still order by value.
    #[test]
    fn ordinals_beyond_u64_are_ordered_by_value() {
        let huge = "timewindow99999999999999999999999";
        let larger = "timewindow100000000000000000000000";
        assert_eq!(ordinal(huge), "99999999999999999999999");
        let u64_max = extract_ordinal("timewindow18446744073709551615").unwrap();
        assert!(extract_ordinal(huge).unwrap() > u64_max);

        let nodes = order_timewindows(&ids(&[larger, "timewindow2", huge]), None).unwrap();
        let keys: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["timewindow2", huge, larger]);
    }

    // Numeric, not lexicographic: 2 sorts before 10.
    #[test]
    fn orders_numerically_regardless_of_input_order() {
        let expected = vec!["timewindow1", "timewindow2", "timewindow10"];
        for input in [
            ids(&["timewindow10", "timewindow2", "timewindow1"]),
            ids(&["timewindow2", "timewindow1", "timewindow10"]),
            ids(&["timewindow1", "timewindow10", "timewindow2"]),
        ] {
            let nodes = order_timewindows(&input, None).unwrap();
            let keys: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn highlights_exactly_the_blocked_ids() {
        let blocked: BTreeSet<String> = ["timewindow1".to_string()].into_iter().collect();
        let nodes = order_timewindows(
            &ids(&["timewindow0", "timewindow2", "timewindow1"]),
            Some(&blocked),
        )
        .unwrap();
        for node in &nodes {
            let expect = node.key == "timewindow1";
            assert_eq!(node.blocked, expect, "{}", node.key);
            assert_eq!(is_highlighted(&node.label), expect, "{}", node.key);
        }
    }

    // A blocked id that the profile does not have is simply unused.
    #[test]
    fn blocked_ids_not_present_are_ignored() {
        let blocked: BTreeSet<String> = ["timewindow9".to_string()].into_iter().collect();
        let nodes = order_timewindows(&ids(&["timewindow0"]), Some(&blocked)).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(!nodes[0].blocked);
    }

    #[test]
    fn one_malformed_id_fails_the_profile() {
        let err = order_timewindows(&ids(&["timewindow1", "bogus"]), None).unwrap_err();
        assert!(matches!(err, TreeError::MalformedIdentifier(id) if id == "bogus"));
    }

    // Children form a mapping: a repeated id yields a single leaf.
    #[test]
    fn repeated_ids_collapse_into_one_leaf() {
        let blocked: BTreeSet<String> = ["timewindow1".to_string()].into_iter().collect();
        let nodes = order_timewindows(
            &ids(&["timewindow1", "timewindow0", "timewindow1"]),
            Some(&blocked),
        )
        .unwrap();
        let keys: Vec<_> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["timewindow0", "timewindow1"]);
        assert!(nodes[1].blocked);
    }

    #[test]
    fn empty_input_yields_no_children() {
        assert!(order_timewindows(&[], None).unwrap().is_empty());
    }
}
