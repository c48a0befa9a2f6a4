/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::store::StoreError;

/// Errors raised while assembling the profile tree or routing a
/// selection.
///
/// Which of these abort a rebuild depends on where they occur: a
/// [`TreeError::StoreQuery`] from the global batch fails the whole
/// build, while any error inside one profile's sub-pipeline only
/// degrades that profile.
#[derive(thiserror::Error, Debug)]
pub enum TreeError {
    /// A timewindow identifier carries no integer ordinal to sort by.
    #[error("malformed timewindow identifier {0:?}: no numeric ordinal")]
    MalformedIdentifier(String),

    /// A blocked record did not split into `profile`, id and
    /// timewindow.
    #[error("malformed blocked record {0:?}: expected profile_<id>_<timewindow>")]
    MalformedBlockedRecord(String),

    /// A store query failed.
    #[error(transparent)]
    StoreQuery(#[from] StoreError),

    /// A timewindow was selected but the event carried no parent label
    /// to recover the profile from.
    #[error("timewindow {0:?} selected without a parent profile")]
    OrphanTimewindow(String),
}
