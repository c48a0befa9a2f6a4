/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyResult {
    /// Nothing changed.
    None,
    /// Cursor or expand/collapse state changed; redraw only.
    Redraw,
    /// Route the row under the cursor to the panels.
    Select,
    /// Start a rebuild now.
    NeedsRefresh,
}
