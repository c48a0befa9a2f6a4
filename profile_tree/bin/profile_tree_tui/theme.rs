/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use profile_tree::AssemblerConfig;
use profile_tree::NodeKind;
use profile_tree::config::DEFAULT_MAX_IN_FLIGHT;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Command-line arguments for the profile tree TUI.
#[derive(Debug, Parser)]
#[command(
    name = "profile-tree-tui",
    about = "TUI browser for profile/timewindow snapshots"
)]
pub(crate) struct Args {
    /// JSON snapshot of the profile store. Re-read on every refresh.
    #[arg(long, short, env = "PROFILE_TREE_SNAPSHOT")]
    pub(crate) snapshot: PathBuf,

    /// Refresh interval in milliseconds
    #[arg(long, env = "PROFILE_TREE_REFRESH_MS", default_value_t = 5000)]
    pub(crate) refresh_ms: u64,

    /// Maximum number of profiles fetched concurrently
    #[arg(long, env = "PROFILE_TREE_MAX_IN_FLIGHT", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub(crate) max_in_flight: usize,

    /// Per-query timeout in milliseconds (0 disables)
    #[arg(long, env = "PROFILE_TREE_QUERY_TIMEOUT_MS", default_value_t = 5000)]
    pub(crate) query_timeout_ms: u64,

    /// Log file; the terminal belongs to the UI
    #[arg(
        long,
        env = "PROFILE_TREE_LOG_FILE",
        default_value = "profile_tree_tui.log"
    )]
    pub(crate) log_file: PathBuf,
}

impl Args {
    /// Assembler settings derived from the flags.
    pub(crate) fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            max_in_flight: self.max_in_flight,
            query_timeout: (self.query_timeout_ms > 0)
                .then(|| Duration::from_millis(self.query_timeout_ms)),
        }
    }

    /// Human-readable refresh interval (e.g. "5s", "750ms").
    pub(crate) fn refresh_interval_label(&self) -> String {
        if self.refresh_ms >= 1000 && self.refresh_ms.is_multiple_of(1000) {
            format!("{}s", self.refresh_ms / 1000)
        } else {
            format!("{}ms", self.refresh_ms)
        }
    }
}

/// All user-visible text in the TUI.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,

    pub(crate) separator: &'static str,
    pub(crate) selection_caret: &'static str,
    pub(crate) refresh_icon: &'static str,
    pub(crate) refreshing: &'static str,
    pub(crate) generation: &'static str,
    pub(crate) no_selection: &'static str,
    pub(crate) loading: &'static str,

    pub(crate) profile: &'static str,
    pub(crate) timewindow: &'static str,
    pub(crate) label: &'static str,
    pub(crate) timewindows: &'static str,
    pub(crate) blocked: &'static str,
    pub(crate) position: &'static str,
    pub(crate) degraded: &'static str,
    pub(crate) yes: &'static str,
    pub(crate) no: &'static str,

    pub(crate) pane_profiles: &'static str,
    pub(crate) pane_ip_info: &'static str,
    pub(crate) pane_timeline: &'static str,
    pub(crate) pane_evidence: &'static str,
    pub(crate) pane_empty: &'static str,

    pub(crate) footer_help_text: &'static str,
}

impl Labels {
    pub(crate) fn en() -> Self {
        Self {
            app_name: "profile-tree",
            separator: " • ",
            selection_caret: "▸ ",
            refresh_icon: "⟳ ",
            refreshing: "refreshing…",
            generation: "gen ",
            no_selection: "No selection (Enter selects)",
            loading: "Loading…",
            profile: "Profile: ",
            timewindow: "Timewindow: ",
            label: "Label: ",
            timewindows: "Timewindows: ",
            blocked: "Blocked: ",
            position: "Position: ",
            degraded: "Details unavailable; see log",
            yes: "yes",
            no: "no",
            pane_profiles: "Profiles",
            pane_ip_info: "IP Info",
            pane_timeline: "Timeline",
            pane_evidence: "Evidence",
            pane_empty: "Select a node",
            footer_help_text: "q: quit | j/k: navigate | g/G: top/bottom | Enter: select | Tab/Space: expand/collapse | c: collapse all | r: refresh",
        }
    }
}

/// Color scheme for the TUI.
///
/// Each field is a semantic role. Blocked nodes are always red;
/// degraded profiles are dimmed.
pub(crate) struct ColorScheme {
    pub(crate) app_name: Style,
    pub(crate) border: Style,

    pub(crate) node_profile: Style,
    pub(crate) node_timewindow: Style,
    pub(crate) node_blocked: Style,
    pub(crate) node_degraded: Style,

    pub(crate) error: Style,
    pub(crate) info: Style,

    pub(crate) stat_timing: Style,
    pub(crate) stat_selection: Style,
    pub(crate) stat_source: Style,
    pub(crate) stat_label: Style,

    pub(crate) detail_label: Style,
    pub(crate) footer_help: Style,
}

impl ColorScheme {
    /// Nord palette.
    pub(crate) fn nord() -> Self {
        let fg = Color::Rgb(216, 222, 233); // #D8DEE9
        let dim = Color::Rgb(76, 86, 106); // #4C566A
        let red = Color::Rgb(191, 97, 106); // #BF616A
        let yellow = Color::Rgb(235, 203, 139); // #EBCB8B
        let green = Color::Rgb(163, 190, 140); // #A3BE8C
        let frost = Color::Rgb(136, 192, 208); // #88C0D0
        let blue = Color::Rgb(129, 161, 193); // #81A1C1
        let purple = Color::Rgb(180, 142, 173); // #B48EAD

        Self {
            app_name: Style::default().fg(frost).add_modifier(Modifier::BOLD),
            border: Style::default().fg(dim),

            node_profile: Style::default().fg(green),
            node_timewindow: Style::default().fg(blue),
            node_blocked: Style::default().fg(red),
            node_degraded: Style::default().fg(dim).add_modifier(Modifier::ITALIC),

            error: Style::default().fg(red),
            info: Style::default().fg(frost),

            stat_timing: Style::default().fg(yellow),
            stat_selection: Style::default().fg(purple),
            stat_source: Style::default().fg(dim),
            stat_label: Style::default().fg(fg),

            detail_label: Style::default().fg(fg),
            footer_help: Style::default().fg(dim),
        }
    }

    /// Style for an undecorated node of the given kind.
    pub(crate) fn node_style(&self, kind: NodeKind) -> Style {
        match kind {
            NodeKind::Root | NodeKind::Profile => self.node_profile,
            NodeKind::Timewindow => self.node_timewindow,
        }
    }
}

/// Colors plus text.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Theme {
    pub(crate) fn new() -> Self {
        Self {
            scheme: ColorScheme::nord(),
            labels: Labels::en(),
        }
    }
}
