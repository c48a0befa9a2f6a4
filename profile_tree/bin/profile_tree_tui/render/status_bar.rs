/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::App;

/// Render the top status/header bar.
///
/// Line 1: app name, snapshot path, refresh interval, generation and
/// any refresh error. Line 2: the current selection, or a routing
/// error.
pub(crate) fn render_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let scheme = &app.theme.scheme;

    // Line 1: profile-tree • snapshot.json • ⟳ 5s • gen 3
    let mut line1 = vec![
        Span::styled(l.app_name, scheme.app_name),
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(app.source.display().to_string(), scheme.stat_source),
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(l.refresh_icon, scheme.stat_timing),
        Span::styled(app.refresh_interval_label.as_str(), scheme.stat_timing),
        Span::styled(l.separator, scheme.stat_label),
        Span::styled(
            format!("{}{}", l.generation, app.state.applied_generation()),
            scheme.stat_label,
        ),
    ];
    if app.state.is_refreshing() {
        line1.push(Span::styled(l.separator, scheme.stat_label));
        line1.push(Span::styled(l.refreshing, scheme.info));
    }
    if let Some(err) = app.state.last_error() {
        line1.push(Span::styled(l.separator, scheme.stat_label));
        line1.push(Span::styled(format!("ERROR: {}", err), scheme.error));
    }

    // Line 2: 1.2.3.4 › timewindow3
    let line2 = if let Some(err) = &app.select_error {
        vec![Span::styled(format!("ERROR: {}", err), scheme.error)]
    } else {
        match (&app.selection.profile, &app.selection.timewindow) {
            // The timewindow is only shown while it belongs to the
            // selected profile.
            (Some(profile), Some(timewindow))
                if app
                    .panels
                    .timeline
                    .target
                    .as_ref()
                    .is_some_and(|(p, _)| p == profile) =>
            {
                vec![
                    Span::styled(profile.as_str(), scheme.stat_selection),
                    Span::styled(" › ", scheme.stat_label),
                    Span::styled(timewindow.as_str(), scheme.stat_selection),
                ]
            }
            (Some(profile), _) => vec![Span::styled(profile.as_str(), scheme.stat_selection)],
            _ => vec![Span::styled(l.no_selection, scheme.info)],
        }
    };

    let header = Paragraph::new(vec![Line::from(line1), Line::from(line2)]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(scheme.border),
    );
    frame.render_widget(header, area);
}

/// Render the bottom help bar with the keyboard shortcuts.
pub(crate) fn render_footer(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let footer = Paragraph::new(app.theme.labels.footer_help_text)
        .style(app.theme.scheme.footer_help)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}
