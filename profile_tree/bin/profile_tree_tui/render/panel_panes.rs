/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use profile_tree::TreeNode;
use profile_tree::markup::strip_markup;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::App;
use crate::panels::Target;
use crate::theme::ColorScheme;
use crate::theme::Labels;

/// Render the IP-info, timeline and evidence panes (right side).
pub(crate) fn render_panel_panes(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let scheme = &app.theme.scheme;
    let labels = &app.theme.labels;
    let root = app.state.tree();

    let ip_info = ip_info_lines(
        root,
        app.panels.ip_info.profile.as_deref(),
        scheme,
        labels,
    );
    let timeline = timeline_lines(root, app.panels.timeline.target.as_ref(), scheme, labels);
    let evidence = evidence_lines(root, app.panels.evidence.target.as_ref(), scheme, labels);

    for (chunk, title, lines) in [
        (chunks[0], labels.pane_ip_info, ip_info),
        (chunks[1], labels.pane_timeline, timeline),
        (chunks[2], labels.pane_evidence, evidence),
    ] {
        let pane = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(scheme.border),
        );
        frame.render_widget(pane, chunk);
    }
}

fn field<'a>(name: &'a str, value: String, scheme: &ColorScheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(name, scheme.detail_label.add_modifier(Modifier::BOLD)),
        Span::styled(value, scheme.detail_label),
    ])
}

fn yes_no(flag: bool, labels: &Labels) -> String {
    let text = if flag { labels.yes } else { labels.no };
    text.to_string()
}

fn empty<'a>(scheme: &ColorScheme, labels: &'a Labels) -> Vec<Line<'a>> {
    vec![Line::from(Span::styled(labels.pane_empty, scheme.info))]
}

/// Lines for the IP-info pane.
pub(crate) fn ip_info_lines<'a>(
    root: Option<&TreeNode>,
    profile: Option<&str>,
    scheme: &ColorScheme,
    labels: &'a Labels,
) -> Vec<Line<'a>> {
    let Some(profile) = profile else {
        return empty(scheme, labels);
    };
    let mut lines = vec![field(labels.profile, profile.to_string(), scheme)];
    let Some(node) = root.and_then(|r| r.child(profile)) else {
        return lines;
    };
    if node.degraded {
        lines.push(Line::from(Span::styled(labels.degraded, scheme.node_degraded)));
        return lines;
    }
    let blocked = node.children.iter().filter(|tw| tw.blocked).count();
    lines.push(field(labels.label, strip_markup(&node.label), scheme));
    lines.push(field(labels.timewindows, node.children.len().to_string(), scheme));
    lines.push(Line::from(vec![
        Span::styled(
            labels.blocked,
            scheme.detail_label.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ({})", yes_no(node.blocked, labels), blocked),
            if node.blocked {
                scheme.node_blocked
            } else {
                scheme.detail_label
            },
        ),
    ]));
    lines
}

/// Lines for the timeline pane: the profile's timewindows in order
/// with the selected one emphasized.
pub(crate) fn timeline_lines<'a>(
    root: Option<&TreeNode>,
    target: Option<&Target>,
    scheme: &ColorScheme,
    labels: &'a Labels,
) -> Vec<Line<'a>> {
    let Some((profile, timewindow)) = target else {
        return empty(scheme, labels);
    };
    let mut lines = vec![
        field(labels.profile, profile.clone(), scheme),
        field(labels.timewindow, timewindow.clone(), scheme),
    ];
    let Some(node) = root.and_then(|r| r.child(profile)) else {
        return lines;
    };
    if let Some(idx) = node.children.iter().position(|tw| &tw.key == timewindow) {
        lines.push(field(
            labels.position,
            format!("{} / {}", idx + 1, node.children.len()),
            scheme,
        ));
    }
    let mut strip = Vec::new();
    for (i, tw) in node.children.iter().enumerate() {
        if i > 0 {
            strip.push(Span::styled(" ─ ", scheme.border));
        }
        let mut style = if tw.blocked {
            scheme.node_blocked
        } else {
            scheme.node_timewindow
        };
        if &tw.key == timewindow {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        strip.push(Span::styled(tw.key.clone(), style));
    }
    lines.push(Line::from(strip));
    lines
}

/// Lines for the evidence pane.
pub(crate) fn evidence_lines<'a>(
    root: Option<&TreeNode>,
    target: Option<&Target>,
    scheme: &ColorScheme,
    labels: &'a Labels,
) -> Vec<Line<'a>> {
    let Some((profile, timewindow)) = target else {
        return empty(scheme, labels);
    };
    let mut lines = vec![
        field(labels.profile, profile.clone(), scheme),
        field(labels.timewindow, timewindow.clone(), scheme),
    ];
    let blocked = root
        .and_then(|r| r.child(profile))
        .and_then(|p| p.child(timewindow))
        .is_some_and(|tw| tw.blocked);
    lines.push(Line::from(vec![
        Span::styled(
            labels.blocked,
            scheme.detail_label.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            yes_no(blocked, labels),
            if blocked {
                scheme.node_blocked
            } else {
                scheme.detail_label
            },
        ),
    ]));
    lines
}
