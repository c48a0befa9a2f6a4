/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use profile_tree::markup::strip_markup;
use profile_tree::tree::FlatRow;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;

use crate::App;

/// Whether another row at `depth` follows row `idx` before the
/// enclosing subtree ends.
pub(crate) fn has_sibling_after(rows: &[FlatRow<'_>], idx: usize, depth: usize) -> bool {
    rows[idx + 1..]
        .iter()
        .take_while(|row| row.depth >= depth)
        .any(|row| row.depth == depth)
}

/// Render the profile tree (left pane).
///
/// Labels are drawn without their markup; blocked nodes are colored
/// instead. Style precedence: selected > blocked > degraded > kind.
pub(crate) fn render_profile_tree(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let rows = app.visible_rows();
    let scheme = &app.theme.scheme;

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(vis_idx, row)| {
            let node = row.node;
            let indent = "  ".repeat(row.depth);

            let connector = if row.depth == 0 {
                ""
            } else if has_sibling_after(&rows, vis_idx, row.depth) {
                "├─ "
            } else {
                "└─ "
            };

            let fold = if node.has_children() {
                if node.extended { "▼ " } else { "▶ " }
            } else {
                "  "
            };

            let selected = vis_idx == app.cursor.pos();
            let style = if selected {
                scheme.stat_selection.add_modifier(Modifier::BOLD)
            } else if node.blocked {
                scheme.node_blocked
            } else if node.degraded {
                scheme.node_degraded
            } else {
                scheme.node_style(node.kind)
            };

            let marker = if selected {
                app.theme.labels.selection_caret
            } else {
                "  "
            };

            ListItem::new(Line::from(Span::styled(
                format!(
                    "{}{}{}{}{}",
                    marker,
                    indent,
                    connector,
                    fold,
                    strip_markup(&node.label)
                ),
                style,
            )))
        })
        .collect();

    let title = match app.state.tree() {
        Some(root) => format!("{} ({})", app.theme.labels.pane_profiles, root.children.len()),
        None => app.theme.labels.loading.to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(scheme.border);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default());
    let mut list_state = ListState::default()
        .with_selected(Some(app.cursor.pos()))
        .with_offset(app.tree_scroll_offset);
    frame.render_stateful_widget(list, area, &mut list_state);
}
