/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use profile_tree::AssemblerConfig;
use profile_tree::MemoryStore;
use profile_tree::NodeKind;
use profile_tree::SelectEvent;
use profile_tree::SelectionRouter;
use profile_tree::SelectionState;
use profile_tree::StoreError;
use profile_tree::TreeAssembler;
use profile_tree::TreeError;
use profile_tree::TreeNode;
use profile_tree::TreeState;
use profile_tree::tree::FlatRow;
use profile_tree::tree::collapse_all;
use profile_tree::tree::find_by_key_mut;
use profile_tree::tree::flatten_tree;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::Args;
use crate::Cursor;
use crate::KeyResult;
use crate::PanelViews;
use crate::Theme;
use crate::render::ui;

/// Outcome of one rebuild, tagged with its generation.
pub(crate) type RebuildResult = (u64, Result<TreeNode, TreeError>);

/// Identity of a visible row that survives rebuilds: kind, key and
/// parent key.
type RowKey = (NodeKind, String, Option<String>);

/// Rows moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Load the snapshot at `source` and assemble a tree from it.
///
/// The file is re-read on every call so refreshes pick up changes
/// written by the analysis pipeline.
pub(crate) async fn rebuild(source: &Path, config: AssemblerConfig) -> Result<TreeNode, TreeError> {
    let text = tokio::fs::read_to_string(source)
        .await
        .map_err(|e| StoreError::Unavailable(format!("{}: {}", source.display(), e)))?;
    let store = MemoryStore::from_json(&text)?;
    TreeAssembler::new(Arc::new(store), config)
        .build_tree()
        .await
}

/// Runtime state for the profile tree TUI.
pub(crate) struct App {
    /// Snapshot file backing every rebuild.
    pub(crate) source: PathBuf,
    /// Assembly settings passed to every rebuild.
    pub(crate) config: AssemblerConfig,
    /// Set when the user requests exit (`q` / `Esc` / `Ctrl-C`).
    pub(crate) should_quit: bool,

    /// Displayed tree and rebuild generations.
    pub(crate) state: TreeState,
    /// Navigation cursor over visible rows.
    pub(crate) cursor: Cursor,
    /// Scroll offset for the tree pane (top visible row).
    pub(crate) tree_scroll_offset: usize,
    /// Height of the tree viewport in rows (updated before each draw).
    pub(crate) tree_viewport_height: usize,

    /// What the panels currently show.
    pub(crate) selection: SelectionState,
    pub(crate) router: SelectionRouter,
    pub(crate) panels: PanelViews,
    /// Last routing failure, shown in the header until the next
    /// selection.
    pub(crate) select_error: Option<String>,

    /// Human-readable refresh interval (e.g. "5s").
    pub(crate) refresh_interval_label: String,
    pub(crate) theme: Theme,
}

impl App {
    pub(crate) fn new(source: PathBuf, config: AssemblerConfig) -> Self {
        Self {
            source,
            config,
            should_quit: false,
            state: TreeState::new(),
            cursor: Cursor::new(0),
            tree_scroll_offset: 0,
            tree_viewport_height: 20, // Updated during rendering.
            selection: SelectionState::default(),
            router: SelectionRouter,
            panels: PanelViews::default(),
            select_error: None,
            refresh_interval_label: String::new(),
            theme: Theme::new(),
        }
    }

    /// Rows currently on screen, top to bottom.
    pub(crate) fn visible_rows(&self) -> Vec<FlatRow<'_>> {
        self.state.tree().map(flatten_tree).unwrap_or_default()
    }

    /// The node under the cursor.
    pub(crate) fn current_selection(&self) -> Option<&TreeNode> {
        self.state
            .tree()
            .and_then(|root| flatten_tree(root).get(self.cursor.pos()).map(|row| row.node))
    }

    fn selected_row_key(&self) -> Option<RowKey> {
        let rows = self.visible_rows();
        rows.get(self.cursor.pos()).map(|row| {
            (
                row.node.kind,
                row.node.key.clone(),
                row.parent.map(|p| p.key.clone()),
            )
        })
    }

    /// Rebuild synchronously and apply the result. Used for the
    /// initial load before the event loop starts.
    pub(crate) async fn refresh_now(&mut self) {
        let generation = self.state.begin_refresh();
        let result = rebuild(&self.source, self.config.clone()).await;
        self.apply_refresh(generation, result);
    }

    /// Start a rebuild in the background; its result arrives on `tx`.
    ///
    /// Any rebuild still running becomes stale and its result will be
    /// discarded by [`TreeState::apply`].
    pub(crate) fn spawn_refresh(&mut self, tx: &mpsc::UnboundedSender<RebuildResult>) {
        let generation = self.state.begin_refresh();
        let source = self.source.clone();
        let config = self.config.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = rebuild(&source, config).await;
            // A closed channel means the UI has exited.
            let _ = tx.send((generation, result));
        });
    }

    /// Interval-driven refresh. Skipped while a rebuild is in flight so
    /// a store slower than the interval still gets its results shown;
    /// only an explicit `r` supersedes a running rebuild.
    ///
    /// Returns true if a rebuild was started.
    pub(crate) fn on_refresh_tick(&mut self, tx: &mpsc::UnboundedSender<RebuildResult>) -> bool {
        if self.state.is_refreshing() {
            tracing::debug!(
                generation = self.state.latest_generation(),
                "rebuild still running, skipping tick"
            );
            return false;
        }
        self.spawn_refresh(tx);
        true
    }

    /// Apply a finished rebuild, keeping the cursor on the same row
    /// when that row still exists.
    pub(crate) fn apply_refresh(&mut self, generation: u64, result: Result<TreeNode, TreeError>) {
        let previous = self.selected_row_key();
        if !self.state.apply(generation, result) {
            return;
        }
        let rows = self.visible_rows();
        let len = rows.len();
        let restored = previous.and_then(|(kind, key, parent)| {
            rows.iter().position(|row| {
                row.node.kind == kind
                    && row.node.key == key
                    && row.parent.map(|p| p.key.as_str()) == parent.as_deref()
            })
        });
        self.cursor.update_len(len);
        if let Some(pos) = restored {
            self.cursor.set_pos(pos);
        }
        self.ensure_cursor_visible();
    }

    /// Route the row under the cursor through the [`SelectionRouter`].
    pub(crate) fn select_current(&mut self) {
        let Some(root) = self.state.tree() else {
            return;
        };
        let rows = flatten_tree(root);
        let Some(row) = rows.get(self.cursor.pos()) else {
            return;
        };
        let event = SelectEvent::from_row(row);
        let mut panels = self.panels.as_panels();
        self.select_error = self
            .router
            .on_select(&event, &mut self.selection, &mut panels)
            .err()
            .map(|e| e.to_string());
    }

    /// Expand or collapse the profile under the cursor. Timewindow
    /// rows toggle their parent and move the cursor onto it.
    pub(crate) fn toggle_selected(&mut self) -> bool {
        let Some((kind, key, parent)) = self.selected_row_key() else {
            return false;
        };
        let profile_key = match (kind, parent) {
            (NodeKind::Profile, _) => key,
            (NodeKind::Timewindow, Some(parent)) => parent,
            _ => return false,
        };
        let Some(root) = self.state.tree_mut() else {
            return false;
        };
        let Some(node) = find_by_key_mut(root, NodeKind::Profile, &profile_key) else {
            return false;
        };
        if !node.has_children() {
            return false;
        }
        node.extended = !node.extended;

        let rows = self.visible_rows();
        let len = rows.len();
        let profile_pos = rows
            .iter()
            .position(|row| row.node.kind == NodeKind::Profile && row.node.key == profile_key);
        self.cursor.update_len(len);
        if kind == NodeKind::Timewindow
            && let Some(pos) = profile_pos
        {
            self.cursor.set_pos(pos);
        }
        self.ensure_cursor_visible();
        true
    }

    /// Adjust the scroll offset so the cursor stays in the viewport.
    pub(crate) fn ensure_cursor_visible(&mut self) {
        let pos = self.cursor.pos();
        if pos < self.tree_scroll_offset {
            self.tree_scroll_offset = pos;
        } else if pos >= self.tree_scroll_offset + self.tree_viewport_height {
            self.tree_scroll_offset = pos.saturating_sub(self.tree_viewport_height.saturating_sub(1));
        }
    }

    fn moved(&mut self, changed: bool) -> KeyResult {
        if changed {
            self.ensure_cursor_visible();
            KeyResult::Redraw
        } else {
            KeyResult::None
        }
    }

    /// Handle a single keypress and update in-memory UI state.
    ///
    /// Selection routing and rebuilds are left to the caller via the
    /// returned [`KeyResult`].
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let changed = self.cursor.move_up();
                self.moved(changed)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let changed = self.cursor.move_down();
                self.moved(changed)
            }
            KeyCode::Home | KeyCode::Char('g') => {
                let changed = self.cursor.home();
                self.moved(changed)
            }
            KeyCode::End | KeyCode::Char('G') => {
                let changed = self.cursor.end();
                self.moved(changed)
            }
            KeyCode::PageDown => {
                let changed = self.cursor.page_down(PAGE);
                self.moved(changed)
            }
            KeyCode::PageUp => {
                let changed = self.cursor.page_up(PAGE);
                self.moved(changed)
            }
            KeyCode::Enter => KeyResult::Select,
            KeyCode::Tab | KeyCode::Char(' ') => {
                if self.toggle_selected() {
                    KeyResult::Redraw
                } else {
                    KeyResult::None
                }
            }
            KeyCode::Char('c') => {
                let Some(root) = self.state.tree_mut() else {
                    return KeyResult::None;
                };
                collapse_all(root);
                let len = self.visible_rows().len();
                self.cursor.update_len(len);
                self.ensure_cursor_visible();
                KeyResult::Redraw
            }
            KeyCode::Char('r') => KeyResult::NeedsRefresh,
            _ => KeyResult::None,
        }
    }
}

/// Drive the main event loop.
///
/// Rebuilds run as spawned tasks on interval ticks (unless one is
/// already running) and on `r`; their results come back over a channel
/// and are applied between key events, so input never waits on the
/// store.
pub(crate) async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    args: &Args,
    mut app: App,
) -> io::Result<()> {
    let mut refresh_interval =
        tokio::time::interval(Duration::from_millis(args.refresh_ms.max(1)));
    refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; the initial load already ran.
    refresh_interval.tick().await;
    app.refresh_interval_label = args.refresh_interval_label();

    let (tx, mut rx) = mpsc::unbounded_channel::<RebuildResult>();
    let mut events = EventStream::new();

    loop {
        // Body height is the terminal minus header (3) and footer (2).
        let terminal_size = terminal.size()?;
        app.tree_viewport_height = terminal_size.height.saturating_sub(7).max(1) as usize;

        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            _ = refresh_interval.tick() => {
                app.on_refresh_tick(&tx);
            }
            Some((generation, result)) = rx.recv() => {
                app.apply_refresh(generation, result);
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => match app.on_key(key) {
                        KeyResult::Select => app.select_current(),
                        KeyResult::NeedsRefresh => app.spawn_refresh(&tx),
                        KeyResult::Redraw | KeyResult::None => {}
                    },
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
