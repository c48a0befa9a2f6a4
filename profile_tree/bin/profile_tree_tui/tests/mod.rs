/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Tests that exercise the App end to end (snapshot load + assembly +
//! cursor + selection routing). Per-module unit tests live in each
//! module's own `#[cfg(test)] mod tests` block.

use std::path::Path;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use profile_tree::AssemblerConfig;
use profile_tree::NodeKind;
use profile_tree::TreeNode;
use tokio::sync::mpsc;

use super::*;

const SNAPSHOT: &str = r#"{
    "profiles": {
        "1.2.3.4": {"timewindows": ["timewindow2", "timewindow0", "timewindow1"], "hostname": "myhost"},
        "10.0.0.1": {"timewindows": ["timewindow1"]}
    },
    "blocked": ["profile_1.2.3.4_timewindow1"],
    "host_roster": ["1.2.3.4"]
}"#;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn write_snapshot(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

async fn loaded_app(dir: &tempfile::TempDir) -> App {
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, SNAPSHOT);
    let mut app = App::new(path, AssemblerConfig::default());
    app.refresh_now().await;
    app
}

fn row_keys(app: &App) -> Vec<String> {
    app.visible_rows()
        .iter()
        .map(|row| row.node.key.clone())
        .collect()
}

// Empty app: no rows, cursor at zero, nothing selected.
#[test]
fn empty_app_has_no_rows() {
    let app = App::new("missing.json".into(), AssemblerConfig::default());
    assert!(app.visible_rows().is_empty());
    assert_eq!(app.cursor.pos(), 0);
    assert_eq!(app.cursor.len(), 0);
    assert!(app.current_selection().is_none());
}

// Initial load shows collapsed profiles in store order.
#[tokio::test]
async fn initial_load_shows_collapsed_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let app = loaded_app(&dir).await;
    assert_eq!(row_keys(&app), vec!["1.2.3.4", "10.0.0.1"]);
    assert_eq!(app.cursor.len(), 2);
    assert_eq!(app.state.applied_generation(), 1);
    assert!(app.state.last_error().is_none());

    let first = app.current_selection().unwrap();
    assert!(first.blocked);
    assert_eq!(
        profile_tree::markup::strip_markup(&first.label),
        "1.2.3.4 myhost (me)"
    );
}

// Enter on a timewindow routes raw ids to evidence and timeline.
#[tokio::test]
async fn enter_on_timewindow_routes_raw_ids() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;

    assert_eq!(app.on_key(key(KeyCode::Tab)), KeyResult::Redraw);
    assert_eq!(
        row_keys(&app),
        vec![
            "1.2.3.4",
            "timewindow0",
            "timewindow1",
            "timewindow2",
            "10.0.0.1"
        ]
    );
    app.on_key(key(KeyCode::Char('j')));
    app.on_key(key(KeyCode::Down));
    assert_eq!(app.on_key(key(KeyCode::Enter)), KeyResult::Select);
    app.select_current();

    let expected = Some(("1.2.3.4".to_string(), "timewindow1".to_string()));
    assert_eq!(app.panels.evidence.target, expected);
    assert_eq!(app.panels.timeline.target, expected);
    assert_eq!(app.panels.ip_info.profile, None);
    assert_eq!(app.selection.profile.as_deref(), Some("1.2.3.4"));
    assert_eq!(app.selection.timewindow.as_deref(), Some("timewindow1"));
    assert!(app.select_error.is_none());
}

// Enter on a profile routes to IP info only.
#[tokio::test]
async fn enter_on_profile_routes_ip_info() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;
    app.on_key(key(KeyCode::Char('G')));
    app.select_current();
    assert_eq!(app.panels.ip_info.profile.as_deref(), Some("10.0.0.1"));
    assert_eq!(app.panels.evidence.target, None);
    assert_eq!(app.selection.timewindow, None);
}

// Tab on a timewindow folds its profile and moves the cursor onto it.
#[tokio::test]
async fn toggle_from_timewindow_folds_parent() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;
    app.on_key(key(KeyCode::Tab));
    app.on_key(key(KeyCode::Char('j')));
    app.on_key(key(KeyCode::Char('j')));
    assert_eq!(app.cursor.pos(), 2);

    assert_eq!(app.on_key(key(KeyCode::Char(' '))), KeyResult::Redraw);
    assert_eq!(row_keys(&app), vec!["1.2.3.4", "10.0.0.1"]);
    assert_eq!(app.cursor.pos(), 0);
    assert_eq!(app.cursor.len(), 2);
}

// Profiles without children cannot be expanded.
#[tokio::test]
async fn childless_profile_does_not_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, r#"{"profiles": {"a": {"timewindows": []}}}"#);
    let mut app = App::new(path, AssemblerConfig::default());
    app.refresh_now().await;
    assert_eq!(app.on_key(key(KeyCode::Tab)), KeyResult::None);
}

// Collapse-all hides every timewindow and clamps the cursor.
#[tokio::test]
async fn collapse_all_clamps_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;
    app.on_key(key(KeyCode::Tab));
    app.on_key(key(KeyCode::End));
    app.on_key(key(KeyCode::Tab));
    assert_eq!(app.visible_rows().len(), 6);

    assert_eq!(app.on_key(key(KeyCode::Char('c'))), KeyResult::Redraw);
    assert_eq!(row_keys(&app), vec!["1.2.3.4", "10.0.0.1"]);
    assert!(app.cursor.pos() < 2);
}

// Expansion and cursor row survive a refresh that shifts rows.
#[tokio::test]
async fn refresh_preserves_expansion_and_cursor_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;
    app.on_key(key(KeyCode::Tab));
    app.on_key(key(KeyCode::Char('j')));
    app.on_key(key(KeyCode::Char('j')));
    let before = app.current_selection().unwrap().key.clone();
    assert_eq!(before, "timewindow1");

    let shifted = SNAPSHOT.replace(
        r#""10.0.0.1": {"timewindows": ["timewindow1"]}"#,
        r#""10.0.0.1": {"timewindows": ["timewindow1"]}, "0.0.0.9": {"timewindows": ["timewindow5"]}"#,
    );
    write_snapshot(&app.source.clone(), &shifted);
    app.refresh_now().await;

    assert_eq!(app.state.applied_generation(), 2);
    assert_eq!(row_keys(&app)[0], "0.0.0.9");
    assert_eq!(app.cursor.pos(), 3);
    let node = app.current_selection().unwrap();
    assert_eq!(node.kind, NodeKind::Timewindow);
    assert_eq!(node.key, "timewindow1");
}

// A broken snapshot keeps the previous tree and surfaces the error.
#[tokio::test]
async fn failed_refresh_keeps_previous_tree() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir).await;
    write_snapshot(&app.source.clone(), "{ truncated");
    app.refresh_now().await;

    assert_eq!(row_keys(&app), vec!["1.2.3.4", "10.0.0.1"]);
    assert_eq!(app.state.applied_generation(), 1);
    assert!(app.state.last_error().unwrap().contains("malformed"));

    write_snapshot(&app.source.clone(), SNAPSHOT);
    app.refresh_now().await;
    assert!(app.state.last_error().is_none());
}

#[tokio::test]
async fn missing_snapshot_reports_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(dir.path().join("nope.json"), AssemblerConfig::default());
    app.refresh_now().await;
    assert!(app.state.tree().is_none());
    assert!(app.state.last_error().unwrap().contains("unavailable"));
}

// A rebuild superseded by a newer one is dropped on arrival.
#[test]
fn stale_rebuild_is_not_applied() {
    let mut app = App::new("unused.json".into(), AssemblerConfig::default());
    let old = app.state.begin_refresh();
    let new = app.state.begin_refresh();
    app.apply_refresh(
        old,
        Ok(TreeNode::root(vec![TreeNode::degraded_profile("old".into())])),
    );
    assert!(app.visible_rows().is_empty());

    app.apply_refresh(
        new,
        Ok(TreeNode::root(vec![TreeNode::degraded_profile("new".into())])),
    );
    assert_eq!(row_keys(&app), vec!["new"]);
}

// Spawned rebuilds deliver their result over the channel.
#[tokio::test]
async fn spawned_refresh_reports_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, SNAPSHOT);
    let mut app = App::new(path, AssemblerConfig::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    app.spawn_refresh(&tx);
    assert!(app.state.is_refreshing());
    let (generation, result) = rx.recv().await.unwrap();
    assert_eq!(generation, 1);
    app.apply_refresh(generation, result);
    assert!(!app.state.is_refreshing());
    assert_eq!(app.visible_rows().len(), 2);
}

// Ticks that land while a rebuild is running do not supersede it, so a
// store slower than the refresh interval still updates the tree.
#[tokio::test]
async fn slow_rebuilds_are_not_starved_by_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, SNAPSHOT);
    let mut app = App::new(path, AssemblerConfig::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    assert!(app.on_refresh_tick(&tx));
    for cycle in 1..=5u64 {
        // Another tick fires before the running rebuild reports back.
        assert!(!app.on_refresh_tick(&tx));
        assert_eq!(app.state.latest_generation(), cycle);

        let (generation, result) = rx.recv().await.unwrap();
        assert_eq!(generation, cycle);
        app.apply_refresh(generation, result);
        assert_eq!(app.state.applied_generation(), cycle);
        assert_eq!(app.visible_rows().len(), 2);

        assert!(app.on_refresh_tick(&tx));
    }
}

// An explicit refresh still supersedes a running rebuild.
#[tokio::test]
async fn forced_refresh_supersedes_running_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, SNAPSHOT);
    let mut app = App::new(path, AssemblerConfig::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    assert!(app.on_refresh_tick(&tx));
    app.spawn_refresh(&tx);
    assert_eq!(app.state.latest_generation(), 2);

    let mut results = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
    results.sort_by_key(|(generation, _)| *generation);
    for (generation, result) in results {
        app.apply_refresh(generation, result);
    }
    assert_eq!(app.state.applied_generation(), 2);
    assert!(!app.state.is_refreshing());
}

#[test]
fn quit_keys() {
    for event in [
        key(KeyCode::Char('q')),
        key(KeyCode::Esc),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let mut app = App::new("unused.json".into(), AssemblerConfig::default());
        assert_eq!(app.on_key(event), KeyResult::None);
        assert!(app.should_quit);
    }
}

#[test]
fn r_requests_refresh() {
    let mut app = App::new("unused.json".into(), AssemblerConfig::default());
    assert_eq!(app.on_key(key(KeyCode::Char('r'))), KeyResult::NeedsRefresh);
    assert!(!app.should_quit);
}

#[test]
fn args_map_to_assembler_config() {
    let args = Args::parse_from([
        "profile-tree-tui",
        "--snapshot",
        "s.json",
        "--max-in-flight",
        "4",
        "--query-timeout-ms",
        "0",
        "--refresh-ms",
        "1500",
    ]);
    let config = args.assembler_config();
    assert_eq!(config.max_in_flight, 4);
    assert_eq!(config.query_timeout, None);
    assert_eq!(args.refresh_interval_label(), "1500ms");

    let args = Args::parse_from(["profile-tree-tui", "-s", "s.json"]);
    assert_eq!(
        args.assembler_config(),
        AssemblerConfig::default()
    );
    assert_eq!(args.refresh_interval_label(), "5s");
}
