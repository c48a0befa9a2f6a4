/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Interactive TUI for browsing profile/timewindow snapshots.
//!
//! Loads a JSON snapshot of the profile store, assembles it into the
//! profile tree, and shows it as a navigable list. Pressing Enter on a
//! row routes the selection to the IP-info, timeline and evidence
//! panes on the right.
//!
//! Invariants:
//! - **Background rebuilds**: every refresh (interval tick or `r`) is
//!   a spawned task that re-reads the snapshot. Results come back over
//!   a channel tagged with their generation; only the latest
//!   generation is applied.
//! - **Failed refreshes are non-destructive**: a rebuild error is shown
//!   in the header and the previous tree stays on screen.
//! - **Expansion survives refresh**: profiles the user opened stay
//!   open; the cursor stays on the same row when it still exists.
//! - **Cursor laws**: `Cursor` keeps `pos < len` (or `pos == 0` when
//!   empty) across every mutation.
//! - **Markup never reaches the screen**: labels are drawn with their
//!   highlight escapes stripped; blocked nodes are colored instead.
//! - **Logs go to a file**: the terminal belongs to the UI, so the
//!   tracing subscriber writes to `--log-file`.
//!
//! ```bash
//! profile_tree_tui --snapshot snapshot.json --refresh-ms 2000
//! RUST_LOG=profile_tree=debug profile_tree_tui -s snapshot.json
//! ```

mod actions;
mod app;
mod cursor;
mod panels;
mod render;
mod theme;

use std::fs::OpenOptions;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub(crate) use actions::*;
use anyhow::Context;
pub(crate) use app::*;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
pub(crate) use cursor::*;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
pub(crate) use panels::*;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
pub(crate) use theme::*;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber, writing to `path`.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {}", e))
}

/// Put the terminal into "TUI mode".
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal back to normal "shell mode".
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !io::stdout().is_terminal() {
        eprintln!("This TUI requires a real terminal.");
        return Ok(());
    }

    init_logging(&args.log_file)?;
    tracing::info!(
        snapshot = %args.snapshot.display(),
        refresh_ms = args.refresh_ms,
        max_in_flight = args.max_in_flight,
        query_timeout_ms = args.query_timeout_ms,
        "starting profile tree tui"
    );

    // Spinner on stderr while the first tree is assembled; runs before
    // the alternate screen so it shows as a normal terminal line.
    let mut app = App::new(args.snapshot.clone(), args.assembler_config());
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("profile-tree: loading {} ...", app.source.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    app.refresh_now().await;
    spinner.finish_and_clear();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &args, app).await;
    restore_terminal(&mut terminal)?;
    result?;
    Ok(())
}

#[cfg(test)]
mod tests;
