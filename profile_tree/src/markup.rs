/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Highlight markup for blocked labels.
//!
//! Labels handed to the renderer use ANSI SGR escapes for emphasis,
//! the same shape a terminal color library produces: `ESC[31m` to open
//! red and `ESC[39m` to reset the foreground. Recovery of raw
//! identifiers goes through [`strip_markup`], which runs the text
//! through a `vte` parser and keeps only printable characters, so any
//! escape sequence (CSI, OSC, DCS, plain ESC) is removed, not only the
//! ones produced here.

use vte::Parser;
use vte::Perform;

const ESC: char = '\u{1b}';
const RED_OPEN: &str = "\u{1b}[31m";
const FG_CLOSE: &str = "\u{1b}[39m";

/// Wrap `text` in red highlight markup.
pub fn highlight(text: &str) -> String {
    format!("{RED_OPEN}{text}{FG_CLOSE}")
}

/// Returns true if `text` was produced by [`highlight`].
pub fn is_highlighted(text: &str) -> bool {
    text.starts_with(RED_OPEN) && text.ends_with(FG_CLOSE)
}

/// Collects the printable characters the parser dispatches; every
/// other callback keeps its no-op default.
struct PrintCollector {
    out: String,
}

impl Perform for PrintCollector {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }
}

/// Remove every ANSI escape sequence from `text`.
///
/// C0 controls are dropped along with the sequences. An unterminated
/// sequence at the end of the input is dropped.
pub fn strip_markup(text: &str) -> String {
    if !text.contains(ESC) && !text.chars().any(|c| c.is_control()) {
        return text.to_string();
    }
    let mut collector = PrintCollector {
        out: String::with_capacity(text.len()),
    };
    let mut parser = Parser::new();
    parser.advance(&mut collector, text.as_bytes());
    collector.out
}
