// Clipsync - E-Reader Clippings to Git
// Copyright (C) 2026 Clipsync Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Shared output formatting for CLI commands.
//!
//! Console output for the one-shot commands; the long-running watcher
//! reports through tracing and desktop notifications instead.

use console::style;

/// Print a success message with a green marker
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message with a yellow marker
pub fn warning(msg: &str) {
    println!("{} {}", style("!").yellow().bold(), msg);
}

/// Print an informational message
pub fn info(msg: &str) {
    println!("{} {}", style("·").dim(), msg);
}

/// Print an indented key-value detail line
pub fn detail(key: &str, value: &str) {
    println!("  {} {}", style(format!("{}:", key)).dim(), value);
}
