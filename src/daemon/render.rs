//! Terminal renderer for a daemon running in the foreground.

use std::io::{self, Write};

use tracing::debug;

use crate::sync::ClockRenderer;

/// Redraws the clock on a single terminal line.
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
}

impl TerminalRenderer {
    /// Creates a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClockRenderer for TerminalRenderer<W> {
    fn render(&mut self, text: &str) {
        // Trailing spaces clear leftovers when "1:00:00" shrinks to "59:59".
        let result = write!(self.out, "\r{:<8}", text).and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!("Failed to render clock: {}", e);
        }
    }
}
