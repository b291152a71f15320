//! Line cursor driving the extractor scan.
//!
//! The scan is a small state machine: after each keyword line the extractor
//! picks one of two transitions. [`Transition::ScanCurrent`] moves to the next
//! line; [`Transition::ConsumeLookahead`] also skips the following line because
//! its amount was already attributed to the current keyword.

use super::rules::LINE_BREAK;

/// How the cursor moves after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Advance one line.
    ScanCurrent,
    /// Advance two lines; the next line was consumed by a lookahead match.
    ConsumeLookahead,
}

impl Transition {
    fn step(self) -> usize {
        match self {
            Transition::ScanCurrent => 1,
            Transition::ConsumeLookahead => 2,
        }
    }
}

/// Cursor over the lines of recognized text.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    /// Split `text` on any line boundary, including a lone `\r`, form feed
    /// and the Unicode line/paragraph separators. A trailing boundary does not
    /// start an extra empty line.
    pub fn new(text: &'a str) -> Self {
        let mut lines: Vec<&'a str> = LINE_BREAK.split(text).collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }
        Self { lines, position: 0 }
    }

    /// Index of the current line.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// The line under the cursor.
    pub fn current(&self) -> Option<&'a str> {
        self.lines.get(self.position).copied()
    }

    /// The line after the current one, if any.
    pub fn peek_next(&self) -> Option<&'a str> {
        self.lines.get(self.position + 1).copied()
    }

    /// Apply a transition. Never moves past the end.
    pub fn advance(&mut self, transition: Transition) {
        self.position = (self.position + transition.step()).min(self.lines.len());
    }
}
