//! Append-only log channels for benchmark output.
//!
//! The harness reports through a [`LogSink`] rather than printing directly,
//! so a host can render the cumulative buffer however it likes (terminal,
//! UI panel, test assertion). Lines carry a semantic emphasis tag instead of
//! any concrete styling.

use std::sync::Mutex;

/// Semantic emphasis of a log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Ordinary informational line.
    #[default]
    Info,
    /// Start-of-run and total-duration lines.
    Highlight,
    /// Per-worker detail lines.
    Detail,
}

/// One appended line of benchmark output. Timestamp-free by design: ordering
/// within a channel is the only temporal information a line carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// The line text, without trailing newline.
    pub text: String,
    /// Semantic emphasis tag.
    pub emphasis: Emphasis,
}

/// An append-only sink for benchmark output. One sink per logical channel
/// (CPU, GPU). Lines are never mutated or removed once appended.
pub trait LogSink: Send + Sync {
    /// Append one line with the given emphasis.
    fn append(&self, text: &str, emphasis: Emphasis);
}

/// In-memory append-only buffer backing a console-style display.
///
/// Hosts poll [`ConsoleBuffer::lines_from`] with a cursor to render only the
/// lines appended since the previous frame.
#[derive(Debug, Default)]
pub struct ConsoleBuffer {
    lines: Mutex<Vec<LogLine>>,
}

impl ConsoleBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines appended so far.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    /// Returns true if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone of all lines at index `from` and later.
    pub fn lines_from(&self, from: usize) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap();
        lines.get(from..).map(<[LogLine]>::to_vec).unwrap_or_default()
    }

    /// Clone of the full buffer.
    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for ConsoleBuffer {
    fn append(&self, text: &str, emphasis: Emphasis) {
        let mut lines = self.lines.lock().unwrap();
        lines.push(LogLine {
            text: text.to_owned(),
            emphasis,
        });
    }
}
