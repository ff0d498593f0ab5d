// ── Bounded engine log ──

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

/// CSI escape sequences: colors, cursor movement, erase.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ANSI escape pattern is a valid regex")
});

/// Remove terminal escape sequences from a line of engine output.
pub fn strip_ansi(line: &str) -> String {
    ANSI_ESCAPE.replace_all(line, "").into_owned()
}

/// Ring buffer of the most recent log lines. Full buffers drop the oldest
/// line for every new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one line, stripped of escape sequences.
    pub fn push(&mut self, line: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(strip_ansi(line));
    }

    /// Replace the history with `lines`, keeping only the newest that fit.
    pub fn seed<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lines.clear();
        for line in lines {
            self.push(line.as_ref());
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Oldest-first copy of the retained lines.
    pub fn tail(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
