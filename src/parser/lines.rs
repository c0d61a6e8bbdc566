//! Line queue with one-line push-back for the legacy table parser.
//!
//! Lines are consumed strictly front to back. A line that belongs to the
//! next parsing phase can be pushed back once and is returned unchanged by
//! the following [`LineQueue::pop`].

use crate::constants::COMMENT_MARKER;

/// Cursor over the lines of a decoded table
#[derive(Debug)]
pub struct LineQueue<'a> {
    lines: Vec<&'a str>,
    position: usize,
    pushed_back: Option<&'a str>,
    truncate_final_character: bool,
}

impl<'a> LineQueue<'a> {
    /// Split `text` into lines, keeping each line's terminator until normalization
    pub fn new(text: &'a str, truncate_final_character: bool) -> Self {
        Self {
            lines: text.split_inclusive('\n').collect(),
            position: 0,
            pushed_back: None,
            truncate_final_character,
        }
    }

    /// Pop the next line, normalized
    ///
    /// A pushed-back line is returned as it was pushed, without normalizing again.
    pub fn pop(&mut self) -> Option<&'a str> {
        if let Some(line) = self.pushed_back.take() {
            return Some(line);
        }

        let raw = *self.lines.get(self.position)?;
        self.position += 1;
        Some(self.normalize(raw))
    }

    /// Return a line to the front of the queue
    pub fn push_back(&mut self, line: &'a str) {
        debug_assert!(self.pushed_back.is_none(), "only one line of push-back");
        self.pushed_back = Some(line);
    }

    fn normalize(&self, raw: &'a str) -> &'a str {
        let without_terminator = if self.truncate_final_character {
            let mut chars = raw.chars();
            chars.next_back();
            chars.as_str()
        } else {
            raw.strip_suffix('\n').unwrap_or(raw)
        };
        without_terminator.trim()
    }
}

/// Empty lines and `!` comment lines carry no table content
pub fn is_ignorable(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_MARKER)
}
