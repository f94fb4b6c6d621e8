//! Out-of-band formatting metadata for a properties store.

use std::collections::HashMap;

/// Default key/value separator.
pub const DEFAULT_SEPARATOR: &str = " = ";

/// Default prefix for generated comment lines.
pub const DEFAULT_COMMENT_LEADER: &str = "# ";

/// Per-key comments and blank-line hints, plus global formatting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    comments: HashMap<String, String>,
    blank_lines: HashMap<String, usize>,
    header: Option<String>,
    separator: String,
    comment_leader: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            comments: HashMap::new(),
            blank_lines: HashMap::new(),
            header: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            comment_leader: DEFAULT_COMMENT_LEADER.to_string(),
        }
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_comment_leader(mut self, leader: impl Into<String>) -> Self {
        self.comment_leader = leader.into();
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn comment_leader(&self) -> &str {
        &self.comment_leader
    }

    pub fn set_comment(&mut self, key: impl Into<String>, comment: impl Into<String>) {
        self.comments.insert(key.into(), comment.into());
    }

    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    pub fn set_blank_lines_before(&mut self, key: impl Into<String>, count: usize) {
        let key = key.into();
        if count == 0 {
            self.blank_lines.remove(&key);
        } else {
            self.blank_lines.insert(key, count);
        }
    }

    pub fn blank_lines_before(&self, key: &str) -> usize {
        self.blank_lines.get(key).copied().unwrap_or(0)
    }

    pub fn set_header_comment(&mut self, header: Option<String>) {
        self.header = header;
    }

    pub fn header_comment(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Drop all metadata attached to `key`.
    pub fn forget(&mut self, key: &str) {
        self.comments.remove(key);
        self.blank_lines.remove(key);
    }

    /// Take per-key metadata from `other`; keys already present here keep theirs.
    pub fn absorb(&mut self, other: Layout) {
        for (key, comment) in other.comments {
            self.comments.entry(key).or_insert(comment);
        }
        for (key, count) in other.blank_lines {
            self.blank_lines.entry(key).or_insert(count);
        }
        if self.header.is_none() {
            self.header = other.header;
        }
    }
}
