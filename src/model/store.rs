use crate::model::task::TaskLine;
use crate::parse::parse_line;

/// The whole todo file as an ordered list of raw physical lines.
///
/// Lines are kept exactly as read (including a trailing `\r` on CRLF files)
/// so that untouched lines are written back byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub lines: Vec<String>,
}

impl Store {
    /// Split file contents into physical lines. A final newline does not
    /// produce a trailing empty line.
    pub fn from_content(content: &str) -> Self {
        if content.is_empty() {
            return Store::default();
        }
        let body = content.strip_suffix('\n').unwrap_or(content);
        Store {
            lines: body.split('\n').map(|l| l.to_string()).collect(),
        }
    }

    /// Join lines back into file contents, newline-terminated
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Parse every non-blank line, paired with its physical index (0-based)
    pub fn tasks(&self) -> Vec<(usize, TaskLine)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| (idx, parse_line(line)))
            .collect()
    }
}
