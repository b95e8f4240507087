use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Token marking a line as an uncaptured inbox item
pub const INBOX_MARKER: &str = "status:inbox";

/// Key prefix of the due-date token (`due:2024-01-15`)
pub const DUE_KEY: &str = "due:";

/// Date format used everywhere in the file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task priority, `A` (highest) through `Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(char);

impl Priority {
    /// Accepts a single uppercase ASCII letter
    pub fn new(c: char) -> Option<Priority> {
        c.is_ascii_uppercase().then_some(Priority(c))
    }

    /// Parse user input such as `a`, `B` or `(C)`. Lowercase is accepted here;
    /// only the on-disk `(X)` marker is strictly uppercase.
    pub fn parse(s: &str) -> Option<Priority> {
        let s = s.trim();
        let s = s
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(s);
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Priority::new(c.to_ascii_uppercase()),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// One parsed line of the todo file.
///
/// The tag fields (`projects`, `contexts`, `due`, `inbox`) are derived from
/// `description` and never stored separately; use [`TaskLine::set_description`]
/// to keep them in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLine {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDate>,
    pub description: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    pub inbox: bool,
}

impl TaskLine {
    /// Create an open, unprioritized task from a description
    pub fn new(description: impl Into<String>) -> Self {
        let mut task = TaskLine {
            completed: false,
            completion_date: None,
            priority: None,
            creation_date: None,
            description: String::new(),
            projects: Vec::new(),
            contexts: Vec::new(),
            due: None,
            inbox: false,
        };
        task.set_description(description);
        task
    }

    /// Replace the description and re-derive the tag fields from it
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        let tags = crate::parse::scan_description(&self.description);
        self.projects = tags.projects;
        self.contexts = tags.contexts;
        self.due = tags.due;
        self.inbox = tags.inbox;
    }

    /// Description with the inbox marker removed, for display
    pub fn display_text(&self) -> String {
        self.description
            .split(' ')
            .filter(|word| *word != INBOX_MARKER)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Format a date the way the file stores it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
