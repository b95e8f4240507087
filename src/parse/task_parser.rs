use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::task::{DATE_FORMAT, DUE_KEY, INBOX_MARKER, Priority, TaskLine};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Tag fields derived from a description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionTags {
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub due: Option<NaiveDate>,
    pub inbox: bool,
}

/// Parse one physical line into a task.
///
/// Never fails: anything that does not fit the prefix grammar
/// (`x [date] `, `(X) `, `[date] `) is left in the description.
pub fn parse_line(line: &str) -> TaskLine {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut task = TaskLine::new("");
    let mut rest = line;

    let (token, after) = split_token(rest);
    if token == "x" {
        task.completed = true;
        rest = after;
        let (token, after) = split_token(rest);
        if let Some(date) = parse_date(token) {
            task.completion_date = Some(date);
            rest = after;
        }
    }

    let (token, after) = split_token(rest);
    if let Some(priority) = parse_priority_marker(token) {
        task.priority = Some(priority);
        rest = after;
    }

    let (token, after) = split_token(rest);
    if let Some(date) = parse_date(token) {
        task.creation_date = Some(date);
        rest = after;
    }

    task.set_description(rest);
    task
}

/// Parse a strict `YYYY-MM-DD` token that is also a real calendar date
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// Extract project, context, due and inbox tokens. Tokens may appear anywhere.
pub fn scan_description(description: &str) -> DescriptionTags {
    let mut tags = DescriptionTags::default();
    for word in description.split_whitespace() {
        if word == INBOX_MARKER {
            tags.inbox = true;
        } else if let Some(project) = word.strip_prefix('+')
            && !project.is_empty()
        {
            push_unique(&mut tags.projects, project);
        } else if let Some(context) = word.strip_prefix('@')
            && !context.is_empty()
        {
            push_unique(&mut tags.contexts, context);
        } else if let Some(value) = word.strip_prefix(DUE_KEY)
            && tags.due.is_none()
        {
            tags.due = parse_date(value);
        }
    }
    tags
}

/// Split off the first space-delimited token. The separator is consumed, so
/// a token only counts as a prefix element when followed by a space or the
/// end of the line.
fn split_token(s: &str) -> (&str, &str) {
    match s.find(' ') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

/// `(A)` through `(Z)`; lowercase is not a priority on disk
pub(crate) fn parse_priority_marker(token: &str) -> Option<Priority> {
    let inner = token.strip_prefix('(')?.strip_suffix(')')?;
    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Priority::new(c),
        _ => None,
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
