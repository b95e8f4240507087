use chrono::NaiveDate;

use crate::model::task::{DUE_KEY, INBOX_MARKER, Priority, TaskLine, format_date};
use crate::parse::task_parser::parse_priority_marker;

/// Error type for task input validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("invalid task number: {0} (expected a positive whole number)")]
    InvalidNumber(String),
    #[error("invalid priority: {0} (expected a letter A-Z)")]
    InvalidPriority(String),
    #[error("invalid tag: {0} (tags are a single word)")]
    InvalidTag(String),
    #[error("task text is empty")]
    EmptyDescription,
}

/// Optional fields attached when a task becomes actionable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub priority: Option<Priority>,
    pub project: Option<String>,
    pub context: Option<String>,
    pub due: Option<NaiveDate>,
}

/// Parse a user-typed display number. Zero is accepted here and rejected by
/// the view lookup, so both report the same "not found" message.
pub fn parse_task_number(input: &str) -> Result<usize, TaskError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| TaskError::InvalidNumber(input.to_string()))
}

/// Parse a priority answer; blank means none
pub fn parse_priority_input(input: &str) -> Result<Option<Priority>, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    Priority::parse(input)
        .map(Some)
        .ok_or_else(|| TaskError::InvalidPriority(input.to_string()))
}

/// Parse a project/context answer with or without its sigil; blank means none
pub fn parse_tag_input(input: &str, sigil: char) -> Result<Option<String>, TaskError> {
    let input = input.trim();
    let tag = input.strip_prefix(sigil).unwrap_or(input);
    if tag.is_empty() {
        return Ok(None);
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(TaskError::InvalidTag(input.to_string()));
    }
    Ok(Some(tag.to_string()))
}

/// Build a fresh inbox capture dated `today`
pub fn capture(text: &str, today: NaiveDate) -> Result<TaskLine, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyDescription);
    }
    let mut task = TaskLine::new(with_token(text, INBOX_MARKER));
    task.creation_date = Some(today);
    Ok(task)
}

/// Build an actionable task from `text` plus the chosen fields.
///
/// The inbox marker is dropped; tag tokens already present in `text` are not
/// repeated, and any existing due token is replaced.
pub fn build_task(text: &str, fields: &TaskFields, today: NaiveDate) -> Result<TaskLine, TaskError> {
    let mut description = without_token(text.trim(), INBOX_MARKER);
    if description.is_empty() {
        return Err(TaskError::EmptyDescription);
    }
    if let Some(project) = &fields.project {
        description = with_token(&description, &format!("+{}", project));
    }
    if let Some(context) = &fields.context {
        description = with_token(&description, &format!("@{}", context));
    }
    if let Some(due) = fields.due {
        description = with_due(&description, due);
    }

    let mut task = TaskLine::new(description);
    task.priority = fields.priority;
    task.creation_date = Some(today);
    Ok(task)
}

/// Mark a task done on `today`. The priority is dropped, along with any
/// `(X)` markers opening the description that would read back as one;
/// everything else is kept.
pub fn complete(task: &TaskLine, today: NaiveDate) -> TaskLine {
    let mut done = task.clone();
    done.completed = true;
    done.completion_date = Some(today);
    done.priority = None;

    let mut rest = done.description.as_str();
    loop {
        let (token, after) = rest.split_once(' ').unwrap_or((rest, ""));
        if parse_priority_marker(token).is_none() {
            break;
        }
        rest = after;
    }
    if rest.len() != done.description.len() {
        let rest = rest.to_string();
        done.set_description(rest);
    }
    done
}

/// Re-capture an inbox item dated `today`, keeping its text and marker
pub fn requeue(task: &TaskLine, today: NaiveDate) -> TaskLine {
    let mut again = task.clone();
    again.creation_date = Some(today);
    if !again.inbox {
        again.set_description(with_token(&again.description, INBOX_MARKER));
    }
    again
}

/// Append `token` unless the description already has it
pub fn with_token(description: &str, token: &str) -> String {
    if description.split_whitespace().any(|w| w == token) {
        return description.to_string();
    }
    if description.is_empty() {
        token.to_string()
    } else {
        format!("{} {}", description, token)
    }
}

/// Remove every occurrence of `token`, collapsing the gap it leaves
pub fn without_token(description: &str, token: &str) -> String {
    description
        .split_whitespace()
        .filter(|w| *w != token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace any `due:` token with one for `date`
pub fn with_due(description: &str, date: NaiveDate) -> String {
    let kept = description
        .split_whitespace()
        .filter(|w| !w.starts_with(DUE_KEY))
        .collect::<Vec<_>>()
        .join(" ");
    with_token(&kept, &format!("{}{}", DUE_KEY, format_date(date)))
}
