use std::io;

use chrono::NaiveDate;

use crate::io::store_io::{StoreError, TodoStore};
use crate::model::store::Store;
use crate::model::task::TaskLine;
use crate::ops::due::resolve_due;
use crate::ops::task_ops::{self, TaskError, TaskFields};
use crate::ops::view::{DisplayEntry, DisplayList, ViewError, ViewMode, build_view};
use crate::parse::serialize_line;

/// Line-oriented interaction the inbox review needs from its caller
pub trait Prompter {
    /// Show `question` and read one answer, without its newline.
    /// `Ok(None)` means the input ended.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
    /// Show an informational line
    fn say(&mut self, message: &str);
    /// Show a non-fatal warning
    fn warn(&mut self, message: &str);
}

/// Error type for inbox operations
#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("could not read input: {0}")]
    Input(#[from] io::Error),
}

/// What the user chose for the item under review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Actionable,
    Delete,
    Skip,
    Quit,
}

impl Decision {
    pub fn parse(answer: &str) -> Option<Decision> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "a" | "actionable" => Some(Decision::Actionable),
            "d" | "delete" => Some(Decision::Delete),
            "s" | "skip" => Some(Decision::Skip),
            "q" | "quit" => Some(Decision::Quit),
            _ => None,
        }
    }
}

/// Result of reviewing one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Replaced by this actionable task at the end of the file
    Actionable(TaskLine),
    Deleted,
    /// Re-captured at the end of the file with today's date
    Skipped,
    /// Left exactly as it was
    Untouched,
    Quit,
}

/// Counts from a full review pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub actionable: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub quit: bool,
}

/// Inbox items in display order, numbered 1..k
pub fn inbox_view(store: &Store) -> DisplayList {
    build_view(store, ViewMode::All).scoped(|task| task.inbox)
}

/// Capture `text` as a new inbox item dated `today`
pub fn capture(store: &TodoStore, text: &str, today: NaiveDate) -> Result<TaskLine, InboxError> {
    let task = task_ops::capture(text, today)?;
    store.append(&serialize_line(&task))?;
    tracing::info!(text = %task.description, "captured inbox item");
    Ok(task)
}

/// Review the inbox front to back.
///
/// The inbox is re-read before every item and the first remaining item is
/// always the one shown, since each transition moves or removes lines. A pass
/// covers at most as many items as the inbox held when it started, so
/// skipping everything ends the pass instead of cycling.
pub fn review_all(
    store: &TodoStore,
    prompter: &mut dyn Prompter,
    today: NaiveDate,
) -> Result<ReviewSummary, InboxError> {
    let mut summary = ReviewSummary::default();
    let initial = inbox_view(&store.load()?).len();
    if initial == 0 {
        prompter.say("inbox is empty");
        return Ok(summary);
    }

    for _ in 0..initial {
        let snapshot = store.load()?;
        let inbox = inbox_view(&snapshot);
        let Some(entry) = inbox.first() else {
            break;
        };
        prompter.say(&format!("({} left) {}", inbox.len(), entry.task.display_text()));

        let mut decision = loop {
            match prompter.ask("[a]ctionable, [d]elete, [s]kip, [q]uit? ")? {
                None => break Decision::Quit,
                Some(answer) => match Decision::parse(&answer) {
                    Some(decision) => break decision,
                    None => prompter.warn("answer a, d, s or q"),
                },
            }
        };
        if decision == Decision::Actionable && !has_text(&entry.task) {
            prompter.warn("item has no text to act on; skipping it");
            decision = Decision::Skip;
        }

        match apply(store, &snapshot, entry, decision, prompter, today)? {
            Outcome::Actionable(_) => summary.actionable += 1,
            Outcome::Deleted => summary.deleted += 1,
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Untouched => {}
            Outcome::Quit => {
                summary.quit = true;
                break;
            }
        }
    }

    if !summary.quit && inbox_view(&store.load()?).is_empty() {
        prompter.say("inbox is empty");
    }
    Ok(summary)
}

/// Review the single inbox item numbered `n`. Only actionable and delete are
/// offered; any other answer leaves the item alone.
pub fn review_one(
    store: &TodoStore,
    n: usize,
    prompter: &mut dyn Prompter,
    today: NaiveDate,
) -> Result<Outcome, InboxError> {
    let snapshot = store.load()?;
    let inbox = inbox_view(&snapshot);
    let entry = inbox.get(n)?;
    prompter.say(&format!("{}. {}", entry.index, entry.task.display_text()));

    let answer = prompter.ask("[a]ctionable, [d]elete, anything else to leave it? ")?;
    let decision = match answer.as_deref().and_then(Decision::parse) {
        Some(Decision::Actionable) if !has_text(&entry.task) => {
            prompter.warn("item has no text to act on; leaving it");
            return Ok(Outcome::Untouched);
        }
        Some(Decision::Actionable) => Decision::Actionable,
        Some(Decision::Delete) => Decision::Delete,
        _ => return Ok(Outcome::Untouched),
    };
    apply(store, &snapshot, entry, decision, prompter, today)
}

/// Whether anything besides the inbox marker is left to turn into a task
fn has_text(task: &TaskLine) -> bool {
    !task.display_text().trim().is_empty()
}

/// Carry out one decision. Prompts run first; the lock is only held for the
/// final edit, which checks the line is still what was shown.
fn apply(
    store: &TodoStore,
    snapshot: &Store,
    entry: &DisplayEntry,
    decision: Decision,
    prompter: &mut dyn Prompter,
    today: NaiveDate,
) -> Result<Outcome, InboxError> {
    let raw = &snapshot.lines[entry.line];
    match decision {
        Decision::Actionable => {
            let Some(fields) = collect_fields(prompter, today)? else {
                return Ok(Outcome::Quit);
            };
            let task = task_ops::build_task(&entry.task.description, &fields, today)?;
            let mut txn = store.begin()?;
            txn.expect_line(entry.line, raw)?;
            txn.delete_line(entry.line)?;
            txn.append(&serialize_line(&task));
            txn.commit()?;
            tracing::info!(line = entry.line, "inbox item made actionable");
            Ok(Outcome::Actionable(task))
        }
        Decision::Delete => {
            store.delete_line(entry.line, raw)?;
            tracing::info!(line = entry.line, "inbox item deleted");
            Ok(Outcome::Deleted)
        }
        Decision::Skip => {
            let again = task_ops::requeue(&entry.task, today);
            let mut txn = store.begin()?;
            txn.expect_line(entry.line, raw)?;
            txn.delete_line(entry.line)?;
            txn.append(&serialize_line(&again));
            txn.commit()?;
            tracing::info!(line = entry.line, "inbox item requeued");
            Ok(Outcome::Skipped)
        }
        Decision::Quit => Ok(Outcome::Quit),
    }
}

/// Ask for priority, project, context and due date. Bad answers are warned
/// about and dropped. `None` if the input ends part way.
fn collect_fields(
    prompter: &mut dyn Prompter,
    today: NaiveDate,
) -> Result<Option<TaskFields>, InboxError> {
    let mut fields = TaskFields::default();

    let Some(answer) = prompter.ask("priority (A-Z, blank for none): ")? else {
        return Ok(None);
    };
    match task_ops::parse_priority_input(&answer) {
        Ok(priority) => fields.priority = priority,
        Err(e) => prompter.warn(&format!("{}; no priority set", e)),
    }

    let Some(answer) = prompter.ask("project (blank for none): ")? else {
        return Ok(None);
    };
    match task_ops::parse_tag_input(&answer, '+') {
        Ok(project) => fields.project = project,
        Err(e) => prompter.warn(&format!("{}; no project set", e)),
    }

    let Some(answer) = prompter.ask("context (blank for none): ")? else {
        return Ok(None);
    };
    match task_ops::parse_tag_input(&answer, '@') {
        Ok(context) => fields.context = context,
        Err(e) => prompter.warn(&format!("{}; no context set", e)),
    }

    let Some(answer) = prompter.ask("due (YYYY-MM-DD, weekday, today, tomorrow; blank for none): ")?
    else {
        return Ok(None);
    };
    if !answer.trim().is_empty() {
        match resolve_due(&answer, today) {
            Ok(date) => fields.due = Some(date),
            Err(e) => prompter.warn(&format!("{}; no due date set", e)),
        }
    }

    Ok(Some(fields))
}
