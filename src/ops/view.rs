use std::fmt;

use crate::model::store::Store;
use crate::model::task::TaskLine;

/// Which lines a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Open tasks, inbox items excluded
    Actionable,
    /// Open tasks, inbox items included
    All,
    /// Completed tasks only, most recent first
    CompletedOnly,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Actionable => write!(f, "actionable"),
            ViewMode::All => write!(f, "all"),
            ViewMode::CompletedOnly => write!(f, "completed"),
        }
    }
}

/// One visible task: its user-facing number, its physical line, and the
/// parsed task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    /// 1-based number shown to the user
    pub index: usize,
    /// 0-based physical line in the store
    pub line: usize,
    pub task: TaskLine,
}

/// Error type for view lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("no task {index} in the {mode} view ({len} shown); list again to see current numbers")]
    NotFound {
        index: usize,
        len: usize,
        mode: ViewMode,
    },
}

/// Ordered, numbered list of visible tasks derived from one store snapshot.
/// Never persisted; rebuild it for every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayList {
    mode: ViewMode,
    entries: Vec<DisplayEntry>,
}

/// Compute the display order for `mode`.
///
/// Open views: prioritized tasks by letter (stable, so equal priorities keep
/// file order), then unprioritized tasks in file order. Completed view: by
/// completion date descending, later lines first on ties, undated last.
pub fn build_view(store: &Store, mode: ViewMode) -> DisplayList {
    let mut candidates: Vec<(usize, TaskLine)> = store
        .tasks()
        .into_iter()
        .filter(|(_, task)| match mode {
            ViewMode::CompletedOnly => task.completed,
            ViewMode::All => !task.completed,
            ViewMode::Actionable => !task.completed && !task.inbox,
        })
        .collect();

    match mode {
        ViewMode::CompletedOnly => {
            candidates.sort_by(|(a_line, a), (b_line, b)| {
                b.completion_date
                    .cmp(&a.completion_date)
                    .then(b_line.cmp(a_line))
            });
        }
        ViewMode::Actionable | ViewMode::All => {
            let (mut prioritized, unprioritized): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .partition(|(_, task)| task.priority.is_some());
            prioritized.sort_by_key(|(_, task)| task.priority);
            candidates = prioritized;
            candidates.extend(unprioritized);
        }
    }

    let entries: Vec<DisplayEntry> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, (line, task))| DisplayEntry {
            index: i + 1,
            line,
            task,
        })
        .collect();

    tracing::debug!(%mode, count = entries.len(), "built view");
    DisplayList { mode, entries }
}

impl DisplayList {
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&DisplayEntry> {
        self.entries.first()
    }

    /// Look up the entry shown as number `n`
    pub fn get(&self, n: usize) -> Result<&DisplayEntry, ViewError> {
        self.entries
            .iter()
            .find(|e| n > 0 && e.index == n)
            .ok_or(ViewError::NotFound {
                index: n,
                len: self.entries.len(),
                mode: self.mode,
            })
    }

    /// Map a display number to its physical line
    pub fn resolve(&self, n: usize) -> Result<usize, ViewError> {
        self.get(n).map(|e| e.line)
    }

    /// Map a physical line back to its display number, if visible
    pub fn position_of(&self, line: usize) -> Option<usize> {
        self.entries.iter().find(|e| e.line == line).map(|e| e.index)
    }

    /// Restrict to matching entries and renumber them 1..k
    pub fn scoped(&self, pred: impl Fn(&TaskLine) -> bool) -> DisplayList {
        let entries = self
            .entries
            .iter()
            .filter(|e| pred(&e.task))
            .enumerate()
            .map(|(i, e)| DisplayEntry {
                index: i + 1,
                ..e.clone()
            })
            .collect();
        DisplayList {
            mode: self.mode,
            entries,
        }
    }

    /// Restrict to matching entries, keeping their original numbers so they
    /// still resolve against the unfiltered view
    pub fn filtered(&self, pred: impl Fn(&TaskLine) -> bool) -> DisplayList {
        DisplayList {
            mode: self.mode,
            entries: self
                .entries
                .iter()
                .filter(|e| pred(&e.task))
                .cloned()
                .collect(),
        }
    }
}
