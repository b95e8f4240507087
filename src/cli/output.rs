use std::io::stdout;

use chrono::NaiveDate;
use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;
use serde::Serialize;

use crate::model::task::{TaskLine, format_date};
use crate::ops::view::DisplayEntry;
use crate::parse::serialize_line;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson<'a> {
    /// Number to pass to `done`, `xx` or `process`
    pub number: usize,
    /// 1-based line in the todo file
    pub line: usize,
    #[serde(flatten)]
    pub task: &'a TaskLine,
}

#[derive(Serialize)]
pub struct ConfigJson {
    pub todo_file: String,
    pub source: String,
    pub config_file: String,
}

pub fn entries_to_json<'a>(entries: impl IntoIterator<Item = &'a DisplayEntry>) -> Vec<EntryJson<'a>> {
    entries
        .into_iter()
        .map(|entry| EntryJson {
            number: entry.index,
            line: entry.line + 1,
            task: &entry.task,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Renders task rows, with ANSI colors when they are wanted
pub struct Painter {
    color: bool,
}

impl Painter {
    /// Color only on a terminal, and never with `--no-color` or `NO_COLOR`
    pub fn new(no_color: bool) -> Self {
        let color = !no_color && std::env::var_os("NO_COLOR").is_none() && stdout().is_tty();
        Painter { color }
    }

    pub fn plain() -> Self {
        Painter { color: false }
    }

    /// `  3 (A) 2024-01-10 pay rent due:2024-01-31`
    pub fn task_row(&self, entry: &DisplayEntry, today: NaiveDate) -> String {
        self.row(entry.index, serialize_line(&entry.task), row_color(&entry.task, today))
    }

    /// Inbox rows hide the marker: `  1 2024-01-10 call plumber`
    pub fn inbox_row(&self, entry: &DisplayEntry) -> String {
        let text = match entry.task.creation_date {
            Some(date) => format!("{} {}", format_date(date), entry.task.display_text()),
            None => entry.task.display_text(),
        };
        self.row(entry.index, text, Some(Color::DarkGrey))
    }

    fn row(&self, number: usize, text: String, color: Option<Color>) -> String {
        let number = format!("{:>3}", number);
        if !self.color {
            return format!("{} {}", number, text);
        }
        match color {
            Some(color) => format!("{} {}", number.dark_grey(), text.with(color)),
            None => format!("{} {}", number.dark_grey(), text),
        }
    }
}

fn row_color(task: &TaskLine, today: NaiveDate) -> Option<Color> {
    if task.completed || task.inbox {
        return Some(Color::DarkGrey);
    }
    if task.due.is_some_and(|due| due < today) {
        return Some(Color::Red);
    }
    match task.priority.map(|p| p.letter()) {
        Some('A') => Some(Color::Red),
        Some('B') => Some(Color::Yellow),
        Some('C') => Some(Color::Green),
        _ => None,
    }
}
