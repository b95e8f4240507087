use std::path::Path;

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::prompt::StdinPrompter;
use crate::io::config_io::{self, ResolvedPath};
use crate::io::store_io::TodoStore;
use crate::model::task::TaskLine;
use crate::ops::due::resolve_due;
use crate::ops::inbox_ops::{self, Outcome};
use crate::ops::task_ops::{self, TaskFields};
use crate::ops::view::{DisplayEntry, DisplayList, ViewMode, build_view};
use crate::parse::serialize_line;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs, resolved once per invocation
struct Context {
    store: TodoStore,
    painter: Painter,
    json: bool,
    today: NaiveDate,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config_file = config_io::config_path();
    let config = config_io::read_config_from(&config_file)?;
    let resolved = config_io::resolve_todo_path(cli.file.as_deref(), &config, &config_file);
    tracing::debug!(
        path = %resolved.path.display(),
        source = %resolved.source,
        "resolved todo file"
    );

    let ctx = Context {
        store: TodoStore::new(&resolved.path),
        painter: Painter::new(cli.no_color),
        json: cli.json,
        today: today(),
    };

    match cli.command {
        None if cli.text.is_empty() => cmd_list(&ctx, ListArgs::default()),
        None => cmd_capture(&ctx, &cli.text.join(" ")),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Inbox(args) => {
                if args.text.is_empty() {
                    cmd_inbox_list(&ctx)
                } else {
                    cmd_capture(&ctx, &args.text.join(" "))
                }
            }
            Commands::List(args) => cmd_list(&ctx, args),
            Commands::Due(args) => cmd_due(&ctx, args),
            Commands::Done(DoneArgs { number: None, .. }) => cmd_done_list(&ctx),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Done(DoneArgs {
                number: Some(number),
                all,
            }) => cmd_done(&ctx, &number, all),
            Commands::Xx(args) => cmd_delete(&ctx, args),
            Commands::Process(args) => cmd_process(&ctx, args),

            // Configuration
            Commands::Config(args) => cmd_config(&ctx, args, &resolved, &config_file),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn open_mode(all: bool) -> ViewMode {
    if all { ViewMode::All } else { ViewMode::Actionable }
}

fn print_rows(ctx: &Context, view: &DisplayList, empty: &str) -> CmdResult {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&entries_to_json(view.entries()))?);
        return Ok(());
    }
    if view.is_empty() {
        println!("{}", empty);
    }
    for entry in view.entries() {
        println!("{}", ctx.painter.task_row(entry, ctx.today));
    }
    Ok(())
}

/// One `all`, `+project` or `@context` word from `tdx list`
enum ListFilter {
    Project(String),
    Context(String),
}

impl ListFilter {
    fn matches(&self, task: &TaskLine) -> bool {
        match self {
            ListFilter::Project(p) => task.projects.iter().any(|t| t == p),
            ListFilter::Context(c) => task.contexts.iter().any(|t| t == c),
        }
    }
}

fn parse_list_args(words: &[String]) -> Result<(ViewMode, Vec<ListFilter>), String> {
    let mut mode = ViewMode::Actionable;
    let mut filters = Vec::new();
    for word in words {
        if word.eq_ignore_ascii_case("all") {
            mode = ViewMode::All;
        } else if let Some(p) = word.strip_prefix('+').filter(|p| !p.is_empty()) {
            filters.push(ListFilter::Project(p.to_string()));
        } else if let Some(c) = word.strip_prefix('@').filter(|c| !c.is_empty()) {
            filters.push(ListFilter::Context(c.to_string()));
        } else {
            return Err(format!(
                "unknown list filter '{}' (expected all, +project or @context)",
                word
            ));
        }
    }
    Ok((mode, filters))
}

/// Resolve a typed number against a fresh view and return the entry with the
/// raw line it was built from
fn resolve_entry(ctx: &Context, number: &str, mode: ViewMode) -> Result<(DisplayEntry, String), Box<dyn std::error::Error>> {
    let n = task_ops::parse_task_number(number)?;
    let snapshot = ctx.store.load()?;
    let view = build_view(&snapshot, mode);
    let entry = view.get(n)?.clone();
    let raw = snapshot.lines[entry.line].clone();
    Ok((entry, raw))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let (mode, filters) = parse_list_args(&args.filters)?;
    let view = build_view(&ctx.store.load()?, mode);
    let view = if filters.is_empty() {
        view
    } else {
        view.filtered(|task| filters.iter().all(|f| f.matches(task)))
    };
    print_rows(ctx, &view, "(no tasks)")
}

fn cmd_inbox_list(ctx: &Context) -> CmdResult {
    let inbox = inbox_ops::inbox_view(&ctx.store.load()?);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&entries_to_json(inbox.entries()))?);
        return Ok(());
    }
    if inbox.is_empty() {
        println!("(inbox is empty)");
    }
    for entry in inbox.entries() {
        println!("{}", ctx.painter.inbox_row(entry));
    }
    Ok(())
}

fn cmd_done_list(ctx: &Context) -> CmdResult {
    let view = build_view(&ctx.store.load()?, ViewMode::CompletedOnly);
    print_rows(ctx, &view, "(no completed tasks)")
}

/// Due tasks keep their `list` numbers, ordered by due date
fn cmd_due(ctx: &Context, args: DueArgs) -> CmdResult {
    let today = ctx.today;
    let view = build_view(&ctx.store.load()?, ViewMode::Actionable).filtered(|task| {
        match (task.due, args.scope) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(due), Some(DueScope::Today)) => due <= today,
            (Some(due), Some(DueScope::Overdue)) => due < today,
        }
    });

    let mut entries: Vec<&DisplayEntry> = view.entries().iter().collect();
    entries.sort_by_key(|e| (e.task.due, e.index));

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&entries_to_json(entries))?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("(nothing due)");
    }
    for entry in entries {
        println!("{}", ctx.painter.task_row(entry, today));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_capture(ctx: &Context, text: &str) -> CmdResult {
    let task = inbox_ops::capture(&ctx.store, text, ctx.today)?;
    println!("captured: {}", task.display_text());
    Ok(())
}

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let fields = TaskFields {
        priority: match args.priority.as_deref() {
            Some(p) => task_ops::parse_priority_input(p)?,
            None => None,
        },
        project: match args.project.as_deref() {
            Some(p) => task_ops::parse_tag_input(p, '+')?,
            None => None,
        },
        context: match args.context.as_deref() {
            Some(c) => task_ops::parse_tag_input(c, '@')?,
            None => None,
        },
        due: match args.due.as_deref() {
            Some(d) => Some(resolve_due(d, ctx.today)?),
            None => None,
        },
    };
    let task = task_ops::build_task(&args.text.join(" "), &fields, ctx.today)?;
    let line = serialize_line(&task);
    ctx.store.append(&line)?;

    let snapshot = ctx.store.load()?;
    let number = snapshot
        .lines
        .iter()
        .rposition(|l| *l == line)
        .and_then(|i| build_view(&snapshot, ViewMode::Actionable).position_of(i));
    match number {
        Some(n) => println!("added {}: {}", n, line),
        None => println!("added: {}", line),
    }
    Ok(())
}

fn cmd_done(ctx: &Context, number: &str, all: bool) -> CmdResult {
    let (entry, raw) = resolve_entry(ctx, number, open_mode(all))?;
    let done = task_ops::complete(&entry.task, ctx.today);
    let line = serialize_line(&done);
    ctx.store.replace_line(entry.line, &raw, &line)?;
    println!("completed {}: {}", entry.index, line);
    Ok(())
}

fn cmd_delete(ctx: &Context, args: DeleteArgs) -> CmdResult {
    let (entry, raw) = resolve_entry(ctx, &args.number, open_mode(args.all))?;
    if !args.yes {
        let question = format!("delete {}: {}?", entry.index, serialize_line(&entry.task));
        if !StdinPrompter::new().confirm(&question)? {
            println!("cancelled");
            return Ok(());
        }
    }
    ctx.store.delete_line(entry.line, &raw)?;
    println!("deleted {}: {}", entry.index, serialize_line(&entry.task));
    Ok(())
}

fn cmd_process(ctx: &Context, args: ProcessArgs) -> CmdResult {
    let mut prompter = StdinPrompter::new();
    match args.number {
        None => {
            let summary = inbox_ops::review_all(&ctx.store, &mut prompter, ctx.today)?;
            println!(
                "{} actionable, {} deleted, {} skipped",
                summary.actionable, summary.deleted, summary.skipped
            );
        }
        Some(number) => {
            let n = task_ops::parse_task_number(&number)?;
            match inbox_ops::review_one(&ctx.store, n, &mut prompter, ctx.today)? {
                Outcome::Actionable(task) => println!("actionable: {}", serialize_line(&task)),
                Outcome::Deleted => println!("deleted"),
                Outcome::Skipped => println!("skipped"),
                Outcome::Untouched | Outcome::Quit => println!("left in inbox"),
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn cmd_config(ctx: &Context, args: ConfigArgs, resolved: &ResolvedPath, config_file: &Path) -> CmdResult {
    if let Some(path) = args.path {
        config_io::set_todo_file(config_file, &path)?;
        println!("todo file set to {}", path);
        return Ok(());
    }

    if ctx.json {
        let json = ConfigJson {
            todo_file: resolved.path.display().to_string(),
            source: resolved.source.to_string(),
            config_file: config_file.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("todo file: {}", resolved.path.display());
        println!("from: {}", resolved.source);
        println!("config: {}", config_file.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_list_args() {
        let (mode, filters) = parse_list_args(&words(&["all", "+home", "@phone"])).unwrap();
        assert_eq!(mode, ViewMode::All);
        assert_eq!(filters.len(), 2);

        let (mode, filters) = parse_list_args(&[]).unwrap();
        assert_eq!(mode, ViewMode::Actionable);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_parse_list_args_rejects_unknown() {
        assert!(parse_list_args(&words(&["urgent"])).is_err());
        assert!(parse_list_args(&words(&["+"])).is_err());
    }

    #[test]
    fn test_list_filter_matches_whole_tags() {
        let task = crate::parse::parse_line("call mom +family @phone");
        assert!(ListFilter::Project("family".into()).matches(&task));
        assert!(!ListFilter::Project("fam".into()).matches(&task));
        assert!(ListFilter::Context("phone".into()).matches(&task));
    }
}
