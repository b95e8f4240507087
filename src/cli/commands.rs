use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "tdx",
    about = concat!("tdx v", env!("CARGO_PKG_VERSION"), " - todo.txt with an inbox"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text to capture into the inbox (no subcommand)
    pub text: Vec<String>,

    /// Use this todo file instead of the configured one
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List inbox items, or capture a new one
    Inbox(InboxArgs),
    /// List open tasks (add `all` to include the inbox)
    List(ListArgs),
    /// Add an actionable task
    Add(AddArgs),
    /// Show completed tasks, or complete one by number
    Done(DoneArgs),
    /// Delete a task by number
    Xx(DeleteArgs),
    /// Review inbox items, or one item by number
    Process(ProcessArgs),
    /// Show tasks with a due date
    Due(DueArgs),
    /// Show or set the todo file location
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InboxArgs {
    /// Text to capture (if omitted, lists inbox items)
    pub text: Vec<String>,
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// `all`, `+project` and/or `@context`
    pub filters: Vec<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    #[arg(required = true)]
    pub text: Vec<String>,
    /// Priority letter A-Z
    #[arg(short = 'p', long)]
    pub priority: Option<String>,
    /// Project tag (with or without `+`)
    #[arg(long)]
    pub project: Option<String>,
    /// Context tag (with or without `@`)
    #[arg(long)]
    pub context: Option<String>,
    /// Due date: YYYY-MM-DD, a weekday, today or tomorrow
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task number to complete (if omitted, lists completed tasks)
    pub number: Option<String>,
    /// Number comes from `list all` instead of `list`
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task number to delete
    pub number: String,
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
    /// Number comes from `list all` instead of `list`
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Inbox item number (if omitted, reviews the whole inbox)
    pub number: Option<String>,
}

#[derive(Args)]
pub struct DueArgs {
    /// Limit to tasks due today or already overdue
    #[arg(value_enum)]
    pub scope: Option<DueScope>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DueScope {
    Today,
    Overdue,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Todo file path to save (if omitted, shows the current one)
    pub path: Option<String>,
}
