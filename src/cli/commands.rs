use chrono::NaiveDate;
use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "weekload",
    version = VERSION,
    about = "Weekly workload planning for a small team",
    after_help = "\
NOTE:
  Data lives in ./.weekload/, discovered by walking up from the current
  directory. Run `weekload init` before any other command.
  Workload is counted in half-day units: 2 units = 1 day.
  Week numbers are ISO weeks in 1..52 (week 53 is not modeled).

EXIT CODES:
  0  Success
  1  Error (store, validation, not found, unauthorized)

BEHAVIOR NOTES:
  `week reset` duplicates tasks when run twice for the same week pair;
  it refuses a non-empty destination week unless --force is given.
  `week check` is the self-guarding variant meant for startup/cron.
  Resource and client mutations require the admin role set at init."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize weekload in this directory
    Init {
        /// Caller role: admin may manage resources and clients
        #[arg(long, default_value = "admin")]
        role: String,
    },

    /// Resource (team member) management
    #[command(subcommand)]
    Resource(ResourceCommands),

    /// Client management
    #[command(subcommand)]
    Client(ClientCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Weekly views and rollover
    #[command(subcommand)]
    Week(WeekCommands),

    /// Annual aggregation views
    #[command(subcommand)]
    Annual(AnnualCommands),

    /// Interactive weekly board with undo/redo
    #[command(after_help = "\
BOARD COMMANDS:
  list | add <name> -r <id> -c <id> | edit <id> <name>
  done <id> | reopen <id> | log <id> <+n|-n> | del <id>
  totals | next | prev
  undo | u          revert the last board mutation
  redo | r          replay an undone mutation
  help | quit
  Undo history is per session and capped at 50 entries.")]
    Board {
        /// Week number (defaults to the current week)
        #[arg(long)]
        week: Option<u32>,
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    /// Add a team member (admin)
    Add {
        name: String,
        #[arg(long)]
        color: String,
        #[arg(long)]
        photo_url: Option<String>,
        /// Hide from the weekly dashboard
        #[arg(long)]
        no_dashboard: bool,
    },
    /// List resources
    List,
    /// Show or hide a resource on the dashboard (admin)
    Dashboard {
        id: i64,
        #[arg(value_parser = clap::value_parser!(bool), action = clap::ArgAction::Set)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a client (admin)
    Add {
        name: String,
        #[arg(long, default_value = "#808080")]
        color: String,
    },
    /// List clients (active only unless --all)
    List {
        #[arg(long)]
        all: bool,
    },
    /// Activate or deactivate a client (admin)
    Active {
        id: i64,
        #[arg(value_parser = clap::value_parser!(bool), action = clap::ArgAction::Set)]
        is_active: bool,
    },
    /// Change a client's color (admin)
    Color { id: i64, color: String },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a weekly board
    Add {
        name: String,
        #[arg(short, long)]
        resource: i64,
        #[arg(short, long)]
        client: i64,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Logged workload in half-day units
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        workload: i64,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        estimated_days: i64,
        /// oneshot or recurring
        #[arg(long = "type", default_value = "oneshot")]
        task_type: String,
        /// Week number (defaults to the current week)
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// List tasks of a weekly board
    List {
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show task details
    Show { id: i64 },
    /// Update task fields (only supplied flags change)
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        resource: Option<i64>,
        #[arg(long)]
        client: Option<i64>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
        #[arg(long, allow_negative_numbers = true)]
        workload: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        estimated_days: Option<i64>,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        archived: Option<bool>,
    },
    /// Mark a task completed
    Done { id: i64 },
    /// Reopen a completed task
    Reopen { id: i64 },
    /// Delete a task (unknown ids are an error)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum WeekCommands {
    /// Per-resource workload totals for a week
    Totals {
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Estimated vs. actual days for a week
    Kpis {
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Copy open tasks from one week into another (workload reset)
    Reset {
        #[arg(long)]
        from_week: u32,
        #[arg(long)]
        from_year: i32,
        #[arg(long)]
        to_week: u32,
        #[arg(long)]
        to_year: i32,
        /// Proceed even if the destination week already has tasks
        #[arg(long)]
        force: bool,
    },
    /// Auto-rollover into the current week if it is empty (startup/cron)
    Check,
}

#[derive(Subcommand)]
pub enum AnnualCommands {
    /// Annual workload per client, bucketed by month
    ByClient {
        #[arg(long)]
        year: i32,
        /// Include clients with no workload
        #[arg(long)]
        all: bool,
    },
    /// Annual workload and estimates per resource, bucketed by month
    ByResource {
        #[arg(long)]
        year: i32,
    },
}
