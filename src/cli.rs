use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a piece of context to the backend
    Capture {
        #[arg(value_name = "CONTENT")]
        content: String,
    },
    /// Show the daily plan for a date (today if omitted)
    Plan {
        #[arg(value_name = "DATE", value_parser = parse_date)]
        date: Option<String>,
    },
    /// Show today's plan
    Today,
    /// Generate the daily plan for a date (today if omitted)
    Generate {
        #[arg(value_name = "DATE", value_parser = parse_date)]
        date: Option<String>,
    },
    /// List dates that have a plan
    Dates,
    /// Generate plans for every date missing one
    GenerateMissing,
    /// Mark a task completed (or not, with --undo)
    Toggle {
        #[arg(value_name = "TASK_ID")]
        task_id: String,
        /// Plan date the task belongs to (today if omitted)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<String>,
        /// Mark the task as not completed
        #[arg(long)]
        undo: bool,
    },
    /// Load settings from the backend
    Settings,
    /// Update settings
    SetSettings {
        /// New backend base URL, stored locally
        #[arg(long)]
        server_url: Option<String>,
        #[arg(long)]
        together_key: Option<String>,
        #[arg(long)]
        groq_key: Option<String>,
    },
    /// Print the backend URL in use
    ServerUrl,
    /// Forget the stored backend URL
    ResetServerUrl,
    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

fn parse_date(raw: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{}'", raw))
}
