//! StudyTrack command-line front end.
//!
//! # Responsibility
//! - Parse commands and wire core services over a SQLite key-value file.
//! - Print plain-text views of the dashboard, topics, exam prep and resources.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use studytrack_core::ExerciseStatus;

#[derive(Debug, Parser)]
#[command(name = "studytrack", version, about = "Track study topics, exercises and exam prep")]
struct Cli {
    /// SQLite file holding sessions and study progress.
    #[arg(long, global = true, default_value = "studytrack.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging stays off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a local session.
    Login { email: String, password: String },
    /// End the local session.
    Logout,
    /// Show the active identity.
    Whoami,
    /// Overall progress, countdown and topic list.
    Dashboard,
    #[command(subcommand)]
    Topic(TopicCommand),
    #[command(subcommand)]
    Exercise(ExerciseCommand),
    #[command(subcommand)]
    Checklist(ChecklistCommand),
    #[command(subcommand)]
    Exam(ExamCommand),
    #[command(subcommand)]
    Course(CourseCommand),
    #[command(subcommand)]
    Resources(ResourcesCommand),
}

/// Topics are addressed by id or by 1-based position in the dashboard list.
#[derive(Debug, Subcommand)]
enum TopicCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Number of placeholder exercises; fractions are floored, negatives become 0.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        exercises: f64,
    },
    Update {
        topic: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Shrinking drops exercises from the end, including their status.
        #[arg(long, allow_negative_numbers = true)]
        exercises: Option<f64>,
    },
    Delete { topic: String },
    Show { topic: String },
    Note { topic: String, note: String },
}

#[derive(Debug, Subcommand)]
enum ExerciseCommand {
    Add { topic: String, title: String },
    Rename { topic: String, exercise: String, title: String },
    Status {
        topic: String,
        exercise: String,
        #[arg(value_parser = parse_status)]
        status: ExerciseStatus,
    },
}

#[derive(Debug, Subcommand)]
enum ChecklistCommand {
    List,
    Add { text: String },
    Toggle { item: String },
}

#[derive(Debug, Subcommand)]
enum ExamCommand {
    Show,
    /// RFC 3339 timestamp or local `YYYY-MM-DDTHH:MM`.
    Set { date: String },
}

#[derive(Debug, Subcommand)]
enum CourseCommand {
    Show,
    Name { value: String },
    Instance { value: String },
    Reset,
}

#[derive(Debug, Subcommand)]
enum ResourcesCommand {
    List {
        /// Only resources owned by the logged-in user.
        #[arg(long)]
        mine: bool,
    },
    Show { id: String },
    Add(ResourceFields),
    Edit {
        id: String,
        #[command(flatten)]
        fields: ResourceFields,
    },
    Delete { id: String },
}

#[derive(Debug, Args)]
struct ResourceFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    url: String,
}

fn parse_status(value: &str) -> Result<ExerciseStatus, String> {
    ExerciseStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`; expected not_started|in_progress|done"))
}

fn main() -> ExitCode {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
