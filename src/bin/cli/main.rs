mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recall-cli", about = "Record and flashcard store CLI", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file to operate on (overrides the config)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Principal to act as (default: $RECALL_PRINCIPAL, then $USER)
    #[arg(long = "as", global = true)]
    principal: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record operations
    #[command(subcommand)]
    Record(RecordCommand),

    /// Flashcard operations
    #[command(subcommand)]
    Card(CardCommand),

    /// Print the notification log
    Events {
        /// Skip the first N events
        #[arg(long, default_value = "0")]
        since: usize,
    },

    /// Show snapshot metadata and check index consistency
    Status,
}

#[derive(Subcommand)]
enum RecordCommand {
    /// Create a record
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Replace a record's title and description
    Update {
        id: u64,
        title: String,
        description: String,
    },

    /// Remove a record and your flashcards under it
    Rm { id: u64 },

    /// List records (yours by default)
    Ls {
        /// List another principal's records
        #[arg(long)]
        owner: Option<String>,
        /// List every record in storage order
        #[arg(long, conflicts_with = "owner")]
        all: bool,
    },

    /// Number of live records
    Count,
}

#[derive(Subcommand)]
enum CardCommand {
    /// Attach a flashcard to a record
    Add {
        record_id: u64,
        question: String,
        answer: String,
    },

    /// Replace a flashcard's question and answer
    Update {
        id: u64,
        question: String,
        answer: String,
    },

    /// Remove a flashcard
    Rm { id: u64 },

    /// List the flashcards under a record
    Ls { record_id: u64 },
}

fn resolve_principal(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("RECALL_PRINCIPAL").ok())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let principal = resolve_principal(cli.principal);

    let config = app::load_config(cli.config.as_deref())?;
    env_logger::Builder::new()
        .filter_level(config.log_filter())
        .parse_default_env()
        .init();

    let mut app = app::App::open(config, cli.snapshot, principal)?;

    let format = &cli.format;
    match cli.command {
        Command::Record(subcmd) => match subcmd {
            RecordCommand::Add { title, description } => {
                commands::record::run_add(&mut app, title, description, format)?;
            }
            RecordCommand::Update { id, title, description } => {
                commands::record::run_update(&mut app, id, title, description, format)?;
            }
            RecordCommand::Rm { id } => {
                commands::record::run_remove(&mut app, id, format)?;
            }
            RecordCommand::Ls { owner, all } => {
                commands::record::run_list(&app, owner.as_deref(), all, format)?;
            }
            RecordCommand::Count => {
                commands::record::run_count(&app, format)?;
            }
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add { record_id, question, answer } => {
                commands::card::run_add(&mut app, record_id, question, answer, format)?;
            }
            CardCommand::Update { id, question, answer } => {
                commands::card::run_update(&mut app, id, question, answer, format)?;
            }
            CardCommand::Rm { id } => {
                commands::card::run_remove(&mut app, id, format)?;
            }
            CardCommand::Ls { record_id } => {
                commands::card::run_list(&app, record_id, format)?;
            }
        },
        Command::Events { since } => {
            commands::events::run(&app, since, format)?;
        }
        Command::Status => {
            commands::status::run(&app, format)?;
        }
    }

    Ok(())
}
