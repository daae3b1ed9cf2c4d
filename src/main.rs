mod cli;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use habitrack::config::HabitrackConfig;
use habitrack::habit::timestamp::{self, parse_timestamp};
use habitrack::habit::Cadence;

#[derive(Parser)]
#[command(name = "habitrack", version, about = "Track daily and weekly habits and their streaks")]
struct Cli {
    /// Config file to load instead of ~/.habitrack/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Without a command, the interactive menu starts.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "daily")]
        cadence: Cadence,
    },
    /// Check off a habit (now, or at --at)
    Checkoff {
        name: String,
        /// YYYY-MM-DD or YYYY-MM-DD HH:MM:SS
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },
    /// Rename or re-describe a habit
    Edit {
        name: String,
        #[arg(long = "name")]
        new_name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a habit and its whole checkoff history
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List all habits with their current streaks
    List,
    /// Show the checkoff history of one habit
    History {
        name: String,
        /// Include the audit log
        #[arg(long)]
        log: bool,
    },
    /// Analyse habits and streaks
    Analyse {
        #[command(subcommand)]
        query: cli::analyse::AnalyseQuery,
        /// Print the result as JSON
        #[arg(long, global = true)]
        json: bool,
    },
    /// Start the interactive menu
    Menu,
    /// Check database health
    Doctor,
    /// Export all habits and checkoffs as JSON to stdout
    Export,
}

fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HabitrackConfig::load_from(path)?,
        None => HabitrackConfig::load()?,
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = db.to_string_lossy().into_owned();
    }

    // Log to stderr so stdout carries only command output.
    let filter = EnvFilter::try_new(&config.logging.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Menu) {
        Command::Add {
            name,
            description,
            cadence,
        } => {
            let mut conn = cli::open(&config)?;
            cli::habits::add(&mut conn, &mut out, &name, &description, cadence)?;
        }
        Command::Checkoff { name, at } => {
            let mut conn = cli::open(&config)?;
            let at = at.unwrap_or_else(timestamp::now);
            cli::habits::checkoff(&mut conn, &mut out, &name, at)?;
        }
        Command::Edit {
            name,
            new_name,
            description,
        } => {
            let mut conn = cli::open(&config)?;
            cli::habits::edit(
                &mut conn,
                &mut out,
                &name,
                new_name.as_deref(),
                description.as_deref(),
            )?;
        }
        Command::Delete { name, yes } => {
            let mut conn = cli::open(&config)?;
            let prompt = format!("This will permanently delete '{name}' and all of its checkoffs.");
            if !yes && !cli::confirm(&mut std::io::stdin().lock(), &mut out, &prompt)? {
                anyhow::bail!("delete cancelled");
            }
            cli::habits::delete(&mut conn, &mut out, &name)?;
        }
        Command::List => {
            let conn = cli::open(&config)?;
            cli::habits::list(&conn, &mut out)?;
        }
        Command::History { name, log } => {
            let conn = cli::open(&config)?;
            cli::habits::history(&conn, &mut out, &name, log)?;
        }
        Command::Analyse { query, json } => {
            let conn = cli::open(&config)?;
            cli::analyse::analyse(&conn, &mut out, &query, json)?;
        }
        Command::Menu => {
            let mut conn = cli::open(&config)?;
            cli::menu::Menu::new(&mut conn, std::io::stdin().lock(), &mut out).run()?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
        Command::Export => {
            let conn = cli::open(&config)?;
            let count = cli::export::export(&conn, &mut out)?;
            eprintln!("Exported {count} habits.");
        }
    }

    out.flush()?;
    Ok(())
}
