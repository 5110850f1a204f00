use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sheetseek_core::{SearchConfig, SearchOutcome, Session};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetseek")]
#[command(about = "Search every sheet of a workbook by CNPJ (or any identifier column)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List loaded sheets and the unified column names
    Columns {
        /// Path to the Excel/ODS file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Find the records whose key column contains the digits of QUERY
    Search {
        /// Path to the Excel/ODS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Full or partial identifier, with or without punctuation
        #[arg(value_name = "QUERY")]
        query: String,

        /// Column holding the identifier (defaults to `key_column` from config)
        #[arg(short = 'k', long, value_name = "COLUMN")]
        column: Option<String>,
    },
    /// Show every distinct normalized key with its sheet
    Keys {
        /// Path to the Excel/ODS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column holding the identifier (defaults to `key_column` from config)
        #[arg(short = 'k', long, value_name = "COLUMN")]
        column: Option<String>,
    },
    /// Load once, then read one query per line from stdin
    Interactive {
        /// Path to the Excel/ODS file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column holding the identifier (defaults to `key_column` from config)
        #[arg(short = 'k', long, value_name = "COLUMN")]
        column: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = load_config(cli.config.as_deref())?;

    let exit_code = match &cli.command {
        Command::Columns { file } => {
            let session = open_session(file, &config)?;
            match cli.format {
                OutputFormat::Human => formatter::print_columns_human(file, session.table()),
                OutputFormat::Json => formatter::print_columns_json(file, session.table())?,
            }
            0
        }
        Command::Search {
            file,
            query,
            column,
        } => {
            let mut session = open_session(file, &config)?;
            select_column(&mut session, column.as_deref())?;
            print_outcome(&session, query, cli.format)?
        }
        Command::Keys { file, column } => {
            let mut session = open_session(file, &config)?;
            select_column(&mut session, column.as_deref())?;
            let candidates = session.candidates()?;
            match cli.format {
                OutputFormat::Human => formatter::print_candidates_human(session.table(), &candidates),
                OutputFormat::Json => formatter::print_candidates_json(session.table(), &candidates)?,
            }
            0
        }
        Command::Interactive { file, column } => {
            let mut session = open_session(file, &config)?;
            select_column(&mut session, column.as_deref())?;
            run_interactive(&session, cli.format)?;
            0
        }
    };

    std::process::exit(exit_code);
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    let config = if let Some(config_path) = path {
        SearchConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetseek.toml");
        if default_config_path.exists() {
            SearchConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            SearchConfig::default()
        }
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_session(file: &Path, config: &SearchConfig) -> Result<Session> {
    let session = Session::open(file, config)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    tracing::info!(file = %file.display(), summary = %session.summary(), "loaded workbook");
    Ok(session)
}

fn select_column(session: &mut Session, column: Option<&str>) -> Result<()> {
    if let Some(column) = column {
        session
            .select_column(column)
            .with_context(|| format!("Cannot search column '{column}'"))?;
    }

    if session.selected_column().is_none() {
        anyhow::bail!(
            "No key column selected. Use --column or set key_column in sheetseek.toml (available: {})",
            session.table().column_names().join(", ")
        );
    }

    Ok(())
}

/// Print one search and return the exit code: 0 on matches, 1 otherwise
fn print_outcome(session: &Session, query: &str, format: OutputFormat) -> Result<i32> {
    let outcome = session.search(query)?;

    match format {
        OutputFormat::Human => formatter::print_outcome_human(session.table(), &outcome),
        OutputFormat::Json => formatter::print_outcome_json(session.table(), &outcome)?,
    }

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &SearchOutcome<'_>) -> i32 {
    match outcome {
        SearchOutcome::Found(_) => 0,
        SearchOutcome::NotFound { .. } => 1,
    }
}

fn run_interactive(session: &Session, format: OutputFormat) -> Result<()> {
    if matches!(format, OutputFormat::Human) {
        println!("{}", format!("✓ {}", session.summary()).green().bold());
        println!(
            "Searching column {}. Type a CNPJ (punctuation optional), one per line.",
            session.selected_column().unwrap_or_default().cyan().bold()
        );
    }

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read query from stdin")?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        // A bad query is reported and the session keeps going
        if let Err(e) = print_outcome(session, query, format) {
            eprintln!("{} {:#}", "error:".red().bold(), e);
        }
    }

    Ok(())
}
