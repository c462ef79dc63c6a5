//! `booking` CLI — check proposed equipment bookings against a reservation snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Does a 12:00-20:00 run on eq-001 collide with anything? (snapshot on stdin)
//! cat reservations.json | booking check --equipment eq-001 \
//!     --start 2024-07-24T12:00:00Z --end 2024-07-24T20:00:00Z
//!
//! # Re-check an edited batch against everything but itself, as JSON
//! booking check -i reservations.json --equipment eq-001 \
//!     --start 2024-07-24T09:00 --end 2024-07-24T17:00 --exclude batch-001 --format json
//!
//! # Run the full write-path gate (form rules + conflicts) on a request
//! booking validate -i request.json --reservations reservations.json --config booking.json
//! ```
//!
//! Exit status: 0 when the booking may proceed, 2 when it conflicts or fails
//! validation, 1 on any error.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use booking_engine::{
    check_booking, describe_conflicts, detect_conflicts_with_policy, format_message,
    parse_timestamp, BatchRequest, EngineConfig, FormMode, Reservation,
};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

/// Exit status for "the booking must not be written".
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Equipment booking conflict checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate window for conflicts on one piece of equipment
    Check {
        /// Equipment to book
        #[arg(long)]
        equipment: String,
        /// Start of the window (RFC 3339, or YYYY-MM-DDTHH:MM[:SS] as UTC)
        #[arg(long)]
        start: String,
        /// End of the window, exclusive
        #[arg(long)]
        end: String,
        /// Id of the reservation being edited, ignored during the check
        #[arg(long)]
        exclude: Option<String>,
        /// Reservations JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Engine config JSON file
        #[arg(long)]
        config: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// List every conflict after the summary message (text format)
        #[arg(long)]
        details: bool,
    },
    /// Run form validation and conflict detection on a booking request
    Validate {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Reservations JSON file
        #[arg(long)]
        reservations: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Create)]
        mode: ModeArg,
        /// Id of the reservation being edited
        #[arg(long)]
        exclude: Option<String>,
        /// Evaluate past-start rules as of this instant (defaults to now)
        #[arg(long)]
        now: Option<String>,
        /// Engine config JSON file
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Create,
    Edit,
}

impl From<ModeArg> for FormMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Create => FormMode::Create,
            ModeArg::Edit => FormMode::Edit,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            equipment,
            start,
            end,
            exclude,
            input,
            config,
            format,
            details,
        } => {
            let start = parse_timestamp(&start).context("Invalid --start")?;
            let end = parse_timestamp(&end).context("Invalid --end")?;
            let config = load_config(config.as_deref())?;
            let reservations = read_reservations(input.as_deref())?;

            let report = detect_conflicts_with_policy(
                &equipment,
                start,
                end,
                &reservations,
                exclude.as_deref(),
                &config.conflicts,
            )
            .context("Conflict check failed")?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text if report.has_conflicts() => {
                    println!("{}", format_message(&report));
                    if details {
                        for line in describe_conflicts(&report) {
                            println!("  - {}", line);
                        }
                    }
                }
                OutputFormat::Text => {
                    println!("No scheduling conflicts on {}.", equipment);
                }
            }

            Ok(exit_status(!report.has_conflicts()))
        }
        Commands::Validate {
            input,
            reservations,
            mode,
            exclude,
            now,
            config,
        } => {
            let request: BatchRequest = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse booking request JSON")?;
            let reservations = read_reservations(Some(&reservations))?;
            let config = load_config(config.as_deref())?;
            let now = match now {
                Some(raw) => parse_timestamp(&raw).context("Invalid --now")?,
                None => chrono::Utc::now(),
            };

            let verdict = check_booking(
                &request,
                mode.into(),
                exclude.as_deref(),
                &reservations,
                now,
                &config,
            )
            .context("Booking check failed")?;

            println!("{}", serde_json::to_string_pretty(&verdict)?);
            Ok(exit_status(verdict.is_allowed()))
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn exit_status(allowed: bool) -> ExitCode {
    if allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            EngineConfig::load(path).with_context(|| format!("Failed to load config: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_reservations(path: Option<&str>) -> Result<Vec<Reservation>> {
    let json = read_input(path)?;
    let reservations: Vec<Reservation> =
        serde_json::from_str(&json).context("Failed to parse reservations JSON")?;
    tracing::info!(count = reservations.len(), "loaded reservation snapshot");
    Ok(reservations)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
