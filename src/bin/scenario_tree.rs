//! Scenario Tree CLI
//!
//! Loads a baseline dataset, restores saved progress from a directory, applies
//! one command, and prints JSON to stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `SCENARIO_TREE_BASELINE`: baseline dataset JSON file (or `--baseline`)
//! - `SCENARIO_TREE_SAVE_DIR`: progress directory (or `--save-dir`, default: `.`)
//! - `RUST_LOG`: Log level filter (default: scenario_tree=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin scenario_tree --features cli -- --baseline scenarios.json set-status 2 complete
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scenario_tree::{
    load_baseline, FileProgressStore, NodeStatus, Position, ProgressEvent, RenderAttributes, Session,
};

#[derive(Parser)]
#[command(name = "scenario_tree")]
#[command(about = "Track campaign progress over a scenario tree")]
struct Args {
    /// Baseline dataset JSON file
    #[arg(short = 'b', long, env = "SCENARIO_TREE_BASELINE")]
    baseline: PathBuf,

    /// Directory progress is saved in
    #[arg(short = 'd', long, env = "SCENARIO_TREE_SAVE_DIR", default_value = ".")]
    save_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print derived visibility and colors
    Render {
        /// Scenarios to highlight
        #[arg(short = 's', long)]
        select: Vec<String>,
    },
    /// Change a scenario's status
    SetStatus {
        /// Scenario id
        id: String,
        /// hidden, incomplete, attempted, complete or locked
        #[arg(value_parser = parse_status)]
        status: NodeStatus,
    },
    /// Move a scenario on the canvas
    Move {
        /// Scenario id
        id: String,
        /// Horizontal coordinate
        #[arg(allow_negative_numbers = true)]
        x: f64,
        /// Vertical coordinate
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Replace a scenario's notes
    Notes {
        /// Scenario id
        id: String,
        /// New notes text
        text: String,
    },
    /// Print saved progress as a version 2 document
    Export,
    /// Discard all progress
    Reset,
}

fn parse_status(s: &str) -> Result<NodeStatus, String> {
    NodeStatus::from_str(s).ok_or_else(|| format!("unknown status: {}", s))
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "scenario_tree=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn print_render(attrs: &RenderAttributes) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(attrs)?);
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(&args.baseline)?;
    let baseline = Arc::new(load_baseline(&json)?);
    info!(
        path = %args.baseline.display(),
        scenarios = baseline.num_nodes(),
        relationships = baseline.num_edges(),
        "Baseline loaded"
    );

    let store = FileProgressStore::new(&args.save_dir);
    let mut session = Session::open(baseline, store)?;

    match args.command {
        Command::Render { select } => {
            for id in &select {
                session.select(id)?;
            }
            print_render(&session.render())?;
        }
        Command::SetStatus { id, status } => {
            let attrs = session.apply(ProgressEvent::SetStatus { id: id.into(), status })?;
            print_render(&attrs)?;
        }
        Command::Move { id, x, y } => {
            let attrs = session.apply(ProgressEvent::SetPosition {
                id: id.into(),
                position: Position::new(x, y),
            })?;
            print_render(&attrs)?;
        }
        Command::Notes { id, text } => {
            let attrs = session.apply(ProgressEvent::SetNotes { id: id.into(), notes: text })?;
            print_render(&attrs)?;
        }
        Command::Export => println!("{}", session.export()?),
        Command::Reset => print_render(&session.reset()?)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
