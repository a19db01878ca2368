//! Annobox: bounding-box annotation sessions.
//!
//! Annobox holds the state behind an interactive labeling surface: an image
//! fitted onto a canvas, a set of named categories, and the boxes a user
//! drags out on top of it. Sessions export to YOLO, COCO and Pascal VOC.
//!
//! # Modules
//!
//! - [`geom`]: Coordinate spaces, rectangles and the canvas-to-image transform
//! - [`session`]: Categories, the box store and the drawing state machine
//! - [`export`]: YOLO, COCO and Pascal VOC writers
//! - [`validation`]: Session audit and error reporting
//! - [`script`]: Replaying recorded UI actions
//! - [`config`]: Viewport and minimum box size
//! - [`error`]: Error types for annobox operations

pub mod config;
pub mod error;
pub mod export;
pub mod geom;
pub mod script;
pub mod session;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use config::{SessionConfig, Viewport, MIN_BOX_SIZE};
pub use error::AnnoboxError;
use script::{ReplayOptions, ReplayOutcome, Script};

/// The annobox CLI application.
#[derive(Parser)]
#[command(name = "annobox")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Canvas size images are fitted into, as WIDTHxHEIGHT.
    #[arg(long, global = true, env = "ANNOBOX_VIEWPORT", default_value_t = Viewport::default())]
    viewport: Viewport,

    /// Boxes narrower or shorter than this many canvas pixels are discarded.
    #[arg(
        long,
        global = true,
        env = "ANNOBOX_MIN_BOX_SIZE",
        default_value_t = MIN_BOX_SIZE,
        value_parser = config::parse_min_box_size
    )]
    min_box_size: f64,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and write every export it requests.
    Replay(ReplayArgs),
    /// Replay a session script and audit the resulting session.
    Check(CheckArgs),
}

/// Arguments for the replay subcommand.
#[derive(clap::Args)]
struct ReplayArgs {
    /// Session script (.json, .yaml or .yml).
    script: PathBuf,

    /// Directory export files are written to.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Stop at the first rejected step instead of skipping it.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Session script (.json, .yaml or .yml).
    script: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the annobox CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnoboxError> {
    let cli = Cli::parse();
    let config = SessionConfig::default()
        .with_viewport(cli.viewport)
        .with_min_box_size(cli.min_box_size);

    match cli.command {
        Some(Commands::Replay(args)) => run_replay(args, config),
        Some(Commands::Check(args)) => run_check(args, config),
        None => {
            println!("annobox {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box annotation sessions with YOLO, COCO and Pascal VOC export.");
            println!();
            println!("Run 'annobox --help' for usage information.");
            Ok(())
        }
    }
}

fn load_and_replay(
    path: &Path,
    config: SessionConfig,
    opts: ReplayOptions,
) -> Result<ReplayOutcome, AnnoboxError> {
    let script = Script::from_path(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    log::debug!(
        "replaying {} step(s) from {}",
        script.steps.len(),
        path.display()
    );
    script::replay(&script, config, base_dir, opts)
}

fn print_skipped(outcome: &ReplayOutcome) {
    for skipped in &outcome.skipped {
        println!("  step {} skipped: {}", skipped.index + 1, skipped.message);
    }
}

/// Execute the replay subcommand.
fn run_replay(args: ReplayArgs, config: SessionConfig) -> Result<(), AnnoboxError> {
    let outcome = load_and_replay(
        &args.script,
        config,
        ReplayOptions {
            strict: args.strict,
            run_exports: true,
        },
    )?;

    for bundle in &outcome.exports {
        for path in bundle.write_to_dir(&args.out)? {
            println!("Wrote {} ({})", path.display(), bundle.format);
        }
    }

    print_skipped(&outcome);
    println!(
        "Replayed {}: {} box(es), {} export(s), {} step(s) skipped",
        args.script.display(),
        outcome.session.store().len(),
        outcome.exports.len(),
        outcome.skipped.len()
    );
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs, config: SessionConfig) -> Result<(), AnnoboxError> {
    let outcome = load_and_replay(&args.script, config, ReplayOptions::default())?;

    let report = validation::validate_session(&outcome.session);

    match args.output.as_str() {
        "json" => {
            let skipped: Vec<serde_json::Value> = outcome
                .skipped
                .iter()
                .map(|s| serde_json::json!({ "step": s.index + 1, "message": s.message }))
                .collect();
            let doc = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "skipped_steps": skipped,
                "issues": report.issues,
            });
            let json = serde_json::to_string_pretty(&doc).map_err(AnnoboxError::JsonWrite)?;
            println!("{}", json);
        }
        _ => {
            print_skipped(&outcome);
            print!("{}", report);
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(AnnoboxError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}
