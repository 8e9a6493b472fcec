//! Outreach timing CLI.
//!
//! Reads an exported signal file and prints windows, overlaps or a full
//! outlook as JSON or a plain-text table.
//!
//! Usage: `outreach-timing outlook --signals signals.json --days 14 --scenario olympics`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use outreach_timing_lib::config::load_config_or_default;
use outreach_timing_lib::signal_io::{load_signals, retain_well_formed};
use outreach_timing_lib::timing::format_window_span;
use outreach_timing_lib::{
    apply_scenario_mode, build_outlook, compute_outreach_windows, find_signal_overlaps,
    OutlookRequest, OutreachWindow, Signal, SignalOverlap,
};

#[derive(Parser)]
#[command(name = "outreach-timing", about = "Outreach window planning from activity signals")]
#[command(version)]
struct Cli {
    /// Engine config (defaults to ~/.outreach-timing/config.json when present)
    #[arg(long, global = true, env = "OUTREACH_TIMING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classified windows over the horizon
    Windows(HorizonArgs),
    /// Pairwise overlaps between impactful signals
    Overlaps(SignalArgs),
    /// Windows, overlaps, totals and data caveats together
    Outlook(HorizonArgs),
}

#[derive(Args)]
struct SignalArgs {
    /// Signal export (JSON array or {"signals": [...]})
    #[arg(short, long)]
    signals: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Args)]
struct HorizonArgs {
    #[command(flatten)]
    input: SignalArgs,

    /// Horizon length in days
    #[arg(short, long, default_value_t = 14)]
    days: i64,

    /// Horizon start (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Speculative scenario tag, e.g. "olympics"
    #[arg(long)]
    scenario: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref()).map_err(|e| {
        let hint = e.recovery_suggestion();
        anyhow::anyhow!("{} ({})", e, hint)
    })?;
    let tz = config.tz()?;

    match cli.command {
        Commands::Windows(args) => {
            let signals = read_signals(&args.input.signals)?;
            let now = args.now.unwrap_or_else(Utc::now);
            let mut windows = compute_outreach_windows(&signals, args.days, now, &config);
            if let Some(tag) = args.scenario.as_deref() {
                windows = apply_scenario_mode(&windows, tag, &config);
            }
            match args.input.format {
                OutputFormat::Json => print_json(&windows)?,
                OutputFormat::Text => print_windows(&windows, &tz),
            }
        }
        Commands::Overlaps(args) => {
            let signals = read_signals(&args.signals)?;
            let overlaps = find_signal_overlaps(&signals, &config);
            match args.format {
                OutputFormat::Json => print_json(&overlaps)?,
                OutputFormat::Text => print_overlaps(&overlaps, &tz),
            }
        }
        Commands::Outlook(args) => {
            let signals = read_signals(&args.input.signals)?;
            let request = OutlookRequest {
                horizon_days: args.days,
                now: args.now.unwrap_or_else(Utc::now),
                scenario: args.scenario,
            };
            let report = build_outlook(&signals, &request, &config);
            match args.input.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => {
                    print_windows(&report.windows, &tz);
                    println!();
                    print_overlaps(&report.overlaps, &tz);
                    for warning in &report.warnings {
                        println!("! {}", warning);
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_signals(path: &Path) -> Result<Vec<Signal>> {
    let signals = load_signals(path)
        .with_context(|| format!("loading signals from {}", path.display()))?;
    Ok(retain_well_formed(signals))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_windows(windows: &[OutreachWindow], tz: &Tz) {
    if windows.is_empty() {
        println!("No windows.");
        return;
    }
    for w in windows {
        println!(
            "{:<15} {:<40} score {:>2}  confidence {:<6} {}",
            w.window_type.as_str(),
            format_window_span(w, tz),
            w.max_score,
            w.confidence.as_str(),
            w.explanation
        );
    }
}

fn print_overlaps(overlaps: &[SignalOverlap], tz: &Tz) {
    if overlaps.is_empty() {
        println!("No overlapping impactful signals.");
        return;
    }
    for o in overlaps {
        println!(
            "{} – {}  {:<6} {}",
            o.start.with_timezone(tz).format("%a %b %-d %-I:%M %p"),
            o.end.with_timezone(tz).format("%-I:%M %p"),
            o.combined_impact.as_str(),
            o.explanation
        );
    }
}
