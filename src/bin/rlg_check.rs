//! Responsive layout check.
//!
//! Loads a width sweep, builds the responsive layout graph, runs failure
//! detection and prints a JSON report on stdout. Logs go to stderr.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RLG_SWEEP`: path to the sweep JSON (or pass it as the first argument)
//! - `RLG_POLICY`: path to a detection policy JSON; missing fields keep defaults
//! - `RLG_ROW_THRESHOLD`: override the wrapping row threshold
//! - `RLG_SMALLRANGE_THRESHOLD`: override the small-range threshold
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! RLG_POLICY=policy.json cargo run --bin rlg_check -- sweep.json
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use rlg_kernel::{DetectionPolicy, DetectionSummary, ElementPath, FailureSet, IngestStats, Rlg, Sweep};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rlg_check=info,rlg_kernel=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }
}

/// Read a numeric override, ignoring (with a warning) values that do not parse.
fn env_override<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparseable override");
            None
        }
    }
}

fn load_policy() -> Result<DetectionPolicy, Box<dyn std::error::Error>> {
    let mut policy = match std::env::var("RLG_POLICY") {
        Ok(path) => {
            info!(path = %path, "loading detection policy");
            DetectionPolicy::from_json_str(&std::fs::read_to_string(&path)?)?
        }
        Err(_) => DetectionPolicy::default(),
    };
    if let Some(row_threshold) = env_override("RLG_ROW_THRESHOLD") {
        policy.row_threshold = row_threshold;
    }
    if let Some(smallrange_threshold) = env_override("RLG_SMALLRANGE_THRESHOLD") {
        policy.smallrange_threshold = smallrange_threshold;
    }
    Ok(policy)
}

#[derive(Serialize)]
struct Report<'a> {
    schema_version: &'static str,
    ingest: IngestStats,
    summary: &'a DetectionSummary,
    failures: Vec<(&'a ElementPath, &'a FailureSet)>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let sweep_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RLG_SWEEP").ok())
        .ok_or("no sweep given: pass a path or set RLG_SWEEP")?;

    let policy = load_policy()?;
    info!(
        sweep = %sweep_path,
        policy = %policy.policy_id(),
        params_hash = %policy.params_hash(),
        "Starting layout check"
    );

    let start = Instant::now();
    let sweep = Sweep::from_json_str(&std::fs::read_to_string(&sweep_path)?)?;
    let (mut graph, ingest) = Rlg::from_sweep(&sweep);
    if ingest.rejected > 0 {
        warn!(rejected = ingest.rejected, "some observations were rejected");
    }

    let summary = graph.detect(&policy)?;
    info!(
        latency_ms = start.elapsed().as_millis() as u64,
        total = summary.total(),
        "Layout check complete"
    );

    let report = Report {
        schema_version: rlg_kernel::RLG_SCHEMA_VERSION,
        ingest,
        summary: &summary,
        failures: graph.failures(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
