// src/main.rs
// TRENDS RADAR - COMMAND LINE ENTRY
// One keyword in, one JSON object out on stdout. Logs go to stderr.

use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

// Modules
mod analyst;
mod config;
mod error;
mod history;
mod scout;
mod systems;

use analyst::{AnalystEngine, TrendAnalysis};
use config::{Cli, Settings};
use history::TrendResult;
use scout::TrendScout;

/// What actually gets printed: the result, plus the analysis when asked for.
#[derive(Serialize)]
struct TrendReport {
    #[serde(flatten)]
    result: TrendResult,
    #[serde(flatten)]
    analysis: Option<TrendAnalysis>,
}

#[derive(Serialize)]
struct UsageError {
    error: String,
    usage: String,
}

fn main() -> ExitCode {
    init_tracing();

    let raw_args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    // 1. Bad configuration (e.g. TRENDS_RADAR_TZ=abc): JSON error on stdout, non-zero exit
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let reason = e.to_string();
            let reason = reason.lines().next().unwrap_or_default().trim_start_matches("error: ");
            return usage_error(format!("Invalid configuration: {}", reason));
        }
    };

    // 2. No keyword: usage error on stdout, non-zero exit
    let Some(keyword) = cli.keyword_from(&raw_args) else {
        return usage_error("No keyword provided".to_string());
    };

    // 3. Probe the live client once
    let settings = Settings::from(&cli);
    let client = systems::connect(&settings);

    // 4. Resolve (never fails; fallbacks are flagged inside the result)
    let scout = TrendScout::new(client.as_deref());
    let result = scout.resolve(&keyword, Local::now().date_naive(), &mut rand::thread_rng());

    // 5. Emit
    let analysis = settings.analyze.then(|| AnalystEngine::analyze(&result.history));
    match serde_json::to_string(&TrendReport { result, analysis }) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn usage_error(error: String) -> ExitCode {
    let usage = UsageError {
        error,
        usage: format!("{} <keyword>", env!("CARGO_BIN_NAME")),
    };
    match serde_json::to_string(&usage) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize usage error: {}", e),
    }
    ExitCode::from(1)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TRENDS_RADAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // The caller captures stderr as plain text
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
