//! Command-line interface for the Wayfarer tour planner.
//!
//! `wayfarer plan` geocodes a list of places, fetches road distances from
//! OSRM and prints the optimal visiting order. `wayfarer solve` runs the
//! exact solver on a distance matrix read from JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod engine;
mod error;
mod plan;
mod solve;

pub use error::CliError;

use plan::{HttpPlanServices, PlanArgs};
use solve::SolveArgs;

pub(crate) const ARG_ORIGIN: &str = "origin";
pub(crate) const ENV_ORIGIN: &str = "WAYFARER_CMDS_PLAN_ORIGIN";
pub(crate) const ARG_STOP: &str = "stop";
pub(crate) const ARG_STOPS_FILE: &str = "stops-file";
pub(crate) const ARG_ROUND_TRIP: &str = "round-trip";
pub(crate) const ARG_OSRM_URL: &str = "osrm-url";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_TABLE: &str = "table";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_COUNTRY_CODES: &str = "country-codes";
pub(crate) const ARG_REQUEST_TIMEOUT: &str = "request-timeout-secs";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_LAYER: &str = "layer";
pub(crate) const ARG_JSON: &str = "json";
pub(crate) const ARG_PARALLEL: &str = "parallel";
pub(crate) const ARG_TIME_LIMIT: &str = "time-limit-ms";
pub(crate) const ARG_MATRIX: &str = "matrix";
pub(crate) const ENV_MATRIX: &str = "WAYFARER_CMDS_SOLVE_MATRIX_PATH";

/// Run the Wayfarer CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, external services or
/// the solver fail.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version requests print to stdout and exit cleanly.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    init_logging(cli.log_level);

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Plan(args) => plan::run_plan_with(args, &HttpPlanServices, &mut stdout),
        Command::Solve(args) => solve::run_solve_with(args, &mut stdout),
    }
}

fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.target(env_logger::Target::Stderr);
    if let Some(filter) = level {
        builder.filter_level(filter);
    }
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer",
    about = "Exact shortest-tour planning from a fixed origin",
    version
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); overrides `RUST_LOG`.
    #[arg(long, global = true, value_name = "level")]
    log_level: Option<log::LevelFilter>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode places, fetch road distances and print the optimal order.
    Plan(PlanArgs),
    /// Solve a distance matrix read from a JSON file.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
