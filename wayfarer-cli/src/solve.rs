//! Solve command implementation for the Wayfarer CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{DistanceMatrix, Tour, TourKind};

use crate::engine::SolverSettings;
use crate::{ARG_MATRIX, ARG_PARALLEL, ARG_ROUND_TRIP, ARG_TIME_LIMIT, CliError, ENV_MATRIX};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a distance matrix exactly and print the tour as \
                 JSON. The input file holds either a bare square array of \
                 non-negative distances or an object with `matrix` and an \
                 optional `kind` (\"open\" or \"closed\").",
    about = "Solve a JSON distance matrix"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct SolveArgs {
    /// Path to the JSON matrix file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) matrix_path: Option<Utf8PathBuf>,
    /// Return to the origin; overrides the file's `kind`.
    #[arg(long = ARG_ROUND_TRIP)]
    #[serde(default)]
    pub(crate) round_trip: bool,
    /// Search first-level branches in parallel.
    #[arg(long = ARG_PARALLEL)]
    #[serde(default)]
    pub(crate) parallel: bool,
    /// Stop the search after this many milliseconds.
    #[arg(long = ARG_TIME_LIMIT, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    pub(crate) matrix_path: Utf8PathBuf,
    /// `Some(Closed)` when forced from the command line.
    pub(crate) kind: Option<TourKind>,
    pub(crate) solver: SolverSettings,
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let matrix_path = args.matrix_path.ok_or(CliError::MissingArgument {
            field: ARG_MATRIX,
            env: ENV_MATRIX,
        })?;
        Ok(Self {
            matrix_path,
            kind: args.round_trip.then_some(TourKind::Closed),
            solver: SolverSettings::new(args.parallel, args.time_limit_ms),
        })
    }
}

/// Matrix file contents.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum MatrixInput {
    /// `[[...]]`
    Rows(Vec<Vec<f64>>),
    /// `{"matrix": [[...]], "kind": "closed"}`
    Request {
        matrix: Vec<Vec<f64>>,
        #[serde(default)]
        kind: TourKind,
    },
}

impl MatrixInput {
    fn into_parts(self) -> (Vec<Vec<f64>>, TourKind) {
        match self {
            Self::Rows(rows) => (rows, TourKind::default()),
            Self::Request { matrix, kind } => (matrix, kind),
        }
    }
}

pub(crate) fn run_solve_with(args: SolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let tour = execute_solve(&config)?;
    write_tour(writer, &tour)
}

pub(crate) fn execute_solve(config: &SolveConfig) -> Result<Tour, CliError> {
    let (rows, file_kind) = load_matrix(&config.matrix_path)?.into_parts();
    let matrix = DistanceMatrix::new(rows).map_err(|source| CliError::InvalidMatrix {
        path: config.matrix_path.clone(),
        source,
    })?;
    let kind = config.kind.unwrap_or(file_kind);
    log::info!("solving {kind:?} tour over {} node(s)", matrix.size());
    config
        .solver
        .build()
        .solve(&matrix, kind)
        .map_err(CliError::Solve)
}

/// Load a JSON matrix file.
pub(crate) fn load_matrix(path: &Utf8Path) -> Result<MatrixInput, CliError> {
    let file = wayfarer_fs::open_utf8_file(path).map_err(|source| CliError::ReadInput {
        field: ARG_MATRIX,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseMatrix {
        path: path.to_path_buf(),
        source,
    })
}

fn write_tour(writer: &mut dyn Write, tour: &Tour) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(tour).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
