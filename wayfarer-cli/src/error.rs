//! Error types emitted by the Wayfarer CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfarer_core::{ExportError, MatrixError, PlanError, SolveError};
use wayfarer_data::ClientBuildError;

/// Errors emitted by the Wayfarer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// Reading an input file failed.
    #[error("failed to read {field} file {path:?}: {source}")]
    ReadInput {
        /// Flag naming the path.
        field: &'static str,
        /// The unreadable path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The matrix file is not valid JSON of the expected shape.
    #[error("failed to parse matrix JSON at {path:?}: {source}")]
    ParseMatrix {
        /// Matrix file path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The matrix violates the distance-matrix invariants.
    #[error("matrix in {path:?} is invalid: {source}")]
    InvalidMatrix {
        /// Matrix file path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: MatrixError,
    },
    /// Building an HTTP adapter failed.
    #[error("failed to set up {service} client for {base_url:?}: {source}")]
    BuildClient {
        /// `routing` or `geocoding`.
        service: &'static str,
        /// Configured base URL.
        base_url: String,
        /// Construction error.
        #[source]
        source: ClientBuildError,
    },
    /// Planning failed at one of its stages.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The solver rejected the matrix.
    #[error("solver failed: {0}")]
    Solve(#[source] SolveError),
    /// Writing the GeoPackage failed.
    #[error("failed to export route to {path:?}: {source}")]
    Export {
        /// Destination path.
        path: Utf8PathBuf,
        /// Exporter error.
        #[source]
        source: ExportError,
    },
    /// Serialising JSON output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
