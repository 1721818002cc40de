//! Write a [`FeatureTable`] to a single-layer GeoPackage file.

use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use rusqlite::types::Value;
use rusqlite::{Connection, Error as SqliteError, Transaction, params_from_iter};
use tempfile::NamedTempFile;
use thiserror::Error;
use wayfarer_core::{ExportError, Exporter, FeatureTable, FieldValue};

use super::geometry::encode_point;
use super::schema::{
    Extent, GEOMETRY_COLUMN, WGS84_SRS_ID, attribute_columns, create_core_tables,
    create_feature_table, quote_identifier, write_header,
};

/// Layer name used when none is configured.
pub const DEFAULT_LAYER: &str = "points_layer";

/// Errors raised while writing a GeoPackage.
#[derive(Debug, Error)]
pub enum GeoPackageError {
    /// The table cannot be turned into point features.
    #[error(transparent)]
    Table(#[from] ExportError),
    /// Creating the staging file beside the destination failed.
    #[error("failed to stage GeoPackage next to {path:?}")]
    Stage {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Moving the finished file over the destination failed.
    #[error("failed to replace existing file {path:?}")]
    Replace {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Creating the parent directory failed.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open GeoPackage at {path:?}")]
    Open {
        /// Destination path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing the application id or version failed.
    #[error("failed to write GeoPackage header")]
    Header {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin GeoPackage transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating metadata or feature tables failed.
    #[error("failed to create GeoPackage schema for layer {layer:?}")]
    CreateSchema {
        /// Layer being created.
        layer: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Inserting a feature failed.
    #[error("failed to insert feature {row}")]
    InsertFeature {
        /// Row index in the source table.
        row: usize,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit GeoPackage transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Closing the database failed.
    #[error("failed to close GeoPackage")]
    Close {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

impl From<GeoPackageError> for ExportError {
    fn from(err: GeoPackageError) -> Self {
        match err {
            GeoPackageError::Table(inner) => inner,
            other => Self::Storage {
                message: error_chain(&other),
            },
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Exporter writing one point layer in EPSG:4326 to a GeoPackage.
///
/// The file is built under a temporary name in the destination directory
/// and renamed over any existing file once complete. Every table column
/// becomes an attribute field, and each row's latitude/longitude columns
/// become its point geometry.
///
/// # Examples
/// ```no_run
/// use wayfarer_core::{Exporter, FeatureTable};
/// use wayfarer_data::gpkg::GeoPackageExporter;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut table = FeatureTable::new(["name", "lat", "long"]);
/// table.push_row(vec!["Eiffel Tower".into(), 48.8584.into(), 2.2945.into()])?;
/// let exporter = GeoPackageExporter::new("route.gpkg").with_layer("stops");
/// assert_eq!(exporter.export(&table)?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GeoPackageExporter {
    path: Utf8PathBuf,
    layer: String,
}

impl GeoPackageExporter {
    /// Export to `path` using [`DEFAULT_LAYER`].
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            layer: DEFAULT_LAYER.to_owned(),
        }
    }

    /// Use a different layer name.
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Destination file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Layer name.
    #[must_use]
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Write `table`, returning the number of features.
    ///
    /// The destination only changes when the whole layer has been written;
    /// any failure leaves an existing file as it was.
    ///
    /// # Errors
    ///
    /// Returns [`GeoPackageError::Table`] for tables without usable
    /// coordinates, or a filesystem or SQLite failure.
    pub fn write(&self, table: &FeatureTable) -> Result<usize, GeoPackageError> {
        let points = table.points()?;
        let staging = self.stage()?;
        let written = self.populate(staging.path(), table, &points)?;

        let replacing = wayfarer_fs::file_is_file(&self.path).unwrap_or(false);
        staging
            .persist(self.path.as_std_path())
            .map_err(|err| GeoPackageError::Replace {
                path: self.path.clone(),
                source: err.error,
            })?;
        if replacing {
            log::debug!("replaced existing file {}", self.path);
        }
        log::info!(
            "wrote {written} feature(s) to layer {:?} in {}",
            self.layer,
            self.path
        );
        Ok(written)
    }

    /// Create an empty file beside the destination; dropped on failure.
    fn stage(&self) -> Result<NamedTempFile, GeoPackageError> {
        wayfarer_fs::ensure_parent_dir(&self.path).map_err(|source| {
            GeoPackageError::CreateDirectory {
                path: self.path.clone(),
                source,
            }
        })?;
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        tempfile::Builder::new()
            .prefix(".wayfarer-")
            .suffix(".gpkg")
            .tempfile_in(dir)
            .map_err(|source| GeoPackageError::Stage {
                path: self.path.clone(),
                source,
            })
    }

    fn populate(
        &self,
        staging: &Path,
        table: &FeatureTable,
        points: &[Coord<f64>],
    ) -> Result<usize, GeoPackageError> {
        let mut connection = Connection::open(staging).map_err(|source| GeoPackageError::Open {
            path: self.path.clone(),
            source,
        })?;
        write_header(&connection).map_err(|source| GeoPackageError::Header { source })?;

        let tx = connection
            .transaction()
            .map_err(|source| GeoPackageError::BeginTransaction { source })?;
        let columns = attribute_columns(table);
        create_core_tables(&tx)
            .and_then(|()| create_feature_table(&tx, &self.layer, &columns, extent(points)))
            .map_err(|source| GeoPackageError::CreateSchema {
                layer: self.layer.clone(),
                source,
            })?;
        let written = self.insert_features(&tx, &columns, table, points)?;
        tx.commit()
            .map_err(|source| GeoPackageError::Commit { source })?;
        connection
            .close()
            .map_err(|(_, source)| GeoPackageError::Close { source })?;
        Ok(written)
    }

    fn insert_features(
        &self,
        tx: &Transaction<'_>,
        columns: &[(String, &'static str)],
        table: &FeatureTable,
        points: &[Coord<f64>],
    ) -> Result<usize, GeoPackageError> {
        let mut names = vec![quote_identifier(GEOMETRY_COLUMN)];
        names.extend(columns.iter().map(|(name, _)| quote_identifier(name)));
        let placeholders = (1..=names.len())
            .map(|slot| format!("?{slot}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote_identifier(&self.layer),
            names.join(", ")
        );
        let mut insert = tx
            .prepare(&sql)
            .map_err(|source| GeoPackageError::CreateSchema {
                layer: self.layer.clone(),
                source,
            })?;

        for (row_index, (row, point)) in table.rows().iter().zip(points).enumerate() {
            let geometry = Value::Blob(encode_point(*point, WGS84_SRS_ID));
            let values = std::iter::once(geometry).chain(row.iter().map(sql_value));
            insert
                .execute(params_from_iter(values))
                .map_err(|source| GeoPackageError::InsertFeature {
                    row: row_index,
                    source,
                })?;
        }
        Ok(points.len())
    }
}

impl Exporter for GeoPackageExporter {
    fn export(&self, table: &FeatureTable) -> Result<usize, ExportError> {
        Ok(self.write(table)?)
    }
}

fn sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(number) => Value::Integer(*number),
        FieldValue::Real(number) => Value::Real(*number),
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Null => Value::Null,
    }
}

fn extent(points: &[Coord<f64>]) -> Option<Extent> {
    let (first, rest) = points.split_first()?;
    Some(rest.iter().fold(
        Extent {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        },
        |bounds, point| Extent {
            min_x: bounds.min_x.min(point.x),
            min_y: bounds.min_y.min(point.y),
            max_x: bounds.max_x.max(point.x),
            max_y: bounds.max_y.max(point.y),
        },
    ))
}
