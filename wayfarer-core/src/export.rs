//! Tabular export of routes as point features.
//!
//! A [`FeatureTable`] is the hand-off format for exporters: named columns and
//! rows of [`FieldValue`]s. Point geometry is taken from the columns whose
//! names match `lat`/`latitude` and `long`/`longitude`, ignoring ASCII case.

use geo::Coord;
use thiserror::Error;

use crate::RouteResult;

const LATITUDE_NAMES: [&str; 2] = ["lat", "latitude"];
const LONGITUDE_NAMES: [&str; 2] = ["long", "longitude"];

/// Errors raised while preparing or writing an export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// No latitude or no longitude column exists.
    #[error("table has no latitude/longitude columns (expected lat|latitude and long|longitude)")]
    MissingGeometryFields,
    /// A row has a different width from the header.
    #[error("row {row} has {found} value(s), expected {expected}")]
    RowWidth {
        /// Offending row index.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
    /// A row's latitude or longitude is missing or not numeric.
    #[error("row {row} has no numeric latitude/longitude")]
    InvalidCoordinate {
        /// Offending row index.
        row: usize,
    },
    /// The storage backend failed.
    #[error("failed to write export: {message}")]
    Storage {
        /// Backend error description.
        message: String,
    },
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum FieldValue {
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Real(f64),
    /// Free text.
    Text(String),
    /// Absent value.
    Null,
}

impl FieldValue {
    /// Numeric view of the value, if it has one.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer coordinates are far below 2^53"
    )]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Whether the value is numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Real)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Positions of the latitude and longitude columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryColumns {
    /// Latitude column index.
    pub lat: usize,
    /// Longitude column index.
    pub long: usize,
}

/// Named columns and rows of values, ready for export.
///
/// # Examples
/// ```
/// use wayfarer_core::{ExportError, FeatureTable, FieldValue};
///
/// # fn main() -> Result<(), ExportError> {
/// let mut table = FeatureTable::new(["name", "Latitude", "LONG"]);
/// table.push_row(vec!["Paris".into(), 48.8583701.into(), 2.2944813.into()])?;
/// let geometry = table.geometry_columns()?;
/// assert_eq!((geometry.lat, geometry.long), (1, 2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl FeatureTable {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::RowWidth`] when the row does not match the
    /// number of columns.
    pub fn push_row(&mut self, row: Vec<FieldValue>) -> Result<(), ExportError> {
        if row.len() != self.columns.len() {
            return Err(ExportError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    /// Locate the latitude and longitude columns.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingGeometryFields`] when either is absent.
    pub fn geometry_columns(&self) -> Result<GeometryColumns, ExportError> {
        let find = |names: &[&str]| {
            self.columns
                .iter()
                .position(|column| names.iter().any(|name| column.eq_ignore_ascii_case(name)))
        };
        match (find(&LATITUDE_NAMES), find(&LONGITUDE_NAMES)) {
            (Some(lat), Some(long)) => Ok(GeometryColumns { lat, long }),
            _ => Err(ExportError::MissingGeometryFields),
        }
    }

    /// Point position of every row.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingGeometryFields`] or
    /// [`ExportError::InvalidCoordinate`] for a row lacking numeric values.
    pub fn points(&self) -> Result<Vec<Coord<f64>>, ExportError> {
        let geometry = self.geometry_columns()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let value = |column: usize| row.get(column).and_then(FieldValue::as_f64);
                match (value(geometry.lat), value(geometry.long)) {
                    (Some(y), Some(x)) => Ok(Coord { x, y }),
                    _ => Err(ExportError::InvalidCoordinate { row: row_index }),
                }
            })
            .collect()
    }
}

impl From<&RouteResult> for FeatureTable {
    fn from(route: &RouteResult) -> Self {
        let rows = route
            .stops()
            .iter()
            .map(|stop| {
                vec![
                    i64::try_from(stop.index).map_or(FieldValue::Null, FieldValue::Integer),
                    FieldValue::from(stop.descriptor.as_str()),
                    FieldValue::Real(stop.distance_from_previous),
                    FieldValue::from(stop.lat()),
                    FieldValue::from(stop.long()),
                    FieldValue::from(stop.crs_label.as_str()),
                ]
            })
            .collect();
        Self {
            columns: ["index", "descriptor", "km", "lat", "long", "crs"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            rows,
        }
    }
}

/// Write a [`FeatureTable`] as point features.
pub trait Exporter {
    /// Export `table`, returning the number of features written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingGeometryFields`] when the table has no
    /// latitude/longitude columns, or a backend failure.
    fn export(&self, table: &FeatureTable) -> Result<usize, ExportError>;
}
