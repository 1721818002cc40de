//! Test helpers: temporary files and in-memory plan services.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use std::fs;
use tempfile::TempDir;
use wayfarer_core::test_support::{FixedGeocoder, MatrixDistanceProvider, scenario_matrix};
use wayfarer_core::{DistanceProvider, Geocoder};

use crate::CliError;
use crate::plan::{PlanConfig, PlanServices};

/// Place names matching the rows of [`scenario_matrix`].
pub(super) const PLACES: [&str; 4] = ["Origin", "Bakery", "Library", "Station"];

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Serves the scenario matrix and knows the four scenario places.
pub(super) struct StubPlanServices;

impl PlanServices for StubPlanServices {
    fn distances(&self, _config: &PlanConfig) -> Result<Box<dyn DistanceProvider>, CliError> {
        Ok(Box::new(MatrixDistanceProvider::new(scenario_matrix())))
    }

    fn geocoder(&self, _config: &PlanConfig) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = PLACES
            .iter()
            .zip([9.19, 9.21, 9.23, 9.25])
            .fold(FixedGeocoder::new(), |geocoder, (place, long)| {
                geocoder.with_location(place, Coord { x: long, y: 45.46 })
            });
        Ok(Box::new(geocoder))
    }
}
