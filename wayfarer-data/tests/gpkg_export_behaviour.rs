//! Behavioural tests for [`GeoPackageExporter`].

use camino::Utf8PathBuf;
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use rusqlite::Connection;
use std::cell::RefCell;
use tempfile::TempDir;
use wayfarer_core::test_support::FixedGeocoder;
use wayfarer_core::{
    DistanceMatrix, ExportError, Exporter, FeatureTable, FieldValue, LocationRegistry,
    RouteResult, TourKind,
};
use wayfarer_data::gpkg::GeoPackageExporter;

/// Temporary directory plus the export destination inside it.
struct Destination {
    _dir: TempDir,
    path: Utf8PathBuf,
}

type TableCell = RefCell<Option<FeatureTable>>;
type OutcomeCell = RefCell<Option<Result<usize, ExportError>>>;

#[fixture]
fn destination() -> Destination {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path =
        Utf8PathBuf::from_path_buf(dir.path().join("route.gpkg")).expect("utf-8 temp dir");
    Destination { _dir: dir, path }
}

#[fixture]
fn table() -> TableCell {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn count_features(destination: &Destination) -> i64 {
    let db = Connection::open(destination.path.as_std_path()).expect("open output");
    db.query_row("SELECT COUNT(*) FROM points_layer", [], |row| row.get(0))
        .expect("count features")
}

// --- Given steps ---

#[given("an open route through three resolved stops")]
fn open_route(#[from(table)] table: &TableCell) {
    let geocoder = FixedGeocoder::new()
        .with_location("Duomo", Coord { x: 9.1900, y: 45.4642 })
        .with_location("Navigli", Coord { x: 9.1737, y: 45.4507 })
        .with_location("Brera", Coord { x: 9.1880, y: 45.4720 });
    let registry = LocationRegistry::register("Duomo", &["Navigli", "Brera"])
        .expect("distinct descriptors")
        .resolve_with(&geocoder)
        .expect("known places");
    let matrix = DistanceMatrix::new(vec![
        vec![0.0, 2.7, 1.4],
        vec![2.9, 0.0, 3.3],
        vec![1.4, 3.1, 0.0],
    ])
    .expect("valid matrix");
    let route = RouteResult::assemble(&[0, 2, 1], &matrix, registry.nodes(), TourKind::Open)
        .expect("valid path");
    *table.borrow_mut() = Some(FeatureTable::from(&route));
}

#[given("a previous export at the destination")]
fn previous_export(#[from(destination)] destination: &Destination) {
    let mut stale = FeatureTable::new(["lat", "long"]);
    stale
        .push_row(vec![FieldValue::Real(0.0), FieldValue::Real(0.0)])
        .expect("row fits");
    GeoPackageExporter::new(destination.path.clone())
        .export(&stale)
        .expect("seed export");
}

#[given("a table without latitude and longitude columns")]
fn table_without_coordinates(#[from(table)] table: &TableCell) {
    let mut plain = FeatureTable::new(["name", "x", "y"]);
    plain
        .push_row(vec!["Duomo".into(), 9.19.into(), 45.46.into()])
        .expect("row fits");
    *table.borrow_mut() = Some(plain);
}

// --- When steps ---

fn export(destination: &Destination, table: &TableCell, outcome: &OutcomeCell) {
    let guard = table.borrow();
    let features = guard.as_ref().expect("table must be initialised");
    *outcome.borrow_mut() =
        Some(GeoPackageExporter::new(destination.path.clone()).export(features));
}

#[when("I export the route to a GeoPackage")]
fn export_route(
    #[from(destination)] destination: &Destination,
    #[from(table)] table: &TableCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    export(destination, table, outcome);
}

#[when("I export the table to a GeoPackage")]
fn export_table(
    #[from(destination)] destination: &Destination,
    #[from(table)] table: &TableCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    export(destination, table, outcome);
}

// --- Then steps ---

#[then("the layer holds 3 point features")]
fn three_features(
    #[from(destination)] destination: &Destination,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let borrowed = outcome.borrow();
    assert_eq!(borrowed.as_ref(), Some(&Ok(3)));
    assert_eq!(count_features(destination), 3);
}

#[then("the features keep the visiting order")]
fn visiting_order(#[from(destination)] destination: &Destination) {
    let db = Connection::open(destination.path.as_std_path()).expect("open output");
    let mut query = db
        .prepare("SELECT descriptor FROM points_layer ORDER BY fid")
        .expect("prepare");
    let names: Vec<String> = query
        .query_map([], |row| row.get(0))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows");
    assert_eq!(names, ["Duomo", "Brera", "Navigli"]);
}

#[then("a missing geometry fields error is returned")]
fn missing_geometry(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    assert_eq!(
        borrowed.as_ref(),
        Some(&Err(ExportError::MissingGeometryFields))
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/gpkg_export.feature", name = $title)]
        fn $fn_name(destination: Destination, table: TableCell, outcome: OutcomeCell) {
            let _ = (destination, table, outcome);
        }
    };
}

register_scenario!(exporting_open_route, "exporting an open route");
register_scenario!(replacing_previous_export, "replacing a previous export");
register_scenario!(
    rejecting_table_without_coordinates,
    "rejecting a table without coordinates"
);
