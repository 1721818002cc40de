//! Metadata tables and feature-table DDL for a GeoPackage 1.3 file.

use rusqlite::{Connection, Transaction, params};
use wayfarer_core::{FeatureTable, FieldValue};

/// `GPKG` as a big-endian integer, stored in the SQLite header.
pub const APPLICATION_ID: i32 = 0x4750_4B47;
/// GeoPackage 1.3.0.
pub const USER_VERSION: i32 = 10_300;
/// EPSG code for WGS84 geographic coordinates.
pub const WGS84_SRS_ID: i32 = 4326;

/// Name of the primary key column in feature tables.
pub const FID_COLUMN: &str = "fid";
/// Name of the geometry column in feature tables.
pub const GEOMETRY_COLUMN: &str = "geom";

const WGS84_DEFINITION: &str = concat!(
    r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
    r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,"#,
    r#"AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,"#,
    r#"AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]]"#
);

const CORE_TABLES: &str = "
CREATE TABLE gpkg_spatial_ref_sys (
    srs_name TEXT NOT NULL,
    srs_id INTEGER PRIMARY KEY,
    organization TEXT NOT NULL,
    organization_coordsys_id INTEGER NOT NULL,
    definition TEXT NOT NULL,
    description TEXT
);
CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    min_x DOUBLE,
    min_y DOUBLE,
    max_x DOUBLE,
    max_y DOUBLE,
    srs_id INTEGER,
    CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
CREATE TABLE gpkg_geometry_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    geometry_type_name TEXT NOT NULL,
    srs_id INTEGER NOT NULL,
    z TINYINT NOT NULL,
    m TINYINT NOT NULL,
    CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name),
    CONSTRAINT uk_gc_table_name UNIQUE (table_name),
    CONSTRAINT fk_gc_tn FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
    CONSTRAINT fk_gc_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
";

/// Bounding box of the exported points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Stamp the SQLite header so readers recognise a GeoPackage.
pub fn write_header(connection: &Connection) -> rusqlite::Result<()> {
    connection.pragma_update(None, "application_id", APPLICATION_ID)?;
    connection.pragma_update(None, "user_version", USER_VERSION)
}

/// Create the mandatory metadata tables and seed the required SRS rows.
pub fn create_core_tables(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(CORE_TABLES)?;
    let mut insert = tx.prepare(
        "INSERT INTO gpkg_spatial_ref_sys \
         (srs_name, srs_id, organization, organization_coordsys_id, definition, description) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    insert.execute(params![
        "WGS 84 geodetic",
        WGS84_SRS_ID,
        "EPSG",
        WGS84_SRS_ID,
        WGS84_DEFINITION,
        "longitude/latitude coordinates in decimal degrees on the WGS 84 spheroid"
    ])?;
    insert.execute(params![
        "Undefined cartesian SRS",
        -1,
        "NONE",
        -1,
        "undefined",
        "undefined cartesian coordinate reference system"
    ])?;
    insert.execute(params![
        "Undefined geographic SRS",
        0,
        "NONE",
        0,
        "undefined",
        "undefined geographic coordinate reference system"
    ])?;
    Ok(())
}

/// Create the feature table and register it in the metadata tables.
pub fn create_feature_table(
    tx: &Transaction<'_>,
    layer: &str,
    columns: &[(String, &'static str)],
    extent: Option<Extent>,
) -> rusqlite::Result<()> {
    let mut ddl = format!(
        "CREATE TABLE {} ({} INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, {} POINT",
        quote_identifier(layer),
        quote_identifier(FID_COLUMN),
        quote_identifier(GEOMETRY_COLUMN)
    );
    for (name, sql_type) in columns {
        ddl.push_str(", ");
        ddl.push_str(&quote_identifier(name));
        ddl.push(' ');
        ddl.push_str(sql_type);
    }
    ddl.push(')');
    tx.execute(&ddl, [])?;

    tx.execute(
        "INSERT INTO gpkg_contents \
         (table_name, data_type, identifier, min_x, min_y, max_x, max_y, srs_id) \
         VALUES (?1, 'features', ?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            layer,
            extent.map(|e| e.min_x),
            extent.map(|e| e.min_y),
            extent.map(|e| e.max_x),
            extent.map(|e| e.max_y),
            WGS84_SRS_ID
        ],
    )?;
    tx.execute(
        "INSERT INTO gpkg_geometry_columns \
         (table_name, column_name, geometry_type_name, srs_id, z, m) \
         VALUES (?1, ?2, 'POINT', ?3, 0, 0)",
        params![layer, GEOMETRY_COLUMN, WGS84_SRS_ID],
    )?;
    Ok(())
}

/// Attribute column names and SQL types for `table`.
///
/// Names clashing with the key or geometry column gain a `_` suffix. A
/// column's type is the widest of its values: text over real over integer.
/// Columns holding only nulls become `TEXT`.
pub fn attribute_columns(table: &FeatureTable) -> Vec<(String, &'static str)> {
    let mut taken: Vec<String> = vec![FID_COLUMN.to_owned(), GEOMETRY_COLUMN.to_owned()];
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut unique = name.clone();
            while taken.iter().any(|used| used.eq_ignore_ascii_case(&unique)) {
                unique.push('_');
            }
            taken.push(unique.clone());
            (unique, column_type(table, index))
        })
        .collect()
}

fn column_type(table: &FeatureTable, column: usize) -> &'static str {
    let mut seen_integer = false;
    let mut seen_real = false;
    for value in table.rows().iter().filter_map(|row| row.get(column)) {
        match value {
            FieldValue::Text(_) => return "TEXT",
            FieldValue::Real(_) => seen_real = true,
            FieldValue::Integer(_) => seen_integer = true,
            FieldValue::Null => {}
        }
    }
    match (seen_real, seen_integer) {
        (true, _) => "REAL",
        (false, true) => "INTEGER",
        (false, false) => "TEXT",
    }
}

/// Double-quote an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
