//! GeoPackage binary geometry for points.
//!
//! A blob is the `GP` header (magic, version, flags, SRS id) followed by a
//! standard WKB geometry. No envelope is written for points.

use geo::Coord;

/// `G`, `P`, version 0.
const MAGIC: [u8; 3] = [b'G', b'P', 0];
/// Little-endian byte order, no envelope, not empty.
const FLAGS: u8 = 0b0000_0001;
/// WKB byte order marker for little-endian.
const WKB_LITTLE_ENDIAN: u8 = 1;
/// WKB geometry type code for `Point`.
const WKB_POINT: u32 = 1;

/// Length of an encoded point blob in bytes.
pub const POINT_BLOB_LEN: usize = 8 + 1 + 4 + 16;

/// Encode `coord` as a GeoPackage point blob in `srs_id`.
#[expect(
    clippy::little_endian_bytes,
    reason = "the header flags declare little-endian byte order"
)]
pub fn encode_point(coord: Coord<f64>, srs_id: i32) -> Vec<u8> {
    let mut blob = Vec::with_capacity(POINT_BLOB_LEN);
    blob.extend_from_slice(&MAGIC);
    blob.push(FLAGS);
    blob.extend_from_slice(&srs_id.to_le_bytes());
    blob.push(WKB_LITTLE_ENDIAN);
    blob.extend_from_slice(&WKB_POINT.to_le_bytes());
    blob.extend_from_slice(&coord.x.to_le_bytes());
    blob.extend_from_slice(&coord.y.to_le_bytes());
    blob
}
