//! Registered locations.

use geo::Coord;

/// Label of the coordinate reference system used for resolved locations.
pub const WGS84: &str = "WGS84";

/// A location taking part in a tour.
///
/// Index 0 is always the origin; destinations follow in input order.
/// Coordinates are WGS84 with `x = longitude` and `y = latitude` and are
/// absent until a [`Geocoder`](crate::Geocoder) has resolved the descriptor.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::Node;
///
/// let node = Node::unresolved(0, "Politecnico di Milano");
/// assert!(node.location.is_none());
///
/// let node = node.resolved(Coord { x: 9.2277, y: 45.4781 });
/// assert_eq!(node.lat(), Some(45.4781));
/// assert_eq!(node.long(), Some(9.2277));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Position in the registry; 0 is the origin.
    pub index: usize,
    /// Free-form address, place name or coordinate string.
    pub descriptor: String,
    /// Resolved position, if known.
    pub location: Option<Coord<f64>>,
    /// Coordinate reference system of `location`.
    pub crs_label: String,
}

impl Node {
    /// Construct a node stub without coordinates.
    pub fn unresolved(index: usize, descriptor: impl Into<String>) -> Self {
        Self {
            index,
            descriptor: descriptor.into(),
            location: None,
            crs_label: WGS84.to_owned(),
        }
    }

    /// Return a copy of this node carrying `location`.
    #[must_use]
    pub fn resolved(self, location: Coord<f64>) -> Self {
        Self {
            location: Some(location),
            ..self
        }
    }

    /// Whether this node is the tour origin.
    #[must_use]
    pub const fn is_origin(&self) -> bool {
        self.index == 0
    }

    /// Latitude of the resolved location.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        self.location.map(|coord| coord.y)
    }

    /// Longitude of the resolved location.
    #[must_use]
    pub fn long(&self) -> Option<f64> {
        self.location.map(|coord| coord.x)
    }
}
