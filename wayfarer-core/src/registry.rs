//! Location registry: turns descriptors into an indexed node list.
//!
//! The origin is always placed at index 0 and destinations follow in the
//! order given. Coordinates are not resolved here; see
//! [`LocationRegistry::resolve_with`].

use thiserror::Error;

use crate::{Geocoder, Node, ProviderError};

/// Errors returned by [`LocationRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A descriptor was empty or whitespace only.
    #[error("descriptor at position {position} is blank")]
    BlankDescriptor {
        /// Node index the descriptor would have received.
        position: usize,
    },
    /// A destination repeats the origin descriptor.
    ///
    /// Such a destination would only add a zero-length edge, so it is
    /// rejected rather than silently deduplicated.
    #[error("destination {position} ({descriptor:?}) duplicates the origin")]
    DuplicateOrigin {
        /// Node index of the offending destination.
        position: usize,
        /// The duplicated descriptor as supplied.
        descriptor: String,
    },
}

/// Ordered set of nodes with the origin at index 0.
///
/// # Examples
/// ```
/// use wayfarer_core::LocationRegistry;
///
/// # fn main() -> Result<(), wayfarer_core::RegistryError> {
/// let registry = LocationRegistry::register(
///     "Politecnico di Milano",
///     &["Notre Dame de Paris", "48.8583701, 2.2944813"],
/// )?;
/// assert_eq!(registry.len(), 3);
/// assert_eq!(
///     registry.origin().map(|node| node.descriptor.as_str()),
///     Some("Politecnico di Milano")
/// );
/// assert_eq!(registry.destinations().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRegistry {
    nodes: Vec<Node>,
}

impl LocationRegistry {
    /// Register an origin and its destinations.
    ///
    /// An empty destination list is valid and yields a single-node registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BlankDescriptor`] for empty descriptors and
    /// [`RegistryError::DuplicateOrigin`] when a destination matches the
    /// origin (ignoring surrounding whitespace and ASCII case).
    pub fn register<S>(origin: &str, destinations: &[S]) -> Result<Self, RegistryError>
    where
        S: AsRef<str>,
    {
        let origin_key = normalise(origin);
        if origin_key.is_empty() {
            return Err(RegistryError::BlankDescriptor { position: 0 });
        }

        let mut nodes = Vec::with_capacity(destinations.len() + 1);
        nodes.push(Node::unresolved(0, origin.trim()));
        for (offset, destination) in destinations.iter().enumerate() {
            let position = offset + 1;
            let descriptor = destination.as_ref();
            let key = normalise(descriptor);
            if key.is_empty() {
                return Err(RegistryError::BlankDescriptor { position });
            }
            if key == origin_key {
                return Err(RegistryError::DuplicateOrigin {
                    position,
                    descriptor: descriptor.to_owned(),
                });
            }
            nodes.push(Node::unresolved(position, descriptor.trim()));
        }
        log::debug!("registered origin and {} destination(s)", destinations.len());
        Ok(Self { nodes })
    }

    /// Resolve every node's coordinates with `geocoder`.
    ///
    /// Nodes that already carry a location are kept as they are.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ProviderError`] returned by the geocoder.
    pub fn resolve_with<G>(self, geocoder: &G) -> Result<Self, ProviderError>
    where
        G: Geocoder + ?Sized,
    {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| {
                if node.location.is_some() {
                    return Ok(node);
                }
                let location = geocoder.resolve(&node.descriptor)?;
                Ok(node.resolved(location))
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;
        Ok(Self { nodes })
    }

    /// The origin node, always present in a registered set.
    #[must_use]
    pub fn origin(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Destination nodes in index order.
    #[must_use]
    pub fn destinations(&self) -> &[Node] {
        self.nodes.split_first().map_or(&[], |(_, rest)| rest)
    }

    /// Node at `index`, if registered.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// All nodes in index order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consume the registry, returning its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Number of nodes, origin included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a registry holds at least the origin.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn normalise(descriptor: &str) -> String {
    descriptor.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    use crate::test_support::FixedGeocoder;

    #[rstest]
    fn origin_is_index_zero() {
        let registry =
            LocationRegistry::register("home", &["bakery", "library"]).expect("valid input");
        let indices: Vec<usize> = registry.nodes().iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(registry.get(2).map(|n| n.descriptor.as_str()), Some("library"));
    }

    #[rstest]
    fn origin_only_registry_is_valid() {
        let registry = LocationRegistry::register::<&str>("home", &[]).expect("valid input");
        assert_eq!(registry.len(), 1);
        assert!(registry.origin().is_some_and(Node::is_origin));
        assert!(registry.destinations().is_empty());
    }

    #[rstest]
    #[case("", &["a"], 0)]
    #[case("home", &["a", "   "], 2)]
    fn blank_descriptors_are_rejected(
        #[case] origin: &str,
        #[case] destinations: &[&str],
        #[case] position: usize,
    ) {
        let err = LocationRegistry::register(origin, destinations).expect_err("blank input");
        assert_eq!(err, RegistryError::BlankDescriptor { position });
    }

    #[rstest]
    fn duplicate_origin_is_rejected() {
        let err = LocationRegistry::register("Home", &["bakery", " home "])
            .expect_err("origin repeated");
        assert!(matches!(
            err,
            RegistryError::DuplicateOrigin { position: 2, .. }
        ));
    }

    #[rstest]
    fn resolving_annotates_every_node() {
        let registry =
            LocationRegistry::register("home", &["bakery"]).expect("valid input");
        let geocoder = FixedGeocoder::new()
            .with_location("home", Coord { x: 1.0, y: 2.0 })
            .with_location("bakery", Coord { x: 3.0, y: 4.0 });

        let resolved = registry.resolve_with(&geocoder).expect("all known");
        assert_eq!(resolved.origin().and_then(Node::lat), Some(2.0));
        assert_eq!(resolved.get(1).and_then(Node::long), Some(3.0));
    }

    #[rstest]
    fn resolving_propagates_geocoder_errors() {
        let registry =
            LocationRegistry::register("home", &["nowhere"]).expect("valid input");
        let geocoder = FixedGeocoder::new().with_location("home", Coord { x: 1.0, y: 2.0 });

        let err = registry.resolve_with(&geocoder).expect_err("unknown place");
        assert!(matches!(err, ProviderError::NotFound { .. }));
    }
}
