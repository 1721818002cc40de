//! Errors shared by the distance-provider and geocoder boundaries.

use thiserror::Error;

/// Errors from [`DistanceProvider`](crate::DistanceProvider) and
/// [`Geocoder`](crate::Geocoder) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No nodes were provided.
    #[error("at least one node is required")]
    EmptyInput,
    /// A node has no coordinates but the provider needs them.
    #[error("location {descriptor:?} has not been resolved to coordinates")]
    Unresolved {
        /// Descriptor of the unresolved node.
        descriptor: String,
    },
    /// The geocoder found no match for a descriptor.
    #[error("no location found for {descriptor:?}")]
    NotFound {
        /// Descriptor that could not be resolved.
        descriptor: String,
    },
    /// The routing service found no route between two locations.
    #[error("no route from {from:?} to {to:?}")]
    NoRoute {
        /// Descriptor of the source location.
        from: String,
        /// Descriptor of the target location.
        to: String,
    },
    /// Network-level failure (connection refused, DNS failure, etc.).
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// The URL that was requested.
        url: String,
        /// Underlying error description.
        message: String,
    },
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs} s")]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response description.
        message: String,
    },
    /// The service reported an application-level error (quota, bad query).
    #[error("service error {code}: {message}")]
    ServiceError {
        /// Service-specific status code.
        code: String,
        /// Service-provided message.
        message: String,
    },
    /// The response body could not be interpreted.
    #[error("failed to parse response: {message}")]
    ParseError {
        /// Description of the parse failure.
        message: String,
    },
}
