//! OSRM API response types for the Route and Table services.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service> and
//! <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// Status code OSRM reports for a successful request.
const OK: &str = "Ok";

/// OSRM Route API response.
///
/// Common `code` values besides `"Ok"` are `"NoRoute"`, `"NoSegment"` and
/// `"InvalidQuery"`.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    pub code: String,
    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Length of the route in metres.
    pub distance: f64,
    /// Travel time in seconds.
    pub duration: f64,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == OK
    }
}

/// OSRM Table API response requested with `annotations=distance`.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code from OSRM.
    pub code: String,
    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,
    /// Matrix of distances in metres; `None` where no route exists.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == OK
    }
}
