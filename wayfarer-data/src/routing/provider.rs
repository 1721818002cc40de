//! HTTP-based `DistanceProvider` using OSRM's Route and Table APIs.
//!
//! Each pairwise query asks the Route service for the fastest route between
//! two resolved nodes and reports its length in kilometres, rounded to three
//! decimals. With [`MatrixStrategy::Table`] the whole matrix is fetched in a
//! single Table request instead.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use wayfarer_core::{DistanceProvider, Node};
//! use wayfarer_data::routing::HttpDistanceProvider;
//!
//! let provider = HttpDistanceProvider::new("http://localhost:5000")?;
//! let from = Node::unresolved(0, "Politecnico").resolved(Coord { x: 9.2277, y: 45.4781 });
//! let to = Node::unresolved(1, "Duomo").resolved(Coord { x: 9.1919, y: 45.4642 });
//!
//! let km = provider.distance(&from, &to)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use geo::Coord;
use url::Url;
use wayfarer_core::{
    DistanceMatrix, DistanceProvider, MatrixBuildError, Node, ProviderError, pairwise_matrix,
};

use super::osrm::{RouteResponse, TableResponse};
use crate::http::{BlockingClient, ClientBuildError, parse_base_url};

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "wayfarer-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How [`HttpDistanceProvider`] builds a full matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixStrategy {
    /// One Route request per ordered pair of distinct nodes.
    #[default]
    Pairwise,
    /// One Table request with `annotations=distance` for all nodes.
    Table,
}

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment, such as `driving`, `walking` or `cycling`.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Matrix construction strategy.
    pub strategy: MatrixStrategy,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            strategy: MatrixStrategy::Pairwise,
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the matrix construction strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: MatrixStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// HTTP-based distance provider using the OSRM routing service.
///
/// Nodes must be resolved to coordinates first; unresolved nodes fail with
/// [`ProviderError::Unresolved`]. Distances are directional.
#[derive(Debug)]
pub struct HttpDistanceProvider {
    http: BlockingClient,
    base_url: Url,
    config: HttpDistanceProviderConfig,
}

impl HttpDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ClientBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = BlockingClient::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for one ordered pair.
    ///
    /// The URL format is
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=false`.
    fn build_route_url(&self, from: Coord<f64>, to: Coord<f64>) -> Result<Url, ProviderError> {
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            self.config.profile, from.x, from.y, to.x, to.y
        );
        let mut url = join(&self.base_url, &path)?;
        url.query_pairs_mut().append_pair("overview", "false");
        Ok(url)
    }

    /// Build the OSRM Table API URL requesting distances between `coords`.
    fn build_table_url(&self, coords: &[Coord<f64>]) -> Result<Url, ProviderError> {
        let joined = coords
            .iter()
            .map(|coord| format!("{},{}", coord.x, coord.y))
            .collect::<Vec<_>>()
            .join(";");
        let mut url = join(
            &self.base_url,
            &format!("table/v1/{}/{joined}", self.config.profile),
        )?;
        url.query_pairs_mut().append_pair("annotations", "distance");
        Ok(url)
    }

    fn table_matrix(&self, nodes: &[Node]) -> Result<DistanceMatrix, MatrixBuildError> {
        if nodes.is_empty() {
            return Err(ProviderError::EmptyInput.into());
        }
        let coords = nodes
            .iter()
            .map(location)
            .collect::<Result<Vec<_>, _>>()?;
        let url = self.build_table_url(&coords)?;
        let response: TableResponse = self.http.get_json(&url)?;
        let rows = convert_table(response, nodes)?;
        log::debug!("fetched {0}x{0} distance table", nodes.len());
        Ok(DistanceMatrix::new(rows)?)
    }
}

impl DistanceProvider for HttpDistanceProvider {
    fn distance(&self, from: &Node, to: &Node) -> Result<f64, ProviderError> {
        let url = self.build_route_url(location(from)?, location(to)?)?;
        let response: RouteResponse = self.http.get_json(&url)?;
        convert_route(response, from, to)
    }

    fn distance_matrix(&self, nodes: &[Node]) -> Result<DistanceMatrix, MatrixBuildError> {
        match self.config.strategy {
            MatrixStrategy::Pairwise => pairwise_matrix(self, nodes),
            MatrixStrategy::Table => self.table_matrix(nodes),
        }
    }
}

fn location(node: &Node) -> Result<Coord<f64>, ProviderError> {
    node.location.ok_or_else(|| ProviderError::Unresolved {
        descriptor: node.descriptor.clone(),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path).map_err(|err| ProviderError::ParseError {
        message: format!("cannot build request URL from {path:?}: {err}"),
    })
}

/// Convert metres to kilometres rounded to three decimals.
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
fn metres_to_km(metres: f64) -> f64 {
    metres.round() / 1000.0
}

fn checked_km(metres: f64) -> Result<f64, ProviderError> {
    if metres.is_finite() && metres >= 0.0 {
        Ok(metres_to_km(metres))
    } else {
        Err(ProviderError::ParseError {
            message: format!("OSRM returned invalid distance {metres}"),
        })
    }
}

/// Convert an OSRM Route response into a distance in kilometres.
fn convert_route(response: RouteResponse, from: &Node, to: &Node) -> Result<f64, ProviderError> {
    let no_route = || ProviderError::NoRoute {
        from: from.descriptor.clone(),
        to: to.descriptor.clone(),
    };
    if !response.is_ok() {
        if response.code == "NoRoute" {
            return Err(no_route());
        }
        return Err(ProviderError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let route = response.routes.first().ok_or_else(no_route)?;
    checked_km(route.distance)
}

/// Convert an OSRM Table response into matrix rows in kilometres.
fn convert_table(response: TableResponse, nodes: &[Node]) -> Result<Vec<Vec<f64>>, ProviderError> {
    if !response.is_ok() {
        return Err(ProviderError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let distances = response
        .distances
        .ok_or_else(|| ProviderError::ParseError {
            message: "OSRM response missing distances array".to_owned(),
        })?;
    distances
        .into_iter()
        .zip(nodes)
        .map(|(row, from)| {
            row.into_iter()
                .zip(nodes)
                .map(|(cell, to)| {
                    if from.index == to.index {
                        return Ok(0.0);
                    }
                    cell.map_or_else(
                        || {
                            Err(ProviderError::NoRoute {
                                from: from.descriptor.clone(),
                                to: to.descriptor.clone(),
                            })
                        },
                        checked_km,
                    )
                })
                .collect()
        })
        .collect()
}
