//! Nominatim-backed `Geocoder`.

use std::time::Duration;

use geo::Coord;
use url::Url;
use wayfarer_core::{Geocoder, ProviderError, parse_coordinate_literal};

use super::nominatim::Place;
use crate::http::{BlockingClient, ClientBuildError, parse_base_url};

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent; Nominatim's usage policy requires one.
const DEFAULT_USER_AGENT: &str = "wayfarer-geocoder/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpGeocoder`].
#[derive(Debug, Clone)]
pub struct HttpGeocoderConfig {
    /// Base URL of the Nominatim service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Restrict matches to these ISO 3166-1 alpha-2 codes, comma separated.
    pub country_codes: Option<String>,
}

impl Default for HttpGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            country_codes: None,
        }
    }
}

impl HttpGeocoderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
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

    /// Restrict results to the given countries.
    #[must_use]
    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = Some(codes.into());
        self
    }
}

/// Geocoder resolving descriptors through Nominatim's search API.
///
/// Only the best match is used. A descriptor with no match fails with
/// [`ProviderError::NotFound`].
#[derive(Debug)]
pub struct HttpGeocoder {
    http: BlockingClient,
    base_url: Url,
    config: HttpGeocoderConfig,
}

impl HttpGeocoder {
    /// Create a geocoder with default configuration against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpGeocoderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpGeocoderConfig) -> Result<Self, ClientBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = BlockingClient::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    fn build_search_url(&self, descriptor: &str) -> Result<Url, ProviderError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|err| ProviderError::ParseError {
                message: err.to_string(),
            })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", descriptor)
                .append_pair("format", "jsonv2")
                .append_pair("limit", "1");
            if let Some(codes) = &self.config.country_codes {
                query.append_pair("countrycodes", codes);
            }
        }
        Ok(url)
    }
}

impl Geocoder for HttpGeocoder {
    fn resolve(&self, descriptor: &str) -> Result<Coord<f64>, ProviderError> {
        if let Some(coord) = parse_coordinate_literal(descriptor) {
            log::debug!("{descriptor:?} is a coordinate literal");
            return Ok(coord);
        }
        let url = self.build_search_url(descriptor.trim())?;
        let places: Vec<Place> = self.http.get_json(&url)?;
        first_match(descriptor, &places)
    }
}

fn first_match(descriptor: &str, places: &[Place]) -> Result<Coord<f64>, ProviderError> {
    let Some(place) = places.first() else {
        return Err(ProviderError::NotFound {
            descriptor: descriptor.to_owned(),
        });
    };
    let coord = place.coord().ok_or_else(|| ProviderError::ParseError {
        message: format!(
            "invalid coordinates {:?}, {:?} for {descriptor:?}",
            place.lat, place.lon
        ),
    })?;
    log::debug!(
        "resolved {descriptor:?} to {} ({}, {})",
        place.display_name.as_deref().unwrap_or("unnamed place"),
        coord.y,
        coord.x
    );
    Ok(coord)
}
