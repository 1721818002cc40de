//! Blocking HTTP client shared by the routing and geocoding adapters.
//!
//! The core traits are synchronous to keep the planner embeddable in
//! synchronous contexts. [`BlockingClient`] bridges async `reqwest` calls
//! to those traits by blocking on a Tokio runtime.
//!
//! # Runtime behaviour
//!
//! When called from outside any Tokio runtime, the client uses its own
//! `current_thread` runtime. When called from within a multi-threaded Tokio
//! runtime (detected via [`Handle::try_current()`] and
//! [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
//! [`tokio::task::block_in_place`] to avoid nested runtime panics. Inside a
//! `current_thread` runtime it falls back to its own runtime, which may
//! deadlock if the caller's runtime drives IO this request depends on.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;
use wayfarer_core::ProviderError;

/// Error type for HTTP adapter construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// An HTTP client paired with the runtime used to drive it.
pub(crate) struct BlockingClient {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    /// Fetch `url` and decode the JSON body, blocking the caller.
    pub(crate) fn get_json<T>(&self, url: &Url) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        self.block_on(self.fetch_json(url))
    }

    async fn fetch_json<T>(&self, url: &Url) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        response
            .json()
            .await
            .map_err(|err| ProviderError::ParseError {
                message: err.to_string(),
            })
    }

    fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ProviderError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Parse a base URL, making sure joined paths extend it rather than
/// replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ClientBuildError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|source| ClientBuildError::BaseUrl {
        url: base_url.to_owned(),
        source,
    })
}
