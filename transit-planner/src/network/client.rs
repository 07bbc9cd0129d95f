//! Network API HTTP client.
//!
//! Provides async methods for querying route stop lists, stop
//! correspondences, route shapes and the line catalog from the transit
//! operator's JSON API. Handles authentication, concurrency limiting, and
//! conversion to domain types.

use std::sync::Arc;

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::trace;

use crate::domain::{Coordinate, Correspondence, Line, RouteId, Stop, StopId};

use super::dto::{
    CorrespondenceDto, LineDto, ShapePointDto, StopDto, convert_correspondences, convert_lines,
    convert_shape, convert_stops,
};
use super::error::NetworkError;
use super::provider::NetworkProvider;

/// Default base URL for the network API.
const DEFAULT_BASE_URL: &str = "https://api.transit.example/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the network client.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// API key for authentication (may be empty for open endpoints)
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NetworkConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Network API client.
///
/// Uses a semaphore to limit concurrent requests, since graph building fans
/// out one request per line and one per stop.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
}

impl NetworkClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();

        if !config.api_key.is_empty() {
            let api_key =
                HeaderValue::from_str(&config.api_key).map_err(|_| NetworkError::Api {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                })?;
            headers.insert("x-apikey", api_key);
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| NetworkError::Api {
            status: 0,
            message: format!("Invalid base URL {}: {e}", config.base_url),
        })?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the full line catalog.
    pub async fn fetch_lines(&self) -> Result<Vec<Line>, NetworkError> {
        let dtos: Vec<LineDto> = self.get_json(&["lines"], "line catalog").await?;
        Ok(convert_lines(dtos))
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// Ids may contain `/`, `?` or `#`; they must stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, NetworkError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| NetworkError::Api {
                status: 0,
                message: format!("Base URL cannot take a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `{base_url}/{segments..}` and decode the JSON body.
    ///
    /// `what` names the resource in `NotFound` errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &str,
    ) -> Result<T, NetworkError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| NetworkError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.endpoint(segments)?;
        trace!(url = %url, "Network API request");

        let response = self.http.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(NetworkError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NetworkError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(NetworkError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // The API answers unknown ids with an empty body or a literal null
        if body.is_empty() || body == "null" {
            return Err(NetworkError::NotFound(what.to_string()));
        }

        serde_json::from_str(&body).map_err(|e| NetworkError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl NetworkProvider for NetworkClient {
    async fn fetch_stops_for_route(&self, route: &RouteId) -> Result<Vec<Stop>, NetworkError> {
        let segments = ["routes", route.as_str(), "stops"];
        let dtos: Vec<StopDto> = self.get_json(&segments, &format!("route {route}")).await?;
        Ok(convert_stops(dtos))
    }

    async fn fetch_correspondences(
        &self,
        stop: &StopId,
    ) -> Result<Vec<Correspondence>, NetworkError> {
        let segments = ["stops", stop.as_str(), "correspondences"];
        let dtos: Vec<CorrespondenceDto> =
            self.get_json(&segments, &format!("stop {stop}")).await?;
        Ok(convert_correspondences(dtos))
    }

    async fn fetch_route_shape(&self, route: &RouteId) -> Result<Vec<Coordinate>, NetworkError> {
        let segments = ["routes", route.as_str(), "shape"];
        let dtos: Vec<ShapePointDto> = self
            .get_json(&segments, &format!("shape of route {route}"))
            .await?;
        Ok(convert_shape(dtos))
    }
}
