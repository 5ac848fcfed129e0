//! HTTP client for the environment backend (`/places`, `/environment`, `/status`).

use std::sync::Arc;

use reqwest::Client;
use tracing::instrument;

use crate::types::{
    EnvError, EnvironmentReport, EnvironmentSnapshot, PlaceSuggestion, PlacesResponse,
    ServiceStatus,
};

/// Backend client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct EnvClient {
    client: Arc<Client>,
    base_url: String,
}

impl EnvClient {
    /// No request timeout is set beyond the HTTP client defaults.
    pub fn new(base_url: &str) -> Result<Self, EnvError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search cities by name. `query` is sent as typed.
    #[instrument(skip(self), level = "debug")]
    pub async fn search_places(&self, query: &str) -> Result<Vec<PlaceSuggestion>, EnvError> {
        let url = format!("{}/places?q={}", self.base_url, urlencoding::encode(query));

        let body = self.get_text(&url).await?;
        let resp: PlacesResponse = serde_json::from_str(&body)?;

        Ok(resp.results.unwrap_or_default())
    }

    /// Fetch the environment summary for a coordinate.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_environment(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<EnvironmentReport, EnvError> {
        let url = format!("{}/environment?lat={}&lon={}", self.base_url, lat, lon);

        let raw = self.get_text(&url).await?;
        let snapshot: EnvironmentSnapshot = serde_json::from_str(&raw)?;

        tracing::debug!("Environment snapshot parsed ({} bytes)", raw.len());
        Ok(EnvironmentReport { snapshot, raw })
    }

    /// Backend liveness probe.
    #[instrument(skip(self), level = "info")]
    pub async fn status(&self) -> Result<ServiceStatus, EnvError> {
        let url = format!("{}/status", self.base_url);
        let body = self.get_text(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, url: &str) -> Result<String, EnvError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(EnvError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
