//! Reverse geocoding: convert coordinates to human-readable place names.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::types::{EnvError, Location};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    suburb: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
}

impl ReverseGeocoder {
    /// `user_agent` identifies the caller, as Nominatim's usage policy requires.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, EnvError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reverse geocode a location to e.g. "Curitiba, Paraná, Brasil".
    ///
    /// Returns `None` on any failure or when the service knows no name; the
    /// caller shows its "unknown" placeholder.
    pub async fn reverse_geocode(&self, location: &Location) -> Option<String> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}&zoom=10&addressdetails=1",
            self.base_url, location.latitude, location.longitude
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let result = place_name(body);
        if let Some(name) = &result {
            tracing::info!("Reverse geocoded to: {}", name);
        }
        result
    }
}

/// Locality (city > town > village > suburb), then state, then country,
/// joined with ", "; `display_name` when none of them are present.
fn place_name(body: NominatimResponse) -> Option<String> {
    let addr = body.address.unwrap_or_default();

    let locality = addr
        .city
        .or(addr.town)
        .or(addr.village)
        .or(addr.suburb);

    let joined = [locality, addr.state, addr.country]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if !joined.is_empty() {
        return Some(joined);
    }

    body.display_name.filter(|name| !name.trim().is_empty())
}
