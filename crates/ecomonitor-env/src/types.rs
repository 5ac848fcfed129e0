use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One city candidate returned by the places search.
///
/// Every field is independently optional; a result with only a name is
/// still a valid suggestion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// First-level administrative region (state/province)
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl PlaceSuggestion {
    /// "name, region, country", skipping absent or empty parts
    pub fn display_name(&self) -> String {
        [&self.name, &self.admin1, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Coordinates, only when both halves are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}

impl std::fmt::Display for PlaceSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// `GET /places` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub results: Option<Vec<PlaceSuggestion>>,
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Conditions at the current hour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub precipitation_probability_pct: Option<f64>,
    /// US EPA AQI (0..500)
    pub us_aqi: Option<f64>,
    /// European AQI level (1..6)
    pub european_aqi: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

/// Six-hour outlook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextHours {
    pub max_precipitation_probability_next6h_pct: Option<f64>,
    pub total_precipitation_next6h_mm: Option<f64>,
    pub avg_pm2_5_next6h: Option<f64>,
}

/// Qualitative risk flags as computed by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFlags {
    #[serde(rename = "chuva")]
    pub rain: Option<String>,
    #[serde(rename = "qualidade_do_ar")]
    pub air_quality: Option<String>,
    #[serde(rename = "alagamento")]
    pub flood: Option<String>,
}

/// Daily river discharge series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DischargeSeries {
    pub time: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextDays {
    pub river_discharge_m3s_next7d: Option<DischargeSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// `GET /environment` response body.
///
/// Parsed once per fetch and never retained beyond the render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSnapshot {
    pub location: Option<Coordinates>,
    pub current: CurrentConditions,
    pub next_hours: NextHours,
    pub next_days: NextDays,
    pub risk: RiskFlags,
    pub sources: Vec<String>,
}

/// A parsed snapshot together with the body it came from
#[derive(Debug, Clone)]
pub struct EnvironmentReport {
    pub snapshot: EnvironmentSnapshot,
    pub raw: String,
}

/// `GET /status` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub ok: bool,
    pub service: String,
    pub utc: DateTime<Utc>,
}

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
}

/// Backend client errors
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for EnvError {
    fn from(e: serde_json::Error) -> Self {
        EnvError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn place(name: Option<&str>, admin1: Option<&str>, country: Option<&str>) -> PlaceSuggestion {
        PlaceSuggestion {
            name: name.map(String::from),
            admin1: admin1.map(String::from),
            country: country.map(String::from),
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn test_display_name_joins_present_parts() {
        let p = place(Some("Curitiba"), Some("Paraná"), Some("Brasil"));
        assert_eq!(p.display_name(), "Curitiba, Paraná, Brasil");
        assert_eq!(p.to_string(), "Curitiba, Paraná, Brasil");
    }

    #[test]
    fn test_display_name_skips_absent_and_empty() {
        assert_eq!(place(Some("Lisboa"), None, Some("Portugal")).display_name(), "Lisboa, Portugal");
        assert_eq!(place(Some("X"), Some(""), None).display_name(), "X");
        assert_eq!(place(None, None, None).display_name(), "");
    }

    #[test]
    fn test_coordinates_require_both_halves() {
        let mut p = place(Some("A"), None, None);
        p.lat = Some(1.0);
        assert_eq!(p.coordinates(), None);
        p.lon = Some(2.0);
        assert_eq!(p.coordinates(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_places_response_tolerates_missing_fields() {
        let body = r#"{"query":"cur","results":[{"name":"Curitiba","lat":-25.4,"lon":-49.2},{"country":"Brasil","admin1":null}],"error":null}"#;
        let resp: PlacesResponse = serde_json::from_str(body).unwrap();
        let results = resp.results.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].coordinates(), Some((-25.4, -49.2)));
        assert_eq!(results[1].name, None);
        assert_eq!(results[1].country.as_deref(), Some("Brasil"));
    }

    #[test]
    fn test_snapshot_parses_backend_sample() {
        let body = r#"{"current":{"temperature_c":25.3,"us_aqi":42,"pm2_5":8.1,"pm10":15.0},"next_hours":{"max_precipitation_probability_next6h_pct":60,"total_precipitation_next6h_mm":3.2},"risk":{"chuva":"moderate","qualidade_do_ar":"low","alagamento":"low"}}"#;
        let snap: EnvironmentSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.current.temperature_c, Some(25.3));
        assert_eq!(snap.current.us_aqi, Some(42.0));
        assert_eq!(snap.current.european_aqi, None);
        assert_eq!(snap.next_hours.max_precipitation_probability_next6h_pct, Some(60.0));
        assert_eq!(snap.risk.rain.as_deref(), Some("moderate"));
        assert_eq!(snap.risk.flood.as_deref(), Some("low"));
        assert!(snap.next_days.river_discharge_m3s_next7d.is_none());
    }

    #[test]
    fn test_snapshot_missing_blocks_default() {
        let snap: EnvironmentSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snap, EnvironmentSnapshot::default());
    }

    #[test]
    fn test_snapshot_wrong_type_is_error() {
        let result: Result<EnvironmentSnapshot, _> =
            serde_json::from_str(r#"{"current":{"temperature_c":"hot"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_parses_backend_extras() {
        let body = r#"{
            "location":{"lat":-23.55,"lon":-46.64},
            "current":{"temperature_c":null,"european_aqi":2},
            "next_hours":{"avg_pm2_5_next6h":7.5},
            "next_days":{"river_discharge_m3s_next7d":{"time":["2026-10-18"],"values":[null]}},
            "risk":{"chuva":"baixo"},
            "sources":["Open-Meteo Weather Forecast API"]
        }"#;
        let snap: EnvironmentSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.location, Some(Coordinates { lat: -23.55, lon: -46.64 }));
        assert_eq!(snap.current.temperature_c, None);
        assert_eq!(snap.current.european_aqi, Some(2.0));
        let series = snap.next_days.river_discharge_m3s_next7d.unwrap();
        assert_eq!(series.values, vec![None]);
        assert_eq!(snap.sources.len(), 1);
    }

    #[test]
    fn test_service_status_parses_utc() {
        let body = r#"{"ok":true,"service":"env-monitor-api-v2","utc":"2026-10-18T12:00:00+00:00"}"#;
        let status: ServiceStatus = serde_json::from_str(body).unwrap();
        assert!(status.ok);
        assert_eq!(status.utc.to_rfc3339(), "2026-10-18T12:00:00+00:00");
    }
}
