//! Dashboard state: coordinate inputs, the rendered environment summary and
//! the fetch lifecycle around it.

use ecomonitor_env::{aqi, AqiBucket, EnvClient, EnvironmentSnapshot, PlaceSuggestion};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::i18n::{Strings, PLACEHOLDER};
use crate::services::{request_environment_fetch, EnvironmentError, EnvironmentServiceMessage};

/// Display-ready dashboard fields. Placeholders are applied here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub temperature: String,
    pub aqi_value: String,
    pub aqi_bucket: Option<AqiBucket>,
    pub aqi_status: String,
    /// ARGB
    pub aqi_color: u32,
    /// ARGB
    pub aqi_text_color: u32,
    pub pm2_5: String,
    pub pm10: String,
    pub rain_probability: String,
    pub rain_total: String,
    pub rain_risk: String,
    pub air_risk: String,
    pub flood_risk: String,
}

impl DashboardView {
    /// Every field unknown, as before the first fetch.
    pub fn empty(strings: &Strings) -> Self {
        Self::from_snapshot(&EnvironmentSnapshot::default(), strings)
    }

    pub fn from_snapshot(snapshot: &EnvironmentSnapshot, strings: &Strings) -> Self {
        let current = &snapshot.current;
        let next = &snapshot.next_hours;
        let risk = &snapshot.risk;

        let bucket = AqiBucket::from_conditions(current);
        let (aqi_color, aqi_text_color) = match bucket {
            Some(b) => (b.color(), b.text_color()),
            None => (aqi::UNKNOWN_COLOR, 0xFFFF_FFFF),
        };

        Self {
            temperature: or_placeholder(current.temperature_c, |t| format!("{:.1}", t)),
            aqi_value: or_placeholder(current.us_aqi, |v| format!("{}", v.trunc() as i64)),
            aqi_bucket: bucket,
            aqi_status: strings.aqi_label(bucket).to_string(),
            aqi_color,
            aqi_text_color,
            pm2_5: or_placeholder(current.pm2_5, |v| format!("{:.1} µg/m³", v)),
            pm10: or_placeholder(current.pm10, |v| format!("{:.1} µg/m³", v)),
            rain_probability: or_placeholder(next.max_precipitation_probability_next6h_pct, |p| {
                format!("{}%", p.trunc() as i64)
            }),
            rain_total: or_placeholder(next.total_precipitation_next6h_mm, |mm| {
                format!("{:.1} mm", mm)
            }),
            rain_risk: chip(strings.rain_risk, strings.translate_risk(risk.rain.as_deref())),
            air_risk: chip(strings.air_risk, strings.translate_risk(risk.air_quality.as_deref())),
            flood_risk: chip(strings.flood_risk, strings.translate_risk(risk.flood.as_deref())),
        }
    }
}

fn or_placeholder(value: Option<f64>, format: impl FnOnce(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn chip(label: &str, value: String) -> String {
    format!("{}: {}", label, value)
}

/// Why `fetch` did not send a request
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRejected {
    MissingCoordinates,
    InvalidCoordinate(String),
}

pub struct DashboardModel {
    client: EnvClient,
    runtime: Handle,
    tx: UnboundedSender<EnvironmentServiceMessage>,
    strings: &'static Strings,

    latitude: String,
    longitude: String,
    place_label: Option<String>,

    snapshot: Option<EnvironmentSnapshot>,
    view: DashboardView,
    raw_output: String,
    message: Option<String>,
    loading: bool,
    /// Bumped per dispatched fetch; only the latest completion is applied
    generation: u64,
}

impl DashboardModel {
    pub fn new(
        client: EnvClient,
        runtime: Handle,
        tx: UnboundedSender<EnvironmentServiceMessage>,
        strings: &'static Strings,
    ) -> Self {
        Self {
            client,
            runtime,
            tx,
            strings,
            latitude: String::new(),
            longitude: String::new(),
            place_label: None,
            snapshot: None,
            view: DashboardView::empty(strings),
            raw_output: String::new(),
            message: None,
            loading: false,
            generation: 0,
        }
    }

    /// Fetch the environment for the current coordinate fields.
    pub fn fetch(&mut self) -> Result<(f64, f64), FetchRejected> {
        if self.latitude.trim().is_empty() || self.longitude.trim().is_empty() {
            self.message = Some(self.strings.provide_lat_lon.to_string());
            return Err(FetchRejected::MissingCoordinates);
        }

        let parsed = (
            parse_coordinate(&self.latitude),
            parse_coordinate(&self.longitude),
        );
        let (lat, lon) = match parsed {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, _) => return Err(self.reject_invalid(self.latitude.clone())),
            (_, None) => return Err(self.reject_invalid(self.longitude.clone())),
        };

        self.generation += 1;
        tracing::info!(
            "Fetching environment for ({}, {}) [gen {}]",
            lat,
            lon,
            self.generation
        );
        self.loading = true;
        self.message = Some(self.strings.loading.to_string());
        request_environment_fetch(
            &self.runtime,
            &self.tx,
            self.client.clone(),
            self.generation,
            lat,
            lon,
        );
        Ok((lat, lon))
    }

    fn reject_invalid(&mut self, input: String) -> FetchRejected {
        self.message = Some(format!(
            "{}: {} '{}'",
            self.strings.error,
            self.strings.invalid_coordinate,
            input.trim()
        ));
        FetchRejected::InvalidCoordinate(input)
    }

    /// Apply a fetch result. On failure the previous dashboard stays as it was.
    /// Completions of superseded fetches are dropped and leave `loading` set.
    pub fn on_fetch_done(
        &mut self,
        message: EnvironmentServiceMessage,
    ) -> Result<(), EnvironmentError> {
        let EnvironmentServiceMessage::FetchDone { generation, result } = message;
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale environment result (gen {} != {})",
                generation,
                self.generation
            );
            return Ok(());
        }
        self.loading = false;

        match result {
            Ok(report) => {
                self.view = DashboardView::from_snapshot(&report.snapshot, self.strings);
                self.snapshot = Some(report.snapshot);
                self.raw_output = report.raw;
                self.message = None;
                Ok(())
            }
            Err(e) => {
                self.message = Some(format!("{}: {}", self.strings.error, e));
                Err(e)
            }
        }
    }

    /// Re-render in another language without refetching.
    pub fn set_strings(&mut self, strings: &'static Strings) {
        self.strings = strings;
        self.view = match &self.snapshot {
            Some(snapshot) => DashboardView::from_snapshot(snapshot, strings),
            None => DashboardView::empty(strings),
        };
    }

    /// Coordinates are written only when the suggestion has both.
    pub fn apply_suggestion(&mut self, suggestion: &PlaceSuggestion) {
        if let Some((lat, lon)) = suggestion.coordinates() {
            self.latitude = lat.to_string();
            self.longitude = lon.to_string();
        }
        self.place_label = Some(suggestion.display_name());
    }

    /// Fill the fields from a location fix.
    pub fn set_fix(&mut self, latitude: f64, longitude: f64) {
        self.latitude = format!("{:.4}", latitude);
        self.longitude = format!("{:.4}", longitude);
    }

    pub fn set_place(&mut self, latitude: f64, longitude: f64, name: Option<&str>) {
        let name = name.unwrap_or(self.strings.unknown);
        self.place_label = Some(format!("{} ({:.4}, {:.4})", name, latitude, longitude));
    }

    pub fn set_latitude(&mut self, text: impl Into<String>) {
        self.latitude = text.into();
    }

    pub fn set_longitude(&mut self, text: impl Into<String>) {
        self.longitude = text.into();
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn place_label(&self) -> Option<&str> {
        self.place_label.as_deref()
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn snapshot(&self) -> Option<&EnvironmentSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
