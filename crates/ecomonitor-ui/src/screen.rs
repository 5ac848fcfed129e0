//! The single screen and its event loop.
//!
//! `Screen` owns every piece of mutable UI state. User input and service
//! completions arrive on channels and are applied one at a time, each inside
//! the diagnostic boundary.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use ecomonitor_core::{AppError, Config, Language};
use ecomonitor_env::{EnvClient, LocationSource, ReverseGeocoder};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::debounce::{Debounced, Debouncer};
use crate::diagnostics::{guard, DiagnosticSink};
use crate::i18n::Strings;
use crate::models::{AutocompleteModel, DashboardModel, LocationModel, LocationUpdate};
use crate::services::{
    EnvironmentError, EnvironmentServiceMessage, LocationServiceMessage, PlacesServiceMessage,
};
use crate::view;

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// New contents of the city field
    Query(String),
    /// Search now, skipping the debounce
    Search,
    /// Zero-based suggestion index
    Select(usize),
    Fetch,
    Locate,
    Latitude(String),
    Longitude(String),
    ToggleRaw,
    ToggleLanguage,
    Help,
    Quit,
    Unknown(String),
}

impl InputEvent {
    /// Lines starting with ':' are commands; anything else is city text.
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim_end().strip_prefix(':') else {
            return Self::Query(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "search" | "s" => Self::Search,
            "select" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => Self::Select(n - 1),
                _ => Self::Unknown(line.trim().to_string()),
            },
            "fetch" | "f" => Self::Fetch,
            "locate" | "l" => Self::Locate,
            "lat" => Self::Latitude(arg.to_string()),
            "lon" => Self::Longitude(arg.to_string()),
            "raw" => Self::ToggleRaw,
            "lang" => Self::ToggleLanguage,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            _ => Self::Unknown(line.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Receiving ends for everything that feeds the loop besides user input
pub struct ScreenChannels {
    debounce: UnboundedReceiver<Debounced<String>>,
    places: UnboundedReceiver<PlacesServiceMessage>,
    environment: UnboundedReceiver<EnvironmentServiceMessage>,
    location: UnboundedReceiver<LocationServiceMessage>,
}

pub struct Screen {
    config: Arc<Config>,
    language: Language,
    strings: &'static Strings,
    show_raw: bool,
    query: String,
    notice: Option<String>,
    debouncer: Debouncer<String>,
    autocomplete: AutocompleteModel,
    dashboard: DashboardModel,
    location: LocationModel,
    diagnostics: DiagnosticSink,
}

impl Screen {
    pub fn new(
        config: Arc<Config>,
        runtime: Handle,
        source: LocationSource,
    ) -> Result<(Self, ScreenChannels), AppError> {
        let client = EnvClient::new(&config.services.api_base_url)
            .map_err(|e| AppError::from(EnvironmentError::from(e)))?;
        let geocoder =
            ReverseGeocoder::new(&config.services.geocoder_url, &config.services.user_agent)
                .map_err(|e| AppError::from(EnvironmentError::from(e)))?;

        let (debounce_tx, debounce) = mpsc::unbounded_channel();
        let (places_tx, places) = mpsc::unbounded_channel();
        let (environment_tx, environment) = mpsc::unbounded_channel();
        let (location_tx, location) = mpsc::unbounded_channel();

        let language = config.ui.language;
        let strings = Strings::for_language(language);
        let autocomplete = &config.autocomplete;

        let screen = Self {
            language,
            strings,
            show_raw: config.ui.show_raw,
            query: String::new(),
            notice: None,
            debouncer: Debouncer::new(
                Duration::from_millis(autocomplete.debounce_ms),
                runtime.clone(),
                debounce_tx,
            ),
            autocomplete: AutocompleteModel::new(
                client.clone(),
                runtime.clone(),
                places_tx,
                autocomplete.cache_capacity,
                autocomplete.min_query_chars,
            ),
            dashboard: DashboardModel::new(client, runtime.clone(), environment_tx, strings),
            location: LocationModel::new(source, geocoder, runtime, location_tx),
            diagnostics: DiagnosticSink::new(),
            config,
        };

        Ok((
            screen,
            ScreenChannels {
                debounce,
                places,
                environment,
                location,
            },
        ))
    }

    /// Seed the coordinate fields with the configured default and name it.
    pub fn start(&mut self) {
        let (lat, lon) = (
            self.config.ui.default_latitude,
            self.config.ui.default_longitude,
        );
        self.dashboard.set_fix(lat, lon);
        self.location.describe(lat, lon);
        tracing::info!("Screen started at ({}, {})", lat, lon);
    }

    /// Drive the loop until `:quit` or end of input, redrawing after every event.
    pub async fn run<W: Write>(
        mut self,
        mut channels: ScreenChannels,
        mut input: UnboundedReceiver<String>,
        out: &mut W,
        colored: bool,
    ) -> Result<(), AppError> {
        self.draw(out, colored)?;
        while self.step(&mut channels, &mut input).await == Flow::Continue {
            self.draw(out, colored)?;
        }
        tracing::info!("Screen closed");
        Ok(())
    }

    fn draw<W: Write>(&self, out: &mut W, colored: bool) -> Result<(), AppError> {
        if colored {
            write!(out, "\x1b[2J\x1b[H")?;
        }
        write!(out, "{}", view::render(self, colored))?;
        out.flush()?;
        Ok(())
    }

    /// Wait for the next event and apply it.
    pub async fn step(
        &mut self,
        channels: &mut ScreenChannels,
        input: &mut UnboundedReceiver<String>,
    ) -> Flow {
        tokio::select! {
            line = input.recv() => match line {
                Some(line) => self.dispatch("input", |s| s.handle_line(&line)),
                None => Flow::Quit,
            },
            Some(fired) = channels.debounce.recv() => {
                self.dispatch("debounce", |s| s.on_debounced(fired))
            }
            Some(message) = channels.places.recv() => {
                self.dispatch("places", |s| s.on_places(message))
            }
            Some(message) = channels.environment.recv() => {
                self.dispatch("environment", |s| s.on_environment(message))
            }
            Some(message) = channels.location.recv() => {
                self.dispatch("location", |s| s.on_location(message))
            }
        }
    }

    fn dispatch(
        &mut self,
        label: &str,
        handler: impl FnOnce(&mut Self) -> Result<Flow, AppError>,
    ) -> Flow {
        match guard(label, || handler(&mut *self)) {
            Ok(flow) => flow,
            Err(e) => {
                self.diagnostics.report(label, &e);
                Flow::Continue
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, AppError> {
        self.notice = None;

        match InputEvent::parse(line) {
            InputEvent::Query(text) => {
                if self.autocomplete.accepts(&text) {
                    self.debouncer.submit(text.clone());
                }
                self.query = text;
            }
            InputEvent::Search => {
                self.autocomplete.on_query_changed(&self.query);
            }
            InputEvent::Select(index) => match self.autocomplete.select(index) {
                Some(suggestion) => self.dashboard.apply_suggestion(suggestion),
                None => {
                    self.notice = Some(format!("{} #{}", self.strings.no_such_suggestion, index + 1))
                }
            },
            InputEvent::Fetch => {
                if let Err(rejected) = self.dashboard.fetch() {
                    tracing::debug!("Fetch not sent: {}", AppError::from(rejected));
                }
            }
            InputEvent::Locate => {
                self.location.locate();
            }
            InputEvent::Latitude(text) => self.dashboard.set_latitude(text),
            InputEvent::Longitude(text) => self.dashboard.set_longitude(text),
            InputEvent::ToggleRaw => self.show_raw = !self.show_raw,
            InputEvent::ToggleLanguage => {
                self.language = self.language.toggled();
                self.strings = Strings::for_language(self.language);
                self.dashboard.set_strings(self.strings);
            }
            InputEvent::Help => self.notice = Some(self.strings.help.to_string()),
            InputEvent::Quit => return Ok(Flow::Quit),
            InputEvent::Unknown(text) => {
                self.notice = Some(format!("{}: {}", self.strings.unknown_command, text))
            }
        }
        Ok(Flow::Continue)
    }

    fn on_debounced(&mut self, fired: Debounced<String>) -> Result<Flow, AppError> {
        if let Some(query) = self.debouncer.accept(fired) {
            self.autocomplete.on_query_changed(&query);
        }
        Ok(Flow::Continue)
    }

    fn on_places(&mut self, message: PlacesServiceMessage) -> Result<Flow, AppError> {
        self.autocomplete.on_search_done(message);
        Ok(Flow::Continue)
    }

    fn on_environment(&mut self, message: EnvironmentServiceMessage) -> Result<Flow, AppError> {
        if let Err(e) = self.dashboard.on_fetch_done(message) {
            let error = AppError::from(e);
            tracing::warn!("{} ({})", error.user_message(), error);
        }
        Ok(Flow::Continue)
    }

    fn on_location(&mut self, message: LocationServiceMessage) -> Result<Flow, AppError> {
        match self.location.on_message(message) {
            LocationUpdate::Coordinates {
                latitude,
                longitude,
            } => self.dashboard.set_fix(latitude, longitude),
            LocationUpdate::Place {
                latitude,
                longitude,
                name,
            } => self.dashboard.set_place(latitude, longitude, name.as_deref()),
            LocationUpdate::PermissionDenied => {
                tracing::warn!("Location permission denied");
                self.notice = Some(self.strings.location_permission_denied.to_string());
            }
            LocationUpdate::Unavailable(e) => {
                let error = AppError::from(e);
                tracing::debug!("No location: {}", error);
            }
        }
        Ok(Flow::Continue)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn strings(&self) -> &'static Strings {
        self.strings
    }

    pub fn show_raw(&self) -> bool {
        self.show_raw
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn autocomplete(&self) -> &AutocompleteModel {
        &self.autocomplete
    }

    pub fn dashboard(&self) -> &DashboardModel {
        &self.dashboard
    }

    pub fn location(&self) -> &LocationModel {
        &self.location
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }
}
