use ecomonitor_env::{Location, LocationSource, ReverseGeocoder};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::services::{
    request_locate, request_location_describe, LocationError, LocationServiceMessage,
};

/// What the screen should do with a location message
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    Coordinates {
        latitude: f64,
        longitude: f64,
    },
    Place {
        latitude: f64,
        longitude: f64,
        name: Option<String>,
    },
    PermissionDenied,
    /// No fix or provider failure; only the trigger comes back
    Unavailable(LocationError),
}

/// "Use my location" trigger. Disabled while an acquisition runs.
pub struct LocationModel {
    source: LocationSource,
    geocoder: ReverseGeocoder,
    runtime: Handle,
    tx: UnboundedSender<LocationServiceMessage>,
    locate_enabled: bool,
}

impl LocationModel {
    pub fn new(
        source: LocationSource,
        geocoder: ReverseGeocoder,
        runtime: Handle,
        tx: UnboundedSender<LocationServiceMessage>,
    ) -> Self {
        Self {
            source,
            geocoder,
            runtime,
            tx,
            locate_enabled: true,
        }
    }

    /// Start an acquisition. Returns false if one is already running.
    pub fn locate(&mut self) -> bool {
        if !self.locate_enabled {
            tracing::debug!("Location request ignored; acquisition in progress");
            return false;
        }
        self.locate_enabled = false;
        request_locate(
            &self.runtime,
            &self.tx,
            self.source.clone(),
            self.geocoder.clone(),
        );
        true
    }

    /// Name a coordinate without touching the trigger.
    pub fn describe(&self, latitude: f64, longitude: f64) {
        request_location_describe(
            &self.runtime,
            &self.tx,
            self.geocoder.clone(),
            Location::new(latitude, longitude),
        );
    }

    pub fn on_message(&mut self, message: LocationServiceMessage) -> LocationUpdate {
        match message {
            LocationServiceMessage::Fixed {
                latitude,
                longitude,
            } => LocationUpdate::Coordinates {
                latitude,
                longitude,
            },
            LocationServiceMessage::Named {
                latitude,
                longitude,
                place,
            } => {
                self.locate_enabled = true;
                LocationUpdate::Place {
                    latitude,
                    longitude,
                    name: place,
                }
            }
            LocationServiceMessage::Failed(LocationError::PermissionDenied) => {
                self.locate_enabled = true;
                LocationUpdate::PermissionDenied
            }
            LocationServiceMessage::Failed(e) => {
                self.locate_enabled = true;
                LocationUpdate::Unavailable(e)
            }
        }
    }

    pub fn locate_enabled(&self) -> bool {
        self.locate_enabled
    }

    pub fn source(&self) -> &LocationSource {
        &self.source
    }
}
