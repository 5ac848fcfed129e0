//! Location backend: permission → fix → reverse geocode.
//!
//! Coordinates are reported as soon as the fix arrives; the place name
//! follows in a second message so a slow geocoder never holds them back.

use ecomonitor_env::{Location, LocationSource, Permission, ReverseGeocoder};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Error type for location operations
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    PermissionDenied,
    /// The provider answered without a position
    NoFix,
    Failed(String),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "Location permission denied"),
            LocationError::NoFix => write!(f, "No location fix available"),
            LocationError::Failed(s) => write!(f, "Location error: {}", s),
        }
    }
}

impl std::error::Error for LocationError {}

/// Messages sent from async operations back to the event loop
#[derive(Debug)]
pub enum LocationServiceMessage {
    /// A fix arrived; populate the coordinate fields
    Fixed { latitude: f64, longitude: f64 },
    /// Reverse geocoding finished (`None` = unknown place)
    Named {
        latitude: f64,
        longitude: f64,
        place: Option<String>,
    },
    /// Acquisition ended without a fix
    Failed(LocationError),
}

/// Acquire the current location, then name it.
pub fn request_locate(
    runtime: &Handle,
    tx: &UnboundedSender<LocationServiceMessage>,
    source: LocationSource,
    geocoder: ReverseGeocoder,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let granted = match source.check_permission() {
            Permission::Granted => true,
            Permission::Denied => source.request_permission().await == Permission::Granted,
        };
        if !granted {
            let _ = tx.send(LocationServiceMessage::Failed(LocationError::PermissionDenied));
            return;
        }

        let location = match source.current_location().await {
            Ok(Some(location)) => location,
            Ok(None) => {
                let _ = tx.send(LocationServiceMessage::Failed(LocationError::NoFix));
                return;
            }
            Err(e) => {
                let _ = tx.send(LocationServiceMessage::Failed(LocationError::Failed(
                    e.to_string(),
                )));
                return;
            }
        };

        tracing::info!("Got location: {}, {}", location.latitude, location.longitude);
        let _ = tx.send(LocationServiceMessage::Fixed {
            latitude: location.latitude,
            longitude: location.longitude,
        });

        name_location(&tx, &geocoder, location).await;
    });
}

/// Reverse geocode a coordinate the user already has (e.g. the start-up default).
pub fn request_describe(
    runtime: &Handle,
    tx: &UnboundedSender<LocationServiceMessage>,
    geocoder: ReverseGeocoder,
    location: Location,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        name_location(&tx, &geocoder, location).await;
    });
}

async fn name_location(
    tx: &UnboundedSender<LocationServiceMessage>,
    geocoder: &ReverseGeocoder,
    location: Location,
) {
    let place = geocoder.reverse_geocode(&location).await;
    let _ = tx.send(LocationServiceMessage::Named {
        latitude: location.latitude,
        longitude: location.longitude,
        place,
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn location_error_display() {
        assert!(LocationError::PermissionDenied.to_string().contains("denied"));
        assert!(LocationError::Failed("gps".into()).to_string().contains("gps"));
    }

    #[tokio::test]
    async fn test_locate_reports_fix_then_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"city": "Curitiba", "country": "Brasil"}
            })))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let geocoder = ReverseGeocoder::new(&server.uri(), "test").unwrap();
        request_locate(
            &Handle::current(),
            &tx,
            LocationSource::from_config(Some((-25.43, -49.27))),
            geocoder,
        );

        match rx.recv().await.unwrap() {
            LocationServiceMessage::Fixed {
                latitude,
                longitude,
            } => assert_eq!((latitude, longitude), (-25.43, -49.27)),
            other => panic!("expected fix first, got {other:?}"),
        }
        match rx.recv().await.unwrap() {
            LocationServiceMessage::Named { place, .. } => {
                assert_eq!(place.as_deref(), Some("Curitiba, Brasil"))
            }
            other => panic!("expected name, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_locate_denied() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let geocoder = ReverseGeocoder::new("http://127.0.0.1:9", "test").unwrap();
        request_locate(&Handle::current(), &tx, LocationSource::Denied, geocoder);

        assert!(matches!(
            rx.recv().await.unwrap(),
            LocationServiceMessage::Failed(LocationError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn test_locate_without_fix() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let geocoder = ReverseGeocoder::new("http://127.0.0.1:9", "test").unwrap();
        request_locate(&Handle::current(), &tx, LocationSource::Unavailable, geocoder);

        assert!(matches!(
            rx.recv().await.unwrap(),
            LocationServiceMessage::Failed(LocationError::NoFix)
        ));
    }

    #[tokio::test]
    async fn test_describe_unknown_on_geocoder_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let geocoder = ReverseGeocoder::new(&server.uri(), "test").unwrap();
        request_describe(&Handle::current(), &tx, geocoder, Location::new(1.0, 2.0));

        match rx.recv().await.unwrap() {
            LocationServiceMessage::Named { place, latitude, .. } => {
                assert_eq!(place, None);
                assert_eq!(latitude, 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
