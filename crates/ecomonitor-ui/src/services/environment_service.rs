//! Environment backend: async dashboard fetches.
//! All network work runs off the event loop; results sent via mpsc.

use ecomonitor_core::error::ReqwestErrorExt;
use ecomonitor_core::NetworkError;
use ecomonitor_env::{EnvClient, EnvError, EnvironmentReport};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Error type for environment operations
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentError {
    /// Transport failure (no connectivity, DNS)
    Network(String),
    Timeout,
    /// Non-success HTTP status
    Status(u16),
    /// Body was not the expected JSON shape
    Parse(String),
}

impl std::fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentError::Network(s) => write!(f, "{}", s),
            EnvironmentError::Timeout => write!(f, "Request timed out"),
            EnvironmentError::Status(code) => write!(f, "HTTP {}", code),
            EnvironmentError::Parse(s) => write!(f, "Invalid response: {}", s),
        }
    }
}

impl std::error::Error for EnvironmentError {}

impl From<EnvError> for EnvironmentError {
    fn from(e: EnvError) -> Self {
        match e {
            EnvError::Network(e) => match e.into_network_error() {
                NetworkError::Timeout => EnvironmentError::Timeout,
                NetworkError::ServerError { status, .. } => EnvironmentError::Status(status),
                NetworkError::InvalidResponse(s) => EnvironmentError::Parse(s),
                NetworkError::ConnectionFailed(s) => EnvironmentError::Network(s),
            },
            EnvError::Status(code) => EnvironmentError::Status(code),
            EnvError::Parse(s) => EnvironmentError::Parse(s),
        }
    }
}

/// Messages sent from async operations back to the event loop
#[derive(Debug)]
pub enum EnvironmentServiceMessage {
    /// Result of fetching environment data
    FetchDone {
        /// Generation of the fetch that issued this request
        generation: u64,
        result: Result<EnvironmentReport, EnvironmentError>,
    },
}

/// Request an environment summary asynchronously.
/// Sends `FetchDone` tagged with `generation` on the channel when complete.
pub fn request_fetch(
    runtime: &Handle,
    tx: &UnboundedSender<EnvironmentServiceMessage>,
    client: EnvClient,
    generation: u64,
    lat: f64,
    lon: f64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = client
            .fetch_environment(lat, lon)
            .await
            .map_err(EnvironmentError::from);

        if let Err(e) = &result {
            tracing::warn!("Environment fetch for ({}, {}) failed: {}", lat, lon, e);
        }

        let _ = tx.send(EnvironmentServiceMessage::FetchDone { generation, result });
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
    fn environment_error_display() {
        assert_eq!(EnvironmentError::Status(502).to_string(), "HTTP 502");
        assert!(EnvironmentError::Parse("eof".into()).to_string().contains("eof"));
    }

    #[tokio::test]
    async fn test_fetch_done_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/environment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {"temperature_c": 19.0}
            })))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        request_fetch(
            &Handle::current(),
            &tx,
            EnvClient::new(&server.uri()).unwrap(),
            4,
            1.0,
            2.0,
        );

        let EnvironmentServiceMessage::FetchDone { generation, result } = rx.recv().await.unwrap();
        assert_eq!(generation, 4);
        assert_eq!(result.unwrap().snapshot.current.temperature_c, Some(19.0));
    }

    #[tokio::test]
    async fn test_fetch_done_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/environment"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        request_fetch(
            &Handle::current(),
            &tx,
            EnvClient::new(&server.uri()).unwrap(),
            1,
            1.0,
            2.0,
        );

        let EnvironmentServiceMessage::FetchDone { result, .. } = rx.recv().await.unwrap();
        assert!(matches!(result, Err(EnvironmentError::Parse(_))));
    }
}
