use crate::services::environment_service::EnvironmentError as UiEnvironmentError;
use ecomonitor_core::{AppError, EnvironmentError, NetworkError};

impl From<UiEnvironmentError> for AppError {
    fn from(e: UiEnvironmentError) -> Self {
        match e {
            UiEnvironmentError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            UiEnvironmentError::Timeout => AppError::Network(NetworkError::Timeout),
            UiEnvironmentError::Status(status) => AppError::Network(NetworkError::ServerError {
                status,
                message: format!("HTTP {}", status),
            }),
            UiEnvironmentError::Parse(s) => AppError::Environment(EnvironmentError::Malformed(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_server_error() {
        let app: AppError = UiEnvironmentError::Status(503).into();
        assert!(matches!(
            app,
            AppError::Network(NetworkError::ServerError { status: 503, .. })
        ));
        assert!(app.user_message().contains("server"));
    }

    #[test]
    fn test_parse_maps_to_malformed() {
        let app: AppError = UiEnvironmentError::Parse("eof".into()).into();
        assert!(matches!(app, AppError::Environment(EnvironmentError::Malformed(_))));
    }
}
