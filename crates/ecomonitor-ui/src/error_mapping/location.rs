use crate::services::location_service::LocationError as UiLocationError;
use ecomonitor_core::{AppError, LocationError};

impl From<UiLocationError> for AppError {
    fn from(e: UiLocationError) -> Self {
        match e {
            UiLocationError::PermissionDenied => AppError::Location(LocationError::PermissionDenied),
            UiLocationError::NoFix => AppError::Location(LocationError::NoFix),
            UiLocationError::Failed(s) => AppError::Location(LocationError::Other(s)),
        }
    }
}
