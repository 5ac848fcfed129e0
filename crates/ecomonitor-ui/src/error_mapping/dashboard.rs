use crate::models::FetchRejected;
use ecomonitor_core::{AppError, EnvironmentError};

impl From<FetchRejected> for AppError {
    fn from(e: FetchRejected) -> Self {
        match e {
            FetchRejected::MissingCoordinates => {
                AppError::Environment(EnvironmentError::MissingCoordinates)
            }
            FetchRejected::InvalidCoordinate(s) => {
                AppError::Environment(EnvironmentError::InvalidCoordinate(s))
            }
        }
    }
}
