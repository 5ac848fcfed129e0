pub mod environment_service;
pub mod location_service;
pub mod places_service;

pub use environment_service::{
    request_fetch as request_environment_fetch, EnvironmentError, EnvironmentServiceMessage,
};
pub use location_service::{
    request_describe as request_location_describe, request_locate, LocationError,
    LocationServiceMessage,
};
pub use places_service::{
    request_search as request_places_search, PlacesServiceMessage, SearchOutcome,
};
