//! Environment backend access for EcoMonitor
//!
//! Places search and environment summaries from the backend, reverse
//! geocoding via Nominatim, the desktop location source, plus the
//! query-normalization and suggestion-cache primitives used by autocomplete.

pub mod aqi;
pub mod cache;
pub mod client;
pub mod geocode;
pub mod location;
pub mod normalize;
pub mod types;

pub use aqi::AqiBucket;
pub use cache::SuggestionCache;
pub use client::EnvClient;
pub use geocode::ReverseGeocoder;
pub use location::{LocationSource, Permission};
pub use normalize::normalize;
pub use types::*;
