//! Device location stand-in.
//!
//! A desktop has no fused location provider, so the "device" is configured:
//! a fixed coordinate (config file or environment), nothing at all, or a
//! provider that refuses permission.

use crate::types::{Location, LocationError};

/// Outcome of a permission check or request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Always reports this coordinate
    Fixed { latitude: f64, longitude: f64 },
    /// Permission granted, but no fix is ever available
    Unavailable,
    /// Permission is refused
    Denied,
}

impl LocationSource {
    /// Fixed source when a coordinate is configured, otherwise no fix.
    pub fn from_config(fixed: Option<(f64, f64)>) -> Self {
        match fixed {
            Some((latitude, longitude)) => Self::Fixed {
                latitude,
                longitude,
            },
            None => Self::Unavailable,
        }
    }

    pub fn check_permission(&self) -> Permission {
        match self {
            Self::Denied => Permission::Denied,
            _ => Permission::Granted,
        }
    }

    /// Ask for permission. Never prompts twice; the answer is the check.
    pub async fn request_permission(&self) -> Permission {
        self.check_permission()
    }

    /// One best-effort fix. `Ok(None)` means the provider had nothing.
    pub async fn current_location(&self) -> Result<Option<Location>, LocationError> {
        match self {
            Self::Fixed {
                latitude,
                longitude,
            } => Ok(Some(Location::new(*latitude, *longitude))),
            Self::Unavailable => Ok(None),
            Self::Denied => Err(LocationError::PermissionDenied),
        }
    }
}
