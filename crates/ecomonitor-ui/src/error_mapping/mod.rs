//! Maps UI service errors to ecomonitor_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod dashboard;
mod environment;
mod location;
