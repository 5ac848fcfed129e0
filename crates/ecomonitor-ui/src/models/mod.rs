pub mod autocomplete_model;
pub mod dashboard_model;
pub mod location_model;

pub use autocomplete_model::{AutocompleteModel, QueryOutcome};
pub use dashboard_model::{DashboardModel, DashboardView, FetchRejected};
pub use location_model::{LocationModel, LocationUpdate};
