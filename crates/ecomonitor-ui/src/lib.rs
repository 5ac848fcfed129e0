//! Terminal front-end for EcoMonitor
//!
//! A single screen driven by an event loop: typed lines feed the city
//! autocomplete, `:`-commands act as the buttons, and every network call
//! reports back over a channel so all state changes happen in one place.

pub mod debounce;
pub mod diagnostics;
mod error_mapping;
pub mod i18n;
pub mod models;
pub mod screen;
pub mod services;
pub mod view;

pub use diagnostics::DiagnosticSink;
pub use i18n::Strings;
pub use screen::{Flow, InputEvent, Screen, ScreenChannels};
