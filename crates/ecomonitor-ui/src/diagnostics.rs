//! Last-resort boundary around event handlers.
//!
//! A handler that fails or panics is logged and listed in the diagnostics
//! panel; the event loop keeps running.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ecomonitor_core::AppError;

/// Entries kept in the panel; the oldest go first
const MAX_ENTRIES: usize = 20;

/// Run `f`, turning a panic into `AppError::Panic`.
pub fn guard<T>(label: &str, f: impl FnOnce() -> Result<T, AppError>) -> Result<T, AppError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            Err(AppError::Panic(format!("{} handler: {}", label, message)))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEntry {
    pub label: String,
    pub message: String,
    pub fatal: bool,
}

impl std::fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fatal {
            write!(f, "FATAL [{}] {}", self.label, self.message)
        } else {
            write!(f, "[{}] {}", self.label, self.message)
        }
    }
}

/// The visible diagnostics panel
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<DiagnosticEntry>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, label: &str, error: &AppError) {
        let fatal = matches!(error, AppError::Panic(_));
        if fatal {
            tracing::error!(handler = label, "Handler panicked: {}", error);
        } else {
            tracing::error!(handler = label, "Handler failed: {}", error);
        }

        if self.entries.len() == MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(DiagnosticEntry {
            label: label.to_string(),
            message: error.to_string(),
            fatal,
        });
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_guard_passes_results_through() {
        assert_eq!(guard("ok", || Ok::<_, AppError>(3)).unwrap(), 3);

        let err = guard::<()>("fail", || Err(AppError::Service("boom".into()))).unwrap_err();
        assert!(matches!(err, AppError::Service(_)));
    }

    #[test]
    fn test_guard_catches_panics() {
        let err = guard::<()>("input", || panic!("index out of range")).unwrap_err();
        match err {
            AppError::Panic(msg) => {
                assert!(msg.contains("input"));
                assert!(msg.contains("index out of range"));
            }
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[test]
    fn test_sink_renders_and_caps() {
        let mut sink = DiagnosticSink::new();
        sink.report("fetch", &AppError::Panic("oops".into()));
        assert!(sink.entries()[0].to_string().starts_with("FATAL [fetch]"));

        for i in 0..MAX_ENTRIES {
            sink.report("loop", &AppError::Service(format!("e{i}")));
        }
        assert_eq!(sink.entries().len(), MAX_ENTRIES);
        assert!(!sink.entries()[0].fatal);

        sink.clear();
        assert!(sink.is_empty());
    }
}
