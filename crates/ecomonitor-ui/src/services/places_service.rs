//! Places backend: async city lookups for autocomplete.
//! Network work runs on the runtime; results go back to the event loop via mpsc.
//! Failures never surface as errors, only as `SearchOutcome::Failed`.

use ecomonitor_env::{EnvClient, PlaceSuggestion};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// What a finished search produced
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The backend answered; the list may be empty
    Found(Vec<PlaceSuggestion>),
    /// Transport error, non-success status or unreadable body
    Failed,
}

/// Messages sent from search tasks back to the event loop
#[derive(Debug)]
pub enum PlacesServiceMessage {
    SearchDone {
        /// Generation of the query that issued this search
        generation: u64,
        /// Normalized cache key
        key: String,
        outcome: SearchOutcome,
    },
}

/// Start a places search for `query` (sent as typed).
///
/// Cancelling the returned token stops the task before it reports; a search
/// that already reported is unaffected.
pub fn request_search(
    runtime: &Handle,
    tx: &UnboundedSender<PlacesServiceMessage>,
    client: EnvClient,
    query: String,
    key: String,
    generation: u64,
) -> CancellationToken {
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancelled.cancelled() => {
                tracing::debug!(generation, "Places search cancelled");
                return;
            }
            result = client.search_places(&query) => result,
        };

        let outcome = match result {
            Ok(list) => {
                tracing::debug!(generation, "Places search returned {} results", list.len());
                SearchOutcome::Found(list)
            }
            Err(e) => {
                tracing::debug!(generation, "Places search failed: {}", e);
                SearchOutcome::Failed
            }
        };

        let _ = tx.send(PlacesServiceMessage::SearchDone {
            generation,
            key,
            outcome,
        });
    });

    token
}
