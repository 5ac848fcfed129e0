//! City autocomplete state.
//!
//! Owns the suggestion cache, the displayed list and the single in-flight
//! places search. Every completion carries the generation of the query that
//! issued it; only the latest generation may touch the cache or the list.

use ecomonitor_env::{normalize, EnvClient, PlaceSuggestion, SuggestionCache};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::services::{request_places_search, PlacesServiceMessage, SearchOutcome};

/// What `on_query_changed` did with a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Too short; nothing touched
    Ignored,
    /// Served from the cache, no request made
    CacheHit,
    /// A search was sent with this generation
    Dispatched { generation: u64 },
}

struct InFlight {
    generation: u64,
    token: CancellationToken,
}

pub struct AutocompleteModel {
    client: EnvClient,
    runtime: Handle,
    tx: UnboundedSender<PlacesServiceMessage>,
    cache: SuggestionCache,
    min_chars: usize,
    suggestions: Vec<PlaceSuggestion>,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl AutocompleteModel {
    pub fn new(
        client: EnvClient,
        runtime: Handle,
        tx: UnboundedSender<PlacesServiceMessage>,
        cache_capacity: usize,
        min_chars: usize,
    ) -> Self {
        Self {
            client,
            runtime,
            tx,
            cache: SuggestionCache::new(cache_capacity),
            min_chars,
            suggestions: Vec::new(),
            in_flight: None,
            generation: 0,
        }
    }

    /// Whether a query is long enough to search for (trimmed, in characters).
    pub fn accepts(&self, raw: &str) -> bool {
        raw.trim().chars().count() >= self.min_chars
    }

    /// React to new query text.
    pub fn on_query_changed(&mut self, raw: &str) -> QueryOutcome {
        if !self.accepts(raw) {
            return QueryOutcome::Ignored;
        }

        let query = raw.trim();
        let key = normalize(query);

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Suggestion cache hit");
            self.suggestions = hit.to_vec();
            // An older search must not overwrite what the cache just showed
            self.cancel_in_flight();
            self.generation += 1;
            return QueryOutcome::CacheHit;
        }

        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;

        let token = request_places_search(
            &self.runtime,
            &self.tx,
            self.client.clone(),
            query.to_string(),
            key,
            generation,
        );
        self.in_flight = Some(InFlight { generation, token });

        QueryOutcome::Dispatched { generation }
    }

    /// Apply a finished search. Returns false when it was stale and dropped.
    pub fn on_search_done(&mut self, message: PlacesServiceMessage) -> bool {
        let PlacesServiceMessage::SearchDone {
            generation,
            key,
            outcome,
        } = message;

        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "Discarding stale places result"
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            SearchOutcome::Found(list) => {
                self.cache.put(key, list.clone());
                self.suggestions = list;
            }
            SearchOutcome::Failed => {
                // Shown as empty but never cached
                self.suggestions.clear();
            }
        }
        true
    }

    /// Cancel the outstanding search, if any. Its completion will never arrive.
    pub fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(generation = in_flight.generation, "Cancelling places search");
            in_flight.token.cancel();
        }
    }

    pub fn select(&self, index: usize) -> Option<&PlaceSuggestion> {
        self.suggestions.get(index)
    }

    pub fn suggestions(&self) -> &[PlaceSuggestion] {
        &self.suggestions
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for AutocompleteModel {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
