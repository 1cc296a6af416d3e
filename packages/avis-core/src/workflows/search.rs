//! Search workflow - reviews recorded for a client phone number.
//!
//! `Idle -> Validating -> {Error | Querying} -> {Empty | Populated | Unauthorized | ServerError}`
//!
//! No lock guards against a second search while one is outstanding. State is
//! only touched between awaits, so whichever response lands last wins, and
//! the review list is always replaced as a whole.

use std::sync::Mutex;

use async_trait::async_trait;
use avis_client::Review;
use tracing::{debug, info};

use super::{
    lock, run_authorized, Resolution, ReviewSubmittedListener, WorkflowDeps,
    SESSION_EXPIRED_MESSAGE,
};
use crate::events::WorkflowEvent;
use crate::validation::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Validating,
    /// Input rejected locally; no call was made
    Error,
    Querying,
    /// The search completed with zero reviews
    Empty,
    Populated,
    Unauthorized,
    ServerError,
}

impl SearchStatus {
    /// Whether a call is outstanding or about to be.
    pub fn is_busy(&self) -> bool {
        matches!(self, SearchStatus::Validating | SearchStatus::Querying)
    }
}

/// Snapshot of the search workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub status: SearchStatus,
    /// Trimmed phone of the latest search, whether or not it was valid
    pub phone: Option<String>,
    /// Results of the last completed search
    pub reviews: Vec<Review>,
    /// Set once a search has been dispatched. Distinguishes "no search yet"
    /// from "search returned zero results".
    pub requested: bool,
    /// User-visible message for failure states
    pub message: Option<String>,
}

pub struct SearchWorkflow {
    deps: WorkflowDeps,
    state: Mutex<SearchState>,
}

impl SearchWorkflow {
    pub fn new(deps: WorkflowDeps) -> Self {
        Self {
            deps,
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn state(&self) -> SearchState {
        lock(&self.state).clone()
    }

    /// The phone number the search currently shows (or last attempted).
    pub fn current_phone(&self) -> Option<String> {
        lock(&self.state).phone.clone()
    }

    /// Back to `Idle` with no results and no requested flag.
    pub fn reset(&self) {
        *lock(&self.state) = SearchState::default();
    }

    /// Validate `input`, query the service, and apply the outcome.
    pub async fn search(&self, input: &str) -> SearchStatus {
        let trimmed = input.trim();
        {
            let mut state = lock(&self.state);
            state.status = SearchStatus::Validating;
            state.phone = (!trimmed.is_empty()).then(|| trimmed.to_string());
            state.message = None;
        }

        let phone = match validate_phone(input) {
            Ok(phone) => phone,
            Err(e) => {
                debug!(input = trimmed, error = %e, "Search input rejected");
                return self.reject(e.to_string());
            }
        };

        {
            let mut state = lock(&self.state);
            state.status = SearchStatus::Querying;
            state.requested = true;
        }

        let lookup = phone.clone();
        let resolution = run_authorized(&self.deps, "search", move |api, token| async move {
            api.search(&lookup, &token).await
        })
        .await;

        self.apply(phone, resolution)
    }

    /// Re-run the search for the current phone, if any.
    pub async fn refresh(&self) -> Option<SearchStatus> {
        let phone = self.current_phone()?;
        Some(self.search(&phone).await)
    }

    fn reject(&self, message: String) -> SearchStatus {
        let mut state = lock(&self.state);
        state.status = SearchStatus::Error;
        state.message = Some(message);
        state.status
    }

    fn apply(&self, phone: String, resolution: Resolution<Vec<Review>>) -> SearchStatus {
        let mut state = lock(&self.state);
        state.phone = Some(phone.clone());

        match resolution {
            Resolution::Completed(reviews) => {
                let count = reviews.len();
                info!(phone = %phone, count, "Search completed");
                state.status = if reviews.is_empty() {
                    SearchStatus::Empty
                } else {
                    SearchStatus::Populated
                };
                state.reviews = reviews;
                state.message = None;
                self.deps
                    .events
                    .emit(WorkflowEvent::SearchCompleted { phone, count });
            }
            Resolution::Unauthorized => {
                state.status = SearchStatus::Unauthorized;
                state.reviews.clear();
                state.message = Some(SESSION_EXPIRED_MESSAGE.to_string());
            }
            Resolution::Rejected(message) => {
                state.status = SearchStatus::ServerError;
                state.reviews.clear();
                state.message = Some(message);
            }
            Resolution::Unreachable(message) => {
                state.status = SearchStatus::ServerError;
                state.message = Some(message);
            }
        }

        state.status
    }
}

#[async_trait]
impl ReviewSubmittedListener for SearchWorkflow {
    async fn on_review_submitted(&self, client_phone: &str) {
        if self.current_phone().as_deref() != Some(client_phone) {
            return;
        }
        debug!(phone = client_phone, "Refreshing search after review submission");
        self.refresh().await;
    }
}
