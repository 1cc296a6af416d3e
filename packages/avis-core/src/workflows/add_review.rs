//! Add-review workflow.
//!
//! `Idle -> Validating -> {Error | Submitting} -> {Success | Unauthorized | ServerError}`
//!
//! On success the draft resets and registered [`ReviewSubmittedListener`]s
//! are notified with the submitted phone. On any failure the draft is kept
//! as typed so the user can correct or retry it.

use std::sync::{Arc, Mutex};

use avis_client::NewReview;
use tracing::{debug, info};

use super::{
    lock, run_authorized, Resolution, ReviewSubmittedListener, WorkflowDeps,
    SESSION_EXPIRED_MESSAGE,
};
use crate::events::WorkflowEvent;
use crate::validation::validate_phone;

/// Shown after a successful submission.
pub const REVIEW_ADDED_MESSAGE: &str = "Review added";

/// Composition buffer for a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewDraft {
    pub client_phone: String,
    pub is_positive: bool,
    /// Optional free text; empty means no message
    pub message: String,
}

impl Default for NewReviewDraft {
    fn default() -> Self {
        Self {
            client_phone: String::new(),
            is_positive: true,
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddReviewStatus {
    #[default]
    Idle,
    Validating,
    /// Input rejected locally; no call was made
    Error,
    Submitting,
    Success,
    Unauthorized,
    ServerError,
}

/// Snapshot of the add-review workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddReviewState {
    pub status: AddReviewStatus,
    pub draft: NewReviewDraft,
    pub message: Option<String>,
}

pub struct AddReviewWorkflow {
    deps: WorkflowDeps,
    state: Mutex<AddReviewState>,
    listeners: Vec<Arc<dyn ReviewSubmittedListener>>,
}

impl AddReviewWorkflow {
    pub fn new(deps: WorkflowDeps) -> Self {
        Self {
            deps,
            state: Mutex::new(AddReviewState::default()),
            listeners: Vec::new(),
        }
    }

    /// Notify `listener` after every successful submission.
    pub fn with_listener(mut self, listener: Arc<dyn ReviewSubmittedListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn state(&self) -> AddReviewState {
        lock(&self.state).clone()
    }

    pub fn draft(&self) -> NewReviewDraft {
        lock(&self.state).draft.clone()
    }

    /// Edit the draft in place without submitting.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut NewReviewDraft)) {
        edit(&mut lock(&self.state).draft);
    }

    pub fn reset(&self) {
        *lock(&self.state) = AddReviewState::default();
    }

    /// Replace the draft with `draft` and submit it.
    pub async fn submit(&self, draft: NewReviewDraft) -> AddReviewStatus {
        self.edit_draft(|current| *current = draft);
        self.submit_draft().await
    }

    /// Validate and submit the current draft.
    pub async fn submit_draft(&self) -> AddReviewStatus {
        let draft = {
            let mut state = lock(&self.state);
            state.status = AddReviewStatus::Validating;
            state.message = None;
            state.draft.clone()
        };

        let phone = match validate_phone(&draft.client_phone) {
            Ok(phone) => phone,
            Err(e) => {
                debug!(error = %e, "Review draft rejected");
                return self.reject(e.to_string());
            }
        };

        lock(&self.state).status = AddReviewStatus::Submitting;

        let review = NewReview {
            client_phone: phone.clone(),
            is_positive: draft.is_positive,
            message: draft.message,
        };
        let resolution = run_authorized(&self.deps, "add_review", move |api, token| async move {
            api.add_review(&review, &token).await
        })
        .await;

        let status = {
            let mut state = lock(&self.state);
            match resolution {
                Resolution::Completed(()) => {
                    info!(phone = %phone, "Review submitted");
                    state.status = AddReviewStatus::Success;
                    state.draft = NewReviewDraft::default();
                    state.message = Some(REVIEW_ADDED_MESSAGE.to_string());
                }
                Resolution::Unauthorized => {
                    state.status = AddReviewStatus::Unauthorized;
                    state.message = Some(SESSION_EXPIRED_MESSAGE.to_string());
                }
                Resolution::Rejected(message) | Resolution::Unreachable(message) => {
                    state.status = AddReviewStatus::ServerError;
                    state.message = Some(message);
                }
            }
            state.status
        };

        if status == AddReviewStatus::Success {
            self.deps.events.emit(WorkflowEvent::ReviewSubmitted {
                client_phone: phone.clone(),
            });
            for listener in &self.listeners {
                listener.on_review_submitted(&phone).await;
            }
        }

        status
    }

    fn reject(&self, message: String) -> AddReviewStatus {
        let mut state = lock(&self.state);
        state.status = AddReviewStatus::Error;
        state.message = Some(message);
        state.status
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fixture;
    use super::*;
    use crate::kernel::test_dependencies::MockReputationService;
    use async_trait::async_trait;
    use avis_client::AvisError;

    #[derive(Default)]
    struct RecordingListener {
        phones: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReviewSubmittedListener for RecordingListener {
        async fn on_review_submitted(&self, client_phone: &str) {
            self.phones.lock().unwrap().push(client_phone.to_string());
        }
    }

    fn draft(phone: &str) -> NewReviewDraft {
        NewReviewDraft {
            client_phone: phone.to_string(),
            is_positive: false,
            message: "parcel never collected".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_resets_draft_and_notifies() {
        let f = fixture(MockReputationService::new());
        let listener = Arc::new(RecordingListener::default());
        let workflow = AddReviewWorkflow::new(f.deps.clone()).with_listener(listener.clone());

        assert_eq!(
            workflow.submit(draft(" 0612345678 ")).await,
            AddReviewStatus::Success
        );

        let state = workflow.state();
        assert_eq!(state.draft, NewReviewDraft::default());
        assert_eq!(state.message.as_deref(), Some(REVIEW_ADDED_MESSAGE));
        assert_eq!(*listener.phones.lock().unwrap(), vec!["0612345678".to_string()]);

        let calls = f.api.add_review_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token, "jwt-abc");
        assert_eq!(
            calls[0].review,
            NewReview {
                client_phone: "0612345678".to_string(),
                is_positive: false,
                message: "parcel never collected".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_phone_keeps_draft_and_makes_no_call() {
        let f = fixture(MockReputationService::new());
        let listener = Arc::new(RecordingListener::default());
        let workflow = AddReviewWorkflow::new(f.deps.clone()).with_listener(listener.clone());

        assert_eq!(workflow.submit(draft("06 12")).await, AddReviewStatus::Error);

        assert_eq!(workflow.draft(), draft("06 12"));
        assert_eq!(f.api.call_count(), 0);
        assert!(listener.phones.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_keeps_draft() {
        let f = fixture(
            MockReputationService::new()
                .with_add_review_result(Err(AvisError::Domain("Avis déjà posté".to_string()))),
        );
        let workflow = AddReviewWorkflow::new(f.deps.clone());

        assert_eq!(
            workflow.submit(draft("0612345678")).await,
            AddReviewStatus::ServerError
        );
        let state = workflow.state();
        assert_eq!(state.draft, draft("0612345678"));
        assert_eq!(state.message.as_deref(), Some("Avis déjà posté"));
    }

    #[tokio::test]
    async fn test_forbidden_clears_session_and_keeps_draft() {
        let f = fixture(MockReputationService::new().with_add_review_result(Err(AvisError::Unauthorized)));
        let listener = Arc::new(RecordingListener::default());
        let workflow = AddReviewWorkflow::new(f.deps.clone()).with_listener(listener.clone());

        assert_eq!(
            workflow.submit(draft("0612345678")).await,
            AddReviewStatus::Unauthorized
        );
        assert_eq!(workflow.draft(), draft("0612345678"));
        assert_eq!(f.storage.clear_count(), 1);
        assert!(listener.phones.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_draft_then_submit() {
        let f = fixture(MockReputationService::new());
        let workflow = AddReviewWorkflow::new(f.deps.clone());

        workflow.edit_draft(|d| {
            d.client_phone = "0612345678".to_string();
            d.is_positive = false;
        });

        assert_eq!(workflow.submit_draft().await, AddReviewStatus::Success);
        assert!(!f.api.add_review_calls()[0].review.is_positive);
    }
}
