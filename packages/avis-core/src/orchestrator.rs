//! Orchestrator - wires the session store, the Unauthorized handler and the
//! three workflows together and is the single entry point for the
//! presentation layer.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::events::{AppMode, EventBus, ModeSignal, WorkflowEvent};
use crate::kernel::BaseReputationService;
use crate::session::{BaseSessionStorage, Session, SessionStore};
use crate::unauthorized::UnauthorizedHandler;
use crate::workflows::{
    lock, AddReviewState, AddReviewStatus, AddReviewWorkflow, AuthState, AuthStatus,
    AuthWorkflow, NewReviewDraft, SearchState, SearchStatus, SearchWorkflow, WorkflowDeps,
};

pub struct Orchestrator {
    session: Arc<SessionStore>,
    mode: ModeSignal,
    events: EventBus,
    auth: AuthWorkflow,
    search: Arc<SearchWorkflow>,
    add_review: AddReviewWorkflow,
    /// Email whose results and draft the workflows currently hold. Survives
    /// an Unauthorized reset so a re-login as the same user keeps its draft.
    owner: Mutex<Option<String>>,
}

impl Orchestrator {
    /// Build an orchestrator over an already loaded session store. The
    /// initial mode follows whether the store holds a session.
    pub fn new(api: Arc<dyn BaseReputationService>, session: Arc<SessionStore>) -> Self {
        let initial = if session.is_authenticated() {
            AppMode::Authenticated
        } else {
            AppMode::Unauthenticated
        };
        let owner = session.current().map(|s| s.user.email);
        let mode = ModeSignal::new(initial);
        let events = EventBus::new();

        let unauthorized = Arc::new(UnauthorizedHandler::new(
            session.clone(),
            mode.clone(),
            events.clone(),
        ));
        let deps = WorkflowDeps {
            api: api.clone(),
            session: session.clone(),
            unauthorized,
            events: events.clone(),
        };

        let auth = AuthWorkflow::new(api, session.clone(), mode.clone(), events.clone());
        let search = Arc::new(SearchWorkflow::new(deps.clone()));
        let add_review = AddReviewWorkflow::new(deps).with_listener(search.clone());

        Self {
            session,
            mode,
            events,
            auth,
            search,
            add_review,
            owner: Mutex::new(owner),
        }
    }

    /// Load the persisted session from `storage` and build an orchestrator.
    ///
    /// Unreadable session data is discarded and the application starts
    /// unauthenticated.
    pub fn bootstrap(
        api: Arc<dyn BaseReputationService>,
        storage: Arc<dyn BaseSessionStorage>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        match session.load() {
            Ok(Some(s)) => info!(email = %s.user.email, "Restored session"),
            Ok(None) => info!("No saved session"),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = session.clear() {
                    warn!(error = %e, "Failed to clear unreadable session");
                }
            }
        }
        Self::new(api, session)
    }

    // =========================================================================
    // Mode and events
    // =========================================================================

    pub fn mode(&self) -> AppMode {
        self.mode.current()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<AppMode> {
        self.mode.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> AuthStatus {
        let status = self.auth.login(email, password).await;
        self.claim_workflows();
        status
    }

    pub async fn register(&self, email: &str, password: &str) -> AuthStatus {
        self.auth.register(email, password).await
    }

    pub async fn register_and_login(&self, email: &str, password: &str) -> AuthStatus {
        let status = self.auth.register_and_login(email, password).await;
        self.claim_workflows();
        status
    }

    /// Sign out and reset both workflows so the next identity starts clean.
    pub fn logout(&self) {
        self.auth.logout();
        self.search.reset();
        self.add_review.reset();
        *lock(&self.owner) = None;
    }

    /// After a sign-in, drop results and draft left by a different account
    /// (e.g. one whose session the service rejected).
    fn claim_workflows(&self) {
        let Some(email) = self.session.current().map(|s| s.user.email) else {
            return;
        };
        let mut owner = lock(&self.owner);
        if owner.as_deref() != Some(email.as_str()) {
            if owner.is_some() {
                info!(email = %email, "New identity, resetting workflows");
            }
            self.search.reset();
            self.add_review.reset();
            *owner = Some(email);
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub async fn search(&self, phone: &str) -> SearchStatus {
        self.search.search(phone).await
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    // =========================================================================
    // Add review
    // =========================================================================

    /// Submit `draft`. On success the search is refreshed when it currently
    /// shows the same phone number.
    pub async fn add_review(&self, draft: NewReviewDraft) -> AddReviewStatus {
        self.add_review.submit(draft).await
    }

    /// Submit the draft edited through [`Orchestrator::edit_draft`].
    pub async fn submit_draft(&self) -> AddReviewStatus {
        self.add_review.submit_draft().await
    }

    pub fn edit_draft(&self, edit: impl FnOnce(&mut NewReviewDraft)) {
        self.add_review.edit_draft(edit);
    }

    pub fn add_review_state(&self) -> AddReviewState {
        self.add_review.state()
    }
}
