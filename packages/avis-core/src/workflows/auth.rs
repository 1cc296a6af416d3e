//! Login, registration and logout.

use std::sync::{Arc, Mutex};

use avis_client::AvisError;
use tracing::{error, info, warn};

use super::{lock, SERVER_ERROR_MESSAGE};
use crate::events::{AppMode, EventBus, ModeSignal, WorkflowEvent};
use crate::kernel::BaseReputationService;
use crate::session::SessionStore;
use crate::validation::{validate_email, validate_password, Field, ValidationError};

/// Shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Registration succeeded, please log in";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Idle,
    Validating,
    /// Input rejected locally; no call was made
    Error,
    Pending,
    Succeeded,
    /// Rejected by the service or unreachable
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub message: Option<String>,
}

pub struct AuthWorkflow {
    api: Arc<dyn BaseReputationService>,
    session: Arc<SessionStore>,
    mode: ModeSignal,
    events: EventBus,
    state: Mutex<AuthState>,
}

impl AuthWorkflow {
    pub fn new(
        api: Arc<dyn BaseReputationService>,
        session: Arc<SessionStore>,
        mode: ModeSignal,
        events: EventBus,
    ) -> Self {
        Self {
            api,
            session,
            mode,
            events,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        lock(&self.state).clone()
    }

    fn set(&self, status: AuthStatus, message: Option<String>) -> AuthStatus {
        *lock(&self.state) = AuthState { status, message };
        status
    }

    fn invalid(&self, err: ValidationError) -> AuthStatus {
        self.set(AuthStatus::Error, Some(err.to_string()))
    }

    fn failed(&self, err: AvisError) -> AuthStatus {
        let message = match err {
            AvisError::Transport(e) => {
                warn!(error = %e, "Transport failure during authentication");
                SERVER_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        self.set(AuthStatus::Failed, Some(message))
    }

    /// Exchange credentials for a session and switch to authenticated mode.
    pub async fn login(&self, email: &str, password: &str) -> AuthStatus {
        self.set(AuthStatus::Validating, None);

        if email.trim().is_empty() {
            return self.invalid(ValidationError::Empty(Field::Email));
        }
        if password.is_empty() {
            return self.invalid(ValidationError::Empty(Field::Password));
        }
        let email = match validate_email(email) {
            Ok(email) => email,
            Err(e) => return self.invalid(e),
        };

        self.set(AuthStatus::Pending, None);
        let session = match self.api.login(&email, password).await {
            Ok(session) => session,
            Err(e) => return self.failed(e),
        };

        let email = session.user.email.clone();
        if let Err(e) = self.session.set(session) {
            error!(error = %e, "Failed to persist session");
            return self.set(AuthStatus::Failed, Some(e.to_string()));
        }

        info!(email = %email, "Logged in");
        self.mode.set(AppMode::Authenticated);
        self.events.emit(WorkflowEvent::LoggedIn { email });
        self.set(AuthStatus::Succeeded, None)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, email: &str, password: &str) -> AuthStatus {
        self.set(AuthStatus::Validating, None);

        if email.trim().is_empty() {
            return self.invalid(ValidationError::Empty(Field::Email));
        }
        let email = match validate_email(email) {
            Ok(email) => email,
            Err(e) => return self.invalid(e),
        };
        if let Err(e) = validate_password(password) {
            return self.invalid(e);
        }

        self.set(AuthStatus::Pending, None);
        match self.api.register(&email, password).await {
            Ok(()) => {
                info!(email = %email, "Registered");
                self.set(AuthStatus::Succeeded, Some(REGISTERED_MESSAGE.to_string()))
            }
            Err(e) => self.failed(e),
        }
    }

    /// Register, then sign in with the same credentials.
    pub async fn register_and_login(&self, email: &str, password: &str) -> AuthStatus {
        match self.register(email, password).await {
            AuthStatus::Succeeded => self.login(email, password).await,
            other => other,
        }
    }

    /// Forget the session and switch to unauthenticated mode.
    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            error!(error = %e, "Failed to clear persisted session");
        }
        info!("Logged out");
        self.mode.set(AppMode::Unauthenticated);
        self.events.emit(WorkflowEvent::LoggedOut);
        self.set(AuthStatus::Idle, None);
    }
}
