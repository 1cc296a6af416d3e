//! User-triggered workflows: validation, one remote call, one state transition.
//!
//! Search and add-review share [`run_authorized`]: they differ only in the
//! request they send, how they apply a successful result, and (for
//! add-review) the [`ReviewSubmittedListener`] notification.

pub mod add_review;
pub mod auth;
pub mod search;

pub use add_review::{AddReviewState, AddReviewStatus, AddReviewWorkflow, NewReviewDraft};
pub use auth::{AuthState, AuthStatus, AuthWorkflow};
pub use search::{SearchState, SearchStatus, SearchWorkflow};

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use avis_client::AvisError;
use tracing::{debug, warn};

use crate::events::EventBus;
use crate::kernel::BaseReputationService;
use crate::session::SessionStore;
use crate::unauthorized::UnauthorizedHandler;

/// Shown for network or parse failures.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Shown when the service rejects the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please sign in again";

/// Receives successful review submissions.
///
/// The search workflow implements this to refresh results for the phone
/// number it is currently showing.
#[async_trait]
pub trait ReviewSubmittedListener: Send + Sync {
    async fn on_review_submitted(&self, client_phone: &str);
}

/// Everything a workflow needs to make an authorized call.
#[derive(Clone)]
pub struct WorkflowDeps {
    pub api: Arc<dyn BaseReputationService>,
    pub session: Arc<SessionStore>,
    pub unauthorized: Arc<UnauthorizedHandler>,
    pub events: EventBus,
}

/// How an authorized remote call resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Completed(T),
    /// The Unauthorized handler has already run
    Unauthorized,
    /// Business-rule rejection; message from the service, shown verbatim
    Rejected(String),
    /// Network or parse failure; generic message
    Unreachable(String),
}

/// Attach the current bearer token, issue `call` once, and classify the result.
///
/// A missing token is treated as Unauthorized without touching the network.
pub(crate) async fn run_authorized<T, F, Fut>(
    deps: &WorkflowDeps,
    operation: &'static str,
    call: F,
) -> Resolution<T>
where
    F: FnOnce(Arc<dyn BaseReputationService>, String) -> Fut,
    Fut: Future<Output = avis_client::Result<T>>,
{
    let Some(token) = deps.session.token() else {
        debug!(operation, "No session token");
        deps.unauthorized.handle(operation);
        return Resolution::Unauthorized;
    };

    match call(deps.api.clone(), token).await {
        Ok(value) => Resolution::Completed(value),
        Err(AvisError::Unauthorized) => {
            deps.unauthorized.handle(operation);
            Resolution::Unauthorized
        }
        Err(AvisError::Transport(e)) => {
            warn!(operation, error = %e, "Transport failure");
            Resolution::Unreachable(SERVER_ERROR_MESSAGE.to_string())
        }
        Err(other) => {
            debug!(operation, error = %other, "Service rejected request");
            Resolution::Rejected(other.to_string())
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
