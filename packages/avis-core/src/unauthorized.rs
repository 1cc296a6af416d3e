//! Global reaction to an authorization failure on any call.

use std::sync::Arc;

use tracing::{error, warn};

use crate::events::{AppMode, EventBus, ModeSignal, WorkflowEvent};
use crate::session::SessionStore;

/// Clears the session and flips the application to unauthenticated mode.
///
/// Not coordinated with other in-flight workflows: a call dispatched before
/// the reset still runs to completion and applies its own result.
pub struct UnauthorizedHandler {
    session: Arc<SessionStore>,
    mode: ModeSignal,
    events: EventBus,
}

impl UnauthorizedHandler {
    pub fn new(session: Arc<SessionStore>, mode: ModeSignal, events: EventBus) -> Self {
        Self {
            session,
            mode,
            events,
        }
    }

    /// React to an Unauthorized outcome from `operation`.
    pub fn handle(&self, operation: &'static str) {
        warn!(operation, "Service rejected the session, signing out");

        if let Err(e) = self.session.clear() {
            error!(error = %e, "Failed to clear persisted session");
        }
        self.mode.set(AppMode::Unauthenticated);
        self.events
            .emit(WorkflowEvent::SessionInvalidated { operation });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStorage, Session};
    use avis_client::{User, UserId};

    #[test]
    fn test_handle_clears_session_and_signals_mode() {
        let storage = Arc::new(MemorySessionStorage::new());
        let session = Arc::new(SessionStore::new(storage.clone()));
        session
            .set(Session::new("jwt", User::new(UserId::Number(1), "a@b.co")))
            .unwrap();
        let mode = ModeSignal::new(AppMode::Authenticated);
        let events = EventBus::new();
        let mut rx = events.subscribe();

        let handler = UnauthorizedHandler::new(session.clone(), mode.clone(), events);
        handler.handle("search");

        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
        assert_eq!(storage.clear_count(), 1);
        assert_eq!(mode.current(), AppMode::Unauthenticated);
        assert_eq!(
            rx.try_recv().unwrap(),
            WorkflowEvent::SessionInvalidated {
                operation: "search"
            }
        );
    }
}
