//! Signals from the core to the presentation layer.
//!
//! - [`ModeSignal`]: the authenticated/unauthenticated application mode
//!   (latest value wins, `tokio::sync::watch`).
//! - [`EventBus`]: facts about completed workflow steps
//!   (at-most-once broadcast; slow receivers may lag and miss events).

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

/// Default channel capacity for the event bus.
const DEFAULT_CAPACITY: usize = 256;

/// Which surface the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Authenticated,
    Unauthenticated,
}

/// Facts emitted by the workflows after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    LoggedIn { email: String },
    LoggedOut,
    /// The service rejected the bearer token during `operation`
    SessionInvalidated { operation: &'static str },
    SearchCompleted { phone: String, count: usize },
    ReviewSubmitted { client_phone: String },
}

/// Broadcast bus for [`WorkflowEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers (fire-and-forget).
    ///
    /// Returns the number of receivers that received the event.
    pub fn emit(&self, event: WorkflowEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Current [`AppMode`], observable by the presentation layer.
#[derive(Clone)]
pub struct ModeSignal {
    sender: Arc<watch::Sender<AppMode>>,
}

impl ModeSignal {
    pub fn new(initial: AppMode) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Set the mode. Returns true if it changed.
    pub fn set(&self, mode: AppMode) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        })
    }

    pub fn current(&self) -> AppMode {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppMode> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_set_reports_changes_only() {
        let mode = ModeSignal::new(AppMode::Unauthenticated);

        assert!(mode.set(AppMode::Authenticated));
        assert!(!mode.set(AppMode::Authenticated));
        assert_eq!(mode.current(), AppMode::Authenticated);
    }

    #[tokio::test]
    async fn test_mode_subscribers_observe_latest_value() {
        let mode = ModeSignal::new(AppMode::Authenticated);
        let mut rx = mode.subscribe();

        mode.set(AppMode::Unauthenticated);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AppMode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_event_bus_delivers_to_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.emit(WorkflowEvent::LoggedOut), 0);

        let mut rx = bus.subscribe();
        assert_eq!(bus.emit(WorkflowEvent::LoggedOut), 1);
        assert_eq!(rx.recv().await.unwrap(), WorkflowEvent::LoggedOut);
    }
}
