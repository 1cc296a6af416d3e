// Avis - client core for the phone reputation service
//
// Session state machine plus the search and add-review workflows. The
// presentation layer calls the Orchestrator and renders its state; it holds
// no logic of its own.

pub mod config;
pub mod events;
pub mod kernel;
pub mod orchestrator;
pub mod session;
pub mod unauthorized;
pub mod validation;
pub mod workflows;

pub use config::Config;
pub use events::{AppMode, EventBus, ModeSignal, WorkflowEvent};
pub use kernel::{BaseReputationService, ReputationService};
pub use orchestrator::Orchestrator;
pub use session::{
    BaseSessionStorage, FileSessionStorage, MemorySessionStorage, Session, SessionError,
    SessionStore,
};
pub use unauthorized::UnauthorizedHandler;
pub use validation::{validate_email, validate_password, validate_phone, Field, ValidationError};
pub use workflows::{
    AddReviewState, AddReviewStatus, AuthState, AuthStatus, NewReviewDraft, SearchState,
    SearchStatus,
};
