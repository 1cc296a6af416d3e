// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no workflow logic.
// Naming convention: Base* for trait names (e.g., BaseReputationService)

use async_trait::async_trait;
use avis_client::{NewReview, Result, Review};

use crate::session::Session;

// =============================================================================
// Reputation Service Trait (Infrastructure - remote login/lookup/insert)
// =============================================================================

#[async_trait]
pub trait BaseReputationService: Send + Sync {
    /// Exchange credentials for a session (token + user)
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// Create an account. Does not establish a session.
    async fn register(&self, email: &str, password: &str) -> Result<()>;

    /// All reviews recorded for a client phone number
    async fn search(&self, phone: &str, token: &str) -> Result<Vec<Review>>;

    /// Record a review for a client phone number
    async fn add_review(&self, review: &NewReview, token: &str) -> Result<()>;
}
