//! Shared harness for avis-core integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use avis_client::Review;
use avis_core::kernel::test_dependencies::MockReputationService;
use avis_core::{MemorySessionStorage, Orchestrator, Session};
use chrono::{TimeZone, Utc};

pub const PHONE: &str = "0612345678";
pub const TOKEN: &str = "jwt-abc";
pub const EMAIL: &str = "pro@example.com";

pub struct TestHarness {
    pub api: MockReputationService,
    pub storage: Arc<MemorySessionStorage>,
    pub orchestrator: Orchestrator,
}

impl TestHarness {
    /// Orchestrator started with a persisted session
    pub fn signed_in(api: MockReputationService) -> Self {
        let storage = Arc::new(MemorySessionStorage::with_session(session()));
        Self::start(api, storage)
    }

    /// Orchestrator started with nothing persisted
    pub fn signed_out(api: MockReputationService) -> Self {
        Self::start(api, Arc::new(MemorySessionStorage::new()))
    }

    fn start(api: MockReputationService, storage: Arc<MemorySessionStorage>) -> Self {
        let orchestrator = Orchestrator::bootstrap(Arc::new(api.clone()), storage.clone());
        Self {
            api,
            storage,
            orchestrator,
        }
    }
}

pub fn session() -> Session {
    Session::new(
        TOKEN,
        avis_client::User::new(avis_client::UserId::Number(1), EMAIL),
    )
}

pub fn review(is_positive: bool, message: &str) -> Review {
    Review {
        is_positive,
        message: Some(message.to_string()),
        author_email: "shop@example.com".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
    }
}
