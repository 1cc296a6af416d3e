// Test dependencies - mock implementations for testing
//
// Provides a mock reputation service that can be injected into the
// orchestrator for tests. Responses are queued per operation; every call is
// recorded with its arguments.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use avis_client::{AvisError, NewReview, Result, Review, User, UserId};

use super::BaseReputationService;
use crate::session::Session;

// =============================================================================
// Mock Reputation Service
// =============================================================================

/// Arguments captured from a search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub phone: String,
    pub token: String,
}

/// Arguments captured from an add-review call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReviewCall {
    pub review: NewReview,
    pub token: String,
}

/// A queued response, optionally delayed before it resolves
struct Queued<T> {
    result: Result<T>,
    delay: Option<Duration>,
}

impl<T> Queued<T> {
    fn now(result: Result<T>) -> Self {
        Self { result, delay: None }
    }
}

#[derive(Default)]
struct MockState {
    login_responses: VecDeque<Queued<Session>>,
    register_responses: VecDeque<Queued<()>>,
    search_responses: VecDeque<Queued<Vec<Review>>>,
    add_review_responses: VecDeque<Queued<()>>,
    login_calls: Vec<(String, String)>,
    register_calls: Vec<(String, String)>,
    search_calls: Vec<SearchCall>,
    add_review_calls: Vec<AddReviewCall>,
}

/// Mock service. When a queue is empty: login fails with a generic auth
/// error, search returns no reviews, register and add-review succeed.
#[derive(Clone, Default)]
pub struct MockReputationService {
    state: Arc<Mutex<MockState>>,
}

impl MockReputationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_result(self, result: Result<Session>) -> Self {
        self.state.lock().unwrap().login_responses.push_back(Queued::now(result));
        self
    }

    /// Queue a successful login for `email` returning `token`
    pub fn with_login_success(self, email: &str, token: &str) -> Self {
        let session = Session::new(token, User::new(UserId::Number(1), email));
        self.with_login_result(Ok(session))
    }

    pub fn with_register_result(self, result: Result<()>) -> Self {
        self.state
            .lock()
            .unwrap()
            .register_responses
            .push_back(Queued::now(result));
        self
    }

    pub fn with_search_result(self, result: Result<Vec<Review>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .search_responses
            .push_back(Queued::now(result));
        self
    }

    /// Queue a search result that resolves only after `delay`
    pub fn with_delayed_search_result(self, result: Result<Vec<Review>>, delay: Duration) -> Self {
        self.state.lock().unwrap().search_responses.push_back(Queued {
            result,
            delay: Some(delay),
        });
        self
    }

    pub fn with_add_review_result(self, result: Result<()>) -> Self {
        self.state
            .lock()
            .unwrap()
            .add_review_responses
            .push_back(Queued::now(result));
        self
    }

    /// All (email, password) pairs passed to login
    pub fn login_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().login_calls.clone()
    }

    /// All (email, password) pairs passed to register
    pub fn register_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().register_calls.clone()
    }

    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.state.lock().unwrap().search_calls.clone()
    }

    pub fn add_review_calls(&self) -> Vec<AddReviewCall> {
        self.state.lock().unwrap().add_review_calls.clone()
    }

    /// Total number of network calls made, across all operations
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.login_calls.len()
            + state.register_calls.len()
            + state.search_calls.len()
            + state.add_review_calls.len()
    }
}

async fn resolve<T>(queued: Option<Queued<T>>, default: impl FnOnce() -> Result<T>) -> Result<T> {
    match queued {
        Some(Queued { result, delay }) => {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
        None => default(),
    }
}

#[async_trait]
impl BaseReputationService for MockReputationService {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let queued = {
            let mut state = self.state.lock().unwrap();
            state
                .login_calls
                .push((email.to_string(), password.to_string()));
            state.login_responses.pop_front()
        };
        resolve(queued, || Err(AvisError::Auth("Invalid credentials".to_string()))).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<()> {
        let queued = {
            let mut state = self.state.lock().unwrap();
            state
                .register_calls
                .push((email.to_string(), password.to_string()));
            state.register_responses.pop_front()
        };
        resolve(queued, || Ok(())).await
    }

    async fn search(&self, phone: &str, token: &str) -> Result<Vec<Review>> {
        let queued = {
            let mut state = self.state.lock().unwrap();
            state.search_calls.push(SearchCall {
                phone: phone.to_string(),
                token: token.to_string(),
            });
            state.search_responses.pop_front()
        };
        resolve(queued, || Ok(Vec::new())).await
    }

    async fn add_review(&self, review: &NewReview, token: &str) -> Result<()> {
        let queued = {
            let mut state = self.state.lock().unwrap();
            state.add_review_calls.push(AddReviewCall {
                review: review.clone(),
                token: token.to_string(),
            });
            state.add_review_responses.pop_front()
        };
        resolve(queued, || Ok(())).await
    }
}
