//! Pure REST client for the phone reputation ("avis") service.
//!
//! Every call is single-shot: no retry, no timeout beyond the transport's
//! own, no idempotency key. Outcomes are classified uniformly:
//!
//! - 2xx: success
//! - 401/403 on a bearer-authenticated call: [`AvisError::Unauthorized`]
//! - any other non-2xx: the body's `message` field (or a generic fallback)
//! - network or parse failure: [`AvisError::Transport`]
//!
//! # Example
//!
//! ```rust,ignore
//! use avis_client::AvisClient;
//!
//! let client = AvisClient::new("http://localhost:5000");
//!
//! let login = client.login("pro@example.com", "secret1").await?;
//! let reviews = client.search("0612345678", &login.token).await?;
//! for review in &reviews {
//!     println!("{} {}", review.is_positive, review.author_email);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{AvisError, Result};
pub use types::{Credentials, LoginResponse, NewReview, Review, SearchResponse, User, UserId};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use types::ErrorBody;

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";
const DOMAIN_FALLBACK: &str = "Request failed";

/// Which classification applies to a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Login,
    Register,
    /// Bearer-authenticated endpoints (search, add review)
    Authorized,
}

/// Client for the reputation service REST API.
#[derive(Clone)]
pub struct AvisClient {
    http_client: Client,
    base_url: String,
}

impl AvisClient {
    /// Create a client for the service rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/api/login", self.base_url);
        let request = self
            .http_client
            .post(&url)
            .json(&Credentials { email, password });

        self.execute(request, Endpoint::Login).await
    }

    /// `POST /api/register`
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/register", self.base_url);
        let request = self
            .http_client
            .post(&url)
            .json(&Credentials { email, password });

        self.send(request, Endpoint::Register).await?;
        Ok(())
    }

    /// `GET /api/avis/{phone}`
    pub async fn search(&self, phone: &str, token: &str) -> Result<Vec<Review>> {
        let url = format!("{}/api/avis/{}", self.base_url, urlencoding::encode(phone));
        let request = self.http_client.get(&url).bearer_auth(token);

        let response: SearchResponse = self.execute(request, Endpoint::Authorized).await?;
        debug!(phone, count = response.avis.len(), "Search returned reviews");
        Ok(response.avis)
    }

    /// `POST /api/avis`
    pub async fn add_review(&self, review: &NewReview, token: &str) -> Result<()> {
        let url = format!("{}/api/avis", self.base_url);
        let request = self.http_client.post(&url).bearer_auth(token).json(review);

        self.send(request, Endpoint::Authorized).await?;
        Ok(())
    }

    /// Send and parse a JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<T> {
        let response = self.send(request, endpoint).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send and classify non-2xx statuses. The body of a success is left unread.
    async fn send(&self, request: RequestBuilder, endpoint: Endpoint) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, ?endpoint, "Request to reputation service failed");
            AvisError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(status, response, endpoint).await);
        }
        Ok(response)
    }
}

async fn classify_failure(status: StatusCode, response: Response, endpoint: Endpoint) -> AvisError {
    if endpoint == Endpoint::Authorized
        && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    {
        debug!(status = status.as_u16(), "Service rejected bearer token");
        return AvisError::Unauthorized;
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    debug!(status = status.as_u16(), ?endpoint, ?message, "Service returned an error");

    match endpoint {
        Endpoint::Login => AvisError::Auth(message.unwrap_or_else(|| LOGIN_FALLBACK.to_string())),
        Endpoint::Register => {
            AvisError::Registration(message.unwrap_or_else(|| REGISTER_FALLBACK.to_string()))
        }
        Endpoint::Authorized => {
            AvisError::Domain(message.unwrap_or_else(|| DOMAIN_FALLBACK.to_string()))
        }
    }
}
