// Production reputation service backed by the REST client

use async_trait::async_trait;
use avis_client::{AvisClient, NewReview, Result, Review};

use super::BaseReputationService;
use crate::config::Config;
use crate::session::Session;

/// Adapter from [`AvisClient`] to [`BaseReputationService`].
#[derive(Clone)]
pub struct ReputationService {
    client: AvisClient,
}

impl ReputationService {
    pub fn new(client: AvisClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(AvisClient::new(config.api_url.clone()))
    }
}

#[async_trait]
impl BaseReputationService for ReputationService {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self.client.login(email, password).await?;
        Ok(Session::new(response.token, response.user))
    }

    async fn register(&self, email: &str, password: &str) -> Result<()> {
        self.client.register(email, password).await
    }

    async fn search(&self, phone: &str, token: &str) -> Result<Vec<Review>> {
        self.client.search(phone, token).await
    }

    async fn add_review(&self, review: &NewReview, token: &str) -> Result<()> {
        self.client.add_review(review, token).await
    }
}
