//! Hosted row-store repository (PostgREST protocol).
//!
//! Talks to `{base}/rest/v1/messages` with the project's anon key, the way a
//! Supabase-style backend expects: the key goes in both the `apikey` header
//! and as a bearer token.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use pocketchat_core::repository::MessageRepository;
use pocketchat_types::error::RepositoryError;
use pocketchat_types::message::{Message, NewMessage};

const TABLE_PATH: &str = "/rest/v1/messages";

/// `MessageRepository` over HTTP.
#[derive(Clone)]
pub struct RestMessageRepository {
    client: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
}

impl RestMessageRepository {
    pub fn new(
        base_url: &str,
        anon_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn table_url(&self) -> String {
        format!("{}{TABLE_PATH}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.anon_key.expose_secret();
        builder
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    async fn rows(&self, response: reqwest::Response) -> Result<Vec<Message>, RepositoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Query(format!("HTTP {status}: {body}")));
        }
        response
            .json::<Vec<Message>>()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    }
}

impl MessageRepository for RestMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(message)
            .send()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        self.rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NoRow)
    }

    async fn list_recent(&self, user_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        let owner = format!("eq.{user_id}");
        let limit = limit.to_string();
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("user_id", owner.as_str()),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let rows = self.rows(response).await?;
        debug!(count = rows.len(), "Fetched rows from row store");
        Ok(rows)
    }
}
