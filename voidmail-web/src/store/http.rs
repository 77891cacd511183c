//! HTTP client for a remote mailbox store service.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{MailMessage, MailSummary, MailboxStore, MessageId, StoreUnavailable};
use crate::address::MailboxKey;

pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailboxStore for HttpStore {
    async fn list_summaries(
        &self,
        key: &MailboxKey,
    ) -> std::result::Result<Vec<MailSummary>, StoreUnavailable> {
        let url = format!("{}/mailboxes/{}/messages", self.base_url, key);
        debug!("Listing summaries from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;

        // A mailbox the store has never seen answers like an empty one; an
        // unused address carries no existence signal.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(StoreUnavailable(format!(
                "store answered {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))
    }

    async fn get_one(
        &self,
        key: &MailboxKey,
        id: MessageId,
    ) -> std::result::Result<Option<MailMessage>, StoreUnavailable> {
        let url = format!("{}/mailboxes/{}/messages/{}", self.base_url, key, id);
        debug!("Fetching message from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreUnavailable(format!(
                "store answered {}",
                response.status()
            )));
        }

        let message = response
            .json()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;
        Ok(Some(message))
    }
}
