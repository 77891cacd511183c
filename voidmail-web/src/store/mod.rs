//! Read interface to the mailbox store.
//!
//! The store itself (delivery, parsing, retention) is a separate system;
//! this crate consumes two read operations plus the arrival signal.
//! [`MemoryStore`] backs development and the test suite, [`HttpStore`]
//! talks to a remote store service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::MailboxKey;

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// Store-assigned message identifier, unique and monotonic per mailbox.
pub type MessageId = u64;

/// Listing entry for one delivered message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSummary {
    pub id: MessageId,
    pub from: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Full message. Content is immutable once delivered; the cache policy for
/// message views depends on that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    pub id: MessageId,
    pub from: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
    pub is_read: bool,
    pub body: String,
}

/// Transient new-mail signal. Not persisted, not replayed on reconnect.
#[derive(Debug, Clone, Serialize)]
pub struct ArrivalEvent {
    pub mailbox: MailboxKey,
    pub id: MessageId,
}

/// Transient infrastructure failure talking to the store. A missing message
/// is not an error; that is the `Ok(None)` outcome of [`MailboxStore::get_one`].
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreUnavailable(pub String);

#[async_trait]
pub trait MailboxStore: Send + Sync {
    /// Summaries for one mailbox, most recent first. An address that never
    /// received mail yields an empty list, indistinguishable from an empty
    /// mailbox.
    async fn list_summaries(
        &self,
        key: &MailboxKey,
    ) -> std::result::Result<Vec<MailSummary>, StoreUnavailable>;

    /// One full message, or `None` when the id does not resolve within this
    /// mailbox (wrong id, purged, or delivered to a different address).
    async fn get_one(
        &self,
        key: &MailboxKey,
        id: MessageId,
    ) -> std::result::Result<Option<MailMessage>, StoreUnavailable>;
}
