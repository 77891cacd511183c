//! In-process mailbox store.
//!
//! Backs the default development configuration and the test suite. It also
//! hosts the delivery entry point, so arrivals are signalled on an
//! in-process broadcast channel instead of the webhook a remote store uses.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use super::{ArrivalEvent, MailMessage, MailSummary, MailboxStore, MessageId, StoreUnavailable};
use crate::address::MailboxKey;

const ARRIVAL_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct MailboxState {
    next_id: MessageId,
    messages: Vec<MailMessage>,
}

pub struct MemoryStore {
    mailboxes: DashMap<MailboxKey, MailboxState>,
    arrivals: broadcast::Sender<ArrivalEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (arrivals, _) = broadcast::channel(ARRIVAL_CHANNEL_CAPACITY);
        Self {
            mailboxes: DashMap::new(),
            arrivals,
        }
    }

    /// Subscribe to this store's arrival signal.
    pub fn arrivals(&self) -> broadcast::Receiver<ArrivalEvent> {
        self.arrivals.subscribe()
    }

    /// Delivery entry point: assigns the next id, stamps the receive time
    /// and signals the arrival.
    pub fn deliver(&self, key: &MailboxKey, from: &str, subject: &str, body: &str) -> MailSummary {
        let mut mailbox = self.mailboxes.entry(key.clone()).or_default();
        mailbox.next_id += 1;

        let message = MailMessage {
            id: mailbox.next_id,
            from: from.to_string(),
            subject: subject.to_string(),
            received_at: Utc::now(),
            is_read: false,
            body: body.to_string(),
        };
        let summary = MailSummary {
            id: message.id,
            from: message.from.clone(),
            subject: message.subject.clone(),
            received_at: message.received_at,
            is_read: message.is_read,
        };
        mailbox.messages.push(message);
        drop(mailbox);

        debug!("Delivered message {} to {}", summary.id, key);
        let _ = self.arrivals.send(ArrivalEvent {
            mailbox: key.clone(),
            id: summary.id,
        });
        summary
    }
}

#[async_trait]
impl MailboxStore for MemoryStore {
    async fn list_summaries(
        &self,
        key: &MailboxKey,
    ) -> std::result::Result<Vec<MailSummary>, StoreUnavailable> {
        let mut summaries: Vec<MailSummary> = match self.mailboxes.get(key) {
            Some(mailbox) => mailbox
                .messages
                .iter()
                .map(|m| MailSummary {
                    id: m.id,
                    from: m.from.clone(),
                    subject: m.subject.clone(),
                    received_at: m.received_at,
                    is_read: m.is_read,
                })
                .collect(),
            None => Vec::new(),
        };

        summaries.sort_by(|a, b| b.received_at.cmp(&a.received_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn get_one(
        &self,
        key: &MailboxKey,
        id: MessageId,
    ) -> std::result::Result<Option<MailMessage>, StoreUnavailable> {
        Ok(self
            .mailboxes
            .get(key)
            .and_then(|mailbox| mailbox.messages.iter().find(|m| m.id == id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::normalize;

    #[tokio::test]
    async fn test_unused_mailbox_lists_empty() {
        let store = MemoryStore::new();
        let key = normalize("nobody@example.com").unwrap();
        assert!(store.list_summaries(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = MemoryStore::new();
        let key = normalize("user@example.com").unwrap();
        store.deliver(&key, "a@example.com", "first", "1");
        store.deliver(&key, "b@example.com", "second", "2");

        let summaries = store.list_summaries(&key).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].subject, "second");
        assert_eq!(summaries[1].subject, "first");
    }

    #[tokio::test]
    async fn test_get_one_does_not_cross_mailboxes() {
        let store = MemoryStore::new();
        let alice = normalize("alice@example.com").unwrap();
        let bob = normalize("bob@example.com").unwrap();
        let delivered = store.deliver(&alice, "x@example.com", "for alice", "body");

        assert!(store.get_one(&bob, delivered.id).await.unwrap().is_none());
        assert!(store.get_one(&alice, delivered.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deliver_signals_arrival() {
        let store = MemoryStore::new();
        let key = normalize("user@example.com").unwrap();
        let mut arrivals = store.arrivals();

        let delivered = store.deliver(&key, "a@example.com", "hi", "body");

        let event = arrivals.try_recv().unwrap();
        assert_eq!(event.mailbox, key);
        assert_eq!(event.id, delivered.id);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_per_mailbox() {
        let store = MemoryStore::new();
        let key = normalize("user@example.com").unwrap();
        let first = store.deliver(&key, "a@example.com", "one", "1");
        let second = store.deliver(&key, "a@example.com", "two", "2");
        assert!(second.id > first.id);
    }
}
