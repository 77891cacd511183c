//! Inbox access coordination.
//!
//! Root orchestration between the address normalizer, the mailbox store
//! client, the cache policy and the notification hub. Collaborators are
//! injected through the constructor; nothing is looked up from ambient
//! state.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::address::{self, MailboxKey};
use crate::cache::CacheDirective;
use crate::error::{Result, WebError};
use crate::notify::{ConnectionId, NotificationHub, ViewerSubscription};
use crate::store::{ArrivalEvent, MailMessage, MailSummary, MailboxStore, MessageId};

/// Inbox data ready to render: address, newest-first summaries, cache policy.
#[derive(Debug)]
pub struct InboxView {
    pub address: MailboxKey,
    pub summaries: Vec<MailSummary>,
    pub cache: CacheDirective,
}

/// One resolved message plus its cache policy.
#[derive(Debug)]
pub struct MessageView {
    pub address: MailboxKey,
    pub mail: MailMessage,
    pub cache: CacheDirective,
}

pub struct InboxCoordinator {
    store: Arc<dyn MailboxStore>,
    hub: Arc<NotificationHub>,
}

impl InboxCoordinator {
    pub fn new(store: Arc<dyn MailboxStore>, hub: Arc<NotificationHub>) -> Self {
        Self { store, hub }
    }

    pub async fn show_inbox(&self, raw_address: &str) -> Result<InboxView> {
        let key = address::normalize(raw_address)?;

        let summaries = self.store.list_summaries(&key).await.map_err(|err| {
            error!("Mailbox store failed listing {}: {}", key, err);
            WebError::StoreUnavailable(err.to_string())
        })?;

        debug!("Inbox {} has {} message(s)", key, summaries.len());
        Ok(InboxView {
            address: key,
            summaries,
            cache: CacheDirective::for_listing(),
        })
    }

    pub async fn show_message(&self, raw_address: &str, raw_id: &str) -> Result<MessageView> {
        let key = address::normalize(raw_address)?;
        let id = parse_message_id(raw_id)?;

        match self.store.get_one(&key, id).await {
            Ok(Some(mail)) => Ok(MessageView {
                address: key,
                mail,
                cache: CacheDirective::for_message(),
            }),
            Ok(None) => Err(WebError::NotFound),
            Err(err) => {
                error!("Mailbox store failed fetching {}/{}: {}", key, id, err);
                Err(WebError::StoreUnavailable(err.to_string()))
            }
        }
    }

    /// Allocate an id for a new live connection.
    pub fn connection_id(&self) -> ConnectionId {
        self.hub.connection_id()
    }

    /// Register a live viewer for an inbox. Calling again for the same
    /// connection refreshes rather than duplicates the subscription.
    pub fn register_viewer(
        &self,
        raw_address: &str,
        conn: ConnectionId,
        tx: UnboundedSender<ArrivalEvent>,
    ) -> Result<ViewerSubscription> {
        let key = address::normalize(raw_address)?;
        Ok(self.hub.subscribe(&key, conn, tx))
    }

    pub fn drop_viewer(&self, subscription: &ViewerSubscription) {
        self.hub.unsubscribe(subscription);
    }

    /// Forward a new-mail signal from the store's delivery path to the
    /// viewers currently watching that mailbox.
    pub fn handle_arrival(&self, event: ArrivalEvent) {
        self.hub.publish(&event);
    }
}

/// Message ids are decimal digits only; anything else is rejected here and
/// never reaches the store.
fn parse_message_id(raw: &str) -> Result<MessageId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WebError::InvalidId);
    }
    raw.parse().map_err(|_| WebError::InvalidId)
}
