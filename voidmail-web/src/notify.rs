//! Notification hub: fans new-mail arrivals out to live inbox viewers.
//!
//! Registry of currently-subscribed connections per mailbox key. Sharded
//! map so traffic on unrelated mailboxes never contends; operations on one
//! key are linearized by its shard. Delivery is fire-and-forget over each
//! viewer's queue; the inbox page's own fetch-on-load is the correctness
//! backstop, not this push.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::address::MailboxKey;
use crate::store::ArrivalEvent;

/// Identifies one live connection. Two browser tabs are two connections.
pub type ConnectionId = u64;

/// Handle for one (mailbox, connection) registration. Owned by the hub;
/// holders only pass it back to [`NotificationHub::unsubscribe`].
#[derive(Debug, Clone)]
pub struct ViewerSubscription {
    key: MailboxKey,
    conn: ConnectionId,
}

impl ViewerSubscription {
    pub fn mailbox(&self) -> &MailboxKey {
        &self.key
    }
}

pub struct NotificationHub {
    viewers: DashMap<MailboxKey, HashMap<ConnectionId, UnboundedSender<ArrivalEvent>>>,
    next_conn: AtomicU64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            viewers: DashMap::new(),
            next_conn: AtomicU64::new(1),
        }
    }

    /// Allocate an id for a new connection.
    pub fn connection_id(&self) -> ConnectionId {
        self.next_conn.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a connection as a viewer of `key`. Idempotent per
    /// (key, connection): re-subscribing is a no-op, never a duplicate.
    pub fn subscribe(
        &self,
        key: &MailboxKey,
        conn: ConnectionId,
        tx: UnboundedSender<ArrivalEvent>,
    ) -> ViewerSubscription {
        self.viewers
            .entry(key.clone())
            .or_default()
            .entry(conn)
            .or_insert(tx);

        ViewerSubscription {
            key: key.clone(),
            conn,
        }
    }

    /// Remove a registration. Safe to call repeatedly; a key whose viewer
    /// set empties is dropped from the registry entirely.
    pub fn unsubscribe(&self, subscription: &ViewerSubscription) {
        let mut emptied = false;
        if let Some(mut conns) = self.viewers.get_mut(&subscription.key) {
            conns.remove(&subscription.conn);
            emptied = conns.is_empty();
        }
        if emptied {
            self.viewers
                .remove_if(&subscription.key, |_, conns| conns.is_empty());
        }
    }

    /// Deliver an arrival to every viewer of its mailbox. Zero viewers is a
    /// normal no-op. A connection whose queue is gone is pruned on the
    /// spot, so dead connections never outlive the next publish to their key.
    pub fn publish(&self, event: &ArrivalEvent) {
        let mut emptied = false;
        if let Some(mut conns) = self.viewers.get_mut(&event.mailbox) {
            let before = conns.len();
            conns.retain(|_, tx| tx.send(event.clone()).is_ok());
            if conns.len() < before {
                debug!(
                    "Pruned {} dead viewer(s) of {}",
                    before - conns.len(),
                    event.mailbox
                );
            }
            emptied = conns.is_empty();
        }
        if emptied {
            self.viewers.remove_if(&event.mailbox, |_, conns| conns.is_empty());
        }
    }

    /// Number of live viewers for a mailbox.
    pub fn viewer_count(&self, key: &MailboxKey) -> usize {
        self.viewers.get(key).map(|conns| conns.len()).unwrap_or(0)
    }
}
