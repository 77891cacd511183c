//! End-to-end exercises of the coordinator over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use voidmail_web::address::{normalize, MailboxKey};
use voidmail_web::coordinator::InboxCoordinator;
use voidmail_web::error::{ErrorClass, WebError};
use voidmail_web::notify::NotificationHub;
use voidmail_web::store::{
    MailMessage, MailSummary, MailboxStore, MemoryStore, MessageId, StoreUnavailable,
};

fn setup() -> (Arc<MemoryStore>, Arc<NotificationHub>, InboxCoordinator) {
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(NotificationHub::new());
    let coordinator = InboxCoordinator::new(store.clone(), hub.clone());
    (store, hub, coordinator)
}

#[tokio::test]
async fn test_delivered_mail_shows_up_with_no_store_directive() {
    let (store, _hub, coordinator) = setup();
    let key = normalize("user@example.com").unwrap();
    store.deliver(&key, "sender@example.com", "hello", "body");

    let view = coordinator.show_inbox("user@example.com").await.unwrap();
    assert_eq!(view.summaries.len(), 1);
    assert_eq!(view.summaries[0].from, "sender@example.com");
    assert_eq!(view.cache.header_value(), "private, no-store");
}

#[tokio::test]
async fn test_message_view_carries_max_age() {
    let (store, _hub, coordinator) = setup();
    let key = normalize("user@example.com").unwrap();
    let delivered = store.deliver(&key, "sender@example.com", "hello", "the body");

    let view = coordinator
        .show_message("user@example.com", &delivered.id.to_string())
        .await
        .unwrap();
    assert_eq!(view.mail.body, "the body");
    assert_eq!(view.cache.header_value(), "private, max-age=600");
}

#[tokio::test]
async fn test_missing_message_is_email_not_found() {
    let (store, _hub, coordinator) = setup();
    let key = normalize("user@example.com").unwrap();
    store.deliver(&key, "sender@example.com", "hello", "body");

    let err = coordinator
        .show_message("user@example.com", "999")
        .await
        .unwrap_err();
    assert!(matches!(err, WebError::NotFound));
    assert_eq!(err.class(), ErrorClass::Client);
    assert_eq!(err.public_message(), "email not found");
}

#[tokio::test]
async fn test_live_viewer_sees_one_event_per_arrival() {
    let (store, _hub, coordinator) = setup();
    let conn = coordinator.connection_id();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let subscription = coordinator
        .register_viewer("user@example.com", conn, tx.clone())
        .unwrap();
    // Re-registering the same connection must not duplicate deliveries.
    let _dup = coordinator
        .register_viewer("user@example.com", conn, tx)
        .unwrap();

    let key = normalize("user@example.com").unwrap();
    let mut arrivals = store.arrivals();

    let delivered = store.deliver(&key, "sender@example.com", "ping", "body");
    let event = arrivals.recv().await.unwrap();
    coordinator.handle_arrival(event);

    assert_eq!(rx.try_recv().unwrap().id, delivered.id);
    assert!(rx.try_recv().is_err());

    coordinator.drop_viewer(&subscription);
    store.deliver(&key, "sender@example.com", "again", "body");
    let event = arrivals.recv().await.unwrap();
    coordinator.handle_arrival(event);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_hostile_segment_is_sanitized_before_lookup() {
    let (store, _hub, coordinator) = setup();
    let key = normalize("....etcpasswd@x").unwrap();
    store.deliver(&key, "sender@example.com", "trap", "body");

    let view = coordinator.show_inbox("/../../etc/passwd@x").await.unwrap();
    assert_eq!(view.address.as_str(), "....etcpasswd@x");
    assert_eq!(view.summaries.len(), 1);
}

struct DownStore;

#[async_trait]
impl MailboxStore for DownStore {
    async fn list_summaries(
        &self,
        _key: &MailboxKey,
    ) -> Result<Vec<MailSummary>, StoreUnavailable> {
        Err(StoreUnavailable("imap socket closed".to_string()))
    }

    async fn get_one(
        &self,
        _key: &MailboxKey,
        _id: MessageId,
    ) -> Result<Option<MailMessage>, StoreUnavailable> {
        Err(StoreUnavailable("imap socket closed".to_string()))
    }
}

#[tokio::test]
async fn test_store_outage_hides_detail_from_the_public_message() {
    let hub = Arc::new(NotificationHub::new());
    let coordinator = InboxCoordinator::new(Arc::new(DownStore), hub);

    let err = coordinator.show_inbox("user@example.com").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Server);
    assert_eq!(err.public_message(), "service temporarily unavailable");
    assert!(!err.public_message().contains("imap socket closed"));
    // The detail survives internally for logging and dev-mode pages.
    assert!(err.to_string().contains("imap socket closed"));
}
