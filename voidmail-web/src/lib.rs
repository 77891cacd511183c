//! voidmail-web: disposable-email web front end
//!
//! Visitors open a mailbox by address and read what was delivered to it.
//! No accounts: an inbox is readable by anyone who knows its address, and
//! an unused address is indistinguishable from an empty one.
//!
//! # Features
//!
//! - **Sanitized lookups**: every inbound address segment is normalized
//!   before it touches the mailbox store or a rendered page
//! - **Cache policy by result kind**: immutable message views are cached,
//!   the volatile inbox listing never is
//! - **Live updates**: viewers with an open inbox get new-mail pushes over
//!   a websocket
//! - **Narrow store interface**: the mail system of record stays external,
//!   behind two read operations and an arrival signal
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use voidmail_web::coordinator::InboxCoordinator;
//! use voidmail_web::notify::NotificationHub;
//! use voidmail_web::store::MemoryStore;
//! use voidmail_web::web::{self, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let hub = Arc::new(NotificationHub::new());
//!     let coordinator = Arc::new(InboxCoordinator::new(store, hub));
//!     let app = web::router(Arc::new(AppState { coordinator, dev_mode: true }));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`address`]: path-segment sanitization into mailbox keys
//! - [`cache`]: cache directives per result kind
//! - [`config`]: configuration management
//! - [`coordinator`]: request orchestration and the error contract
//! - [`error`]: error types and classification
//! - [`notify`]: per-mailbox fan-out of new-mail arrivals
//! - [`store`]: mailbox store read interface and clients
//! - [`web`]: routes, pages and the live-update channel

pub mod address;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod notify;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, WebError};
