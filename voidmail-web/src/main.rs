use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use voidmail_web::config::Config;
use voidmail_web::coordinator::InboxCoordinator;
use voidmail_web::notify::NotificationHub;
use voidmail_web::store::{ArrivalEvent, HttpStore, MailboxStore, MemoryStore};
use voidmail_web::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = if std::path::Path::new("config.toml").exists() {
        Config::from_file("config.toml")?
    } else {
        Config::default()
    };

    // Initialize logging
    let level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .pretty()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting voidmail-web");
    info!("  HTTP listening on: {}", config.http.listen_addr);
    info!("  Store backend: {}", config.store.backend);
    if config.http.dev_mode {
        info!("  Development mode: error pages include diagnostics");
    }

    let hub = Arc::new(NotificationHub::new());

    let store: Arc<dyn MailboxStore> = match config.store.backend.as_str() {
        "http" => {
            let base_url = config
                .store
                .base_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("store.base_url is required for the http backend"))?;
            info!("  Mailbox store: {}", base_url);
            Arc::new(HttpStore::new(base_url))
        }
        _ => {
            let memory = Arc::new(MemoryStore::new());
            spawn_arrival_forwarder(memory.arrivals(), Arc::clone(&hub));
            memory
        }
    };

    let coordinator = Arc::new(InboxCoordinator::new(store, Arc::clone(&hub)));
    let app = web::router(Arc::new(AppState {
        coordinator,
        dev_mode: config.http.dev_mode,
    }));

    let listener = tokio::net::TcpListener::bind(&config.http.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Bridge the in-process store's arrival signal into the notification hub.
fn spawn_arrival_forwarder(
    mut arrivals: broadcast::Receiver<ArrivalEvent>,
    hub: Arc<NotificationHub>,
) {
    tokio::spawn(async move {
        loop {
            match arrivals.recv().await {
                Ok(event) => hub.publish(&event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Arrival forwarder lagged, {} event(s) dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
