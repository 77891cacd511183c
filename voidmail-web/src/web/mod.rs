//! HTTP surface: page routes, the live-update channel and the arrival
//! webhook.

pub mod live;
pub mod pages;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::address;
use crate::coordinator::InboxCoordinator;
use crate::store::{ArrivalEvent, MessageId};

/// Shared application state, injected into every handler.
pub struct AppState {
    pub coordinator: Arc<InboxCoordinator>,
    pub dev_mode: bool,
}

/// Build the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index).post(pages::open_mailbox))
        .route("/ws/:address", get(live::ws_handler))
        .route("/internal/arrivals", post(arrival_webhook))
        .route("/:address", get(pages::inbox))
        .route("/:address/:id", get(pages::message))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Arrival notice posted by a remote store's delivery pipeline.
#[derive(Debug, Deserialize)]
struct ArrivalNotice {
    address: String,
    id: MessageId,
}

async fn arrival_webhook(
    State(state): State<Arc<AppState>>,
    Json(notice): Json<ArrivalNotice>,
) -> Response {
    match address::normalize(&notice.address) {
        Ok(mailbox) => {
            debug!("Arrival notice for {} (message {})", mailbox, notice.id);
            state.coordinator.handle_arrival(ArrivalEvent {
                mailbox,
                id: notice.id,
            });
            StatusCode::NO_CONTENT.into_response()
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid address" })),
        )
            .into_response(),
    }
}
