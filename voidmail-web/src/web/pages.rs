//! Page handlers and their templates.

use askama_axum::Template;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::address;
use crate::error::{ErrorClass, WebError};
use crate::store::MailSummary;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template)]
#[template(path = "inbox.html")]
struct InboxTemplate {
    address: String,
    summaries: Vec<SummaryRow>,
}

struct SummaryRow {
    id: u64,
    from: String,
    subject: String,
    received_at: String,
    is_read: bool,
}

#[derive(Template)]
#[template(path = "mail.html")]
struct MailTemplate {
    address: String,
    subject: String,
    from: String,
    received_at: String,
    body: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
    detail: String,
}

#[derive(Deserialize)]
pub struct OpenMailboxForm {
    pub address: String,
}

// Landing page (GET)
pub async fn index() -> impl IntoResponse {
    IndexTemplate
}

// Open-a-mailbox form submission (POST)
pub async fn open_mailbox(
    State(state): State<Arc<AppState>>,
    Form(form): Form<OpenMailboxForm>,
) -> Response {
    match address::normalize(&form.address) {
        Ok(key) => Redirect::to(&format!("/{}", key)).into_response(),
        Err(err) => error_page(&state, err),
    }
}

// Inbox listing page
pub async fn inbox(State(state): State<Arc<AppState>>, Path(address): Path<String>) -> Response {
    match state.coordinator.show_inbox(&address).await {
        Ok(view) => {
            let summaries = view.summaries.iter().map(summary_row).collect();
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, view.cache.header_value())],
                InboxTemplate {
                    address: view.address.to_string(),
                    summaries,
                },
            )
                .into_response()
        }
        Err(err) => error_page(&state, err),
    }
}

// Single message page
pub async fn message(
    State(state): State<Arc<AppState>>,
    Path((address, id)): Path<(String, String)>,
) -> Response {
    match state.coordinator.show_message(&address, &id).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, view.cache.header_value())],
            MailTemplate {
                address: view.address.to_string(),
                received_at: format_received(view.mail.received_at),
                subject: view.mail.subject,
                from: view.mail.from,
                body: view.mail.body,
            },
        )
            .into_response(),
        Err(err) => error_page(&state, err),
    }
}

// Unmatched routes
pub async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    error_page(&state, WebError::RouteNotFound)
}

fn summary_row(mail: &MailSummary) -> SummaryRow {
    SummaryRow {
        id: mail.id,
        from: mail.from.clone(),
        subject: mail.subject.clone(),
        received_at: format_received(mail.received_at),
        is_read: mail.is_read,
    }
}

fn format_received(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Render the classified error page. Diagnostic detail only leaves the
/// process in dev mode.
pub(crate) fn error_page(state: &AppState, err: WebError) -> Response {
    let status = match err.class() {
        ErrorClass::Client => StatusCode::NOT_FOUND,
        ErrorClass::Server => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let detail = if state.dev_mode {
        err.to_string()
    } else {
        String::new()
    };

    (
        status,
        ErrorTemplate {
            message: err.public_message().to_string(),
            detail,
        },
    )
        .into_response()
}
