use thiserror::Error;

/// Classes the HTTP layer maps onto response statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input or expected absence; answered as "not found".
    Client,
    /// Infrastructure failure; answered as "temporarily unavailable".
    Server,
}

#[derive(Error, Debug)]
pub enum WebError {
    #[error("invalid mailbox address")]
    InvalidAddress,

    #[error("invalid message id")]
    InvalidId,

    #[error("email not found")]
    NotFound,

    #[error("page not found")]
    RouteNotFound,

    #[error("mailbox store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl WebError {
    pub fn class(&self) -> ErrorClass {
        match self {
            WebError::InvalidAddress
            | WebError::InvalidId
            | WebError::NotFound
            | WebError::RouteNotFound => ErrorClass::Client,
            WebError::StoreUnavailable(_) | WebError::Config(_) => ErrorClass::Server,
        }
    }

    /// Message safe to render in any deployment mode. Store detail stays in
    /// the variant and only reaches logs and dev-mode pages.
    pub fn public_message(&self) -> &'static str {
        match self {
            WebError::NotFound => "email not found",
            WebError::InvalidAddress | WebError::InvalidId | WebError::RouteNotFound => {
                "page not found"
            }
            WebError::StoreUnavailable(_) | WebError::Config(_) => {
                "service temporarily unavailable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
