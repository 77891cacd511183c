use crate::error::{Result, WebError};
use serde::Serialize;
use std::fmt;

/// Canonical, sanitized mailbox address used as a lookup key.
///
/// Only constructed through [`normalize`], so a value of this type is
/// lower-case, drawn from `[a-z0-9_.+@-]` and shaped like `local@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MailboxKey(String);

impl MailboxKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MailboxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '@' | '-')
}

/// Sanitize a raw path segment into a mailbox key.
///
/// Strips every character outside the allowed set and lower-cases the rest
/// before validating. Runs on every inbound segment, so hostile input never
/// reaches the store as a lookup key or gets echoed into a page unfiltered.
pub fn normalize(raw: &str) -> Result<MailboxKey> {
    let cleaned: String = raw
        .chars()
        .filter(|c| is_allowed(*c))
        .collect::<String>()
        .to_lowercase();

    let valid = match cleaned.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(WebError::InvalidAddress);
    }
    Ok(MailboxKey(cleaned))
}
