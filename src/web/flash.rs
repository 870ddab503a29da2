//! One-shot notices carried across a POST → redirect → GET.
//!
//! The POST handler stores the message and redirects to
//! `/clinica/{prefix}/?flash=<token>`; the list page consumes it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

const FLASH_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Error => "flash-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Error, text: text.into() }
    }
}

struct Entry {
    flash: Flash,
    expires_at: Instant,
}

#[derive(Default)]
pub struct FlashStore {
    entries: HashMap<String, Entry>,
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a message; returns the token for the redirect URL.
    pub fn issue(&mut self, flash: Flash) -> String {
        self.cleanup();
        let token = Uuid::new_v4().to_string();
        self.entries.insert(
            token.clone(),
            Entry {
                flash,
                expires_at: Instant::now() + FLASH_TTL,
            },
        );
        token
    }

    /// Consume a message (one-time use).
    pub fn take(&mut self, token: &str) -> Option<Flash> {
        let entry = self.entries.remove(token)?;
        if Instant::now() > entry.expires_at {
            return None;
        }
        Some(entry.flash)
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, e| now < e.expires_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_is_consumed_once() {
        let mut store = FlashStore::new();
        let token = store.issue(Flash::success("Saved"));
        assert_eq!(store.take(&token), Some(Flash::success("Saved")));
        assert_eq!(store.take(&token), None);
    }

    #[test]
    fn unknown_token_yields_nothing() {
        let mut store = FlashStore::new();
        store.issue(Flash::error("Nope"));
        assert_eq!(store.take("not-a-token"), None);
    }

    #[test]
    fn expired_flash_is_dropped() {
        let mut store = FlashStore::new();
        store.entries.insert(
            "old".into(),
            Entry {
                flash: Flash::success("stale"),
                expires_at: Instant::now() - Duration::from_secs(1),
            },
        );
        assert_eq!(store.take("old"), None);
    }
}
