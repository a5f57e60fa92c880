//! Username/secret pairs.
//!
//! A [`Credential`] is produced by `get` and consumed by `add`. The secret
//! is ordinary owned data at the Rust layer; the `Debug` impl redacts it so
//! credentials can appear in logs without leaking.

use std::fmt;

/// A username/secret pair stored with an internet-password item.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    secret: String,
}

impl Credential {
    /// Create a credential.
    #[must_use]
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// The username (stored as the item's account attribute).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The secret (stored as the item's password content).
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}
