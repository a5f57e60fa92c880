//! Keychain bridge: add, get, delete, and list internet-password items.
//!
//! Every operation is a single stateless, synchronous round-trip to the OS
//! keychain daemon. There is no internal locking (the daemon serializes
//! access to the system keychain), no retry, and no cancellation; the caller
//! inherits whatever blocking behavior the platform exhibits.
//!
//! # Example
//!
//! ```no_run
//! use llavero::{Credential, Keychain, Protocol, Server};
//!
//! # fn main() -> Result<(), llavero::Error> {
//! let keychain = Keychain::new().ok_or(llavero::Error::NotAvailable)?;
//! let server = Server::new("registry.example.com", Protocol::Https).with_path("/v2/");
//!
//! keychain.add(&server, "My Registry", &Credential::new("alice", "s3cret"))?;
//! let credential = keychain.get(&server)?;
//! assert_eq!(credential.username(), "alice");
//! keychain.delete(&server)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Partial-failure behavior
//!
//! `add` is two platform calls: insert the item, then set its label. When
//! the label update fails the bridge deletes the just-inserted item before
//! returning the error, so a failed `add` leaves no orphan record behind.

use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::ffi::security;
use crate::listing::ListEntry;
use crate::server::Server;
use tracing::{debug, instrument, warn};

/// Handle to the default OS keychain.
///
/// The handle carries no state of its own; the single system-wide secure
/// store is ambient. It exists so availability is checked once and so the
/// non-thread-safe platform calls are tied to one thread.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync` because Security.framework keychain
/// calls are not thread-safe. Create a handle on each thread that needs one.
///
/// # Graceful Degradation
///
/// On non-macOS platforms [`Keychain::new`] returns `None` rather than
/// panicking, allowing applications to fall back to other credential stores.
pub struct Keychain {
    _not_send_sync: std::marker::PhantomData<*const ()>,
}

impl Keychain {
    /// Open a handle to the default keychain.
    ///
    /// # Returns
    ///
    /// - `Some(Keychain)` on macOS
    /// - `None` elsewhere (graceful degradation)
    #[must_use]
    pub fn new() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self {
                _not_send_sync: std::marker::PhantomData,
            })
        } else {
            None
        }
    }

    /// Check if the OS keychain is available on this system.
    #[must_use]
    pub fn is_available() -> bool {
        cfg!(target_os = "macos")
    }

    /// Store a credential for the server key and label the created item.
    ///
    /// If the label update fails after the insert succeeded, the inserted
    /// item is rolled back (best-effort delete) before the error returns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty host or label, or the rendered
    /// `Security` error from the platform (including `errSecDuplicateItem`
    /// when a record for this key already exists).
    #[instrument(level = "debug", skip(self, credential))]
    pub fn add(&self, server: &Server, label: &str, credential: &Credential) -> Result<()> {
        server.validate()?;
        if label.is_empty() {
            return Err(Error::invalid_input("label cannot be empty"));
        }

        let item =
            security::add_internet_password(server, credential.username(), credential.secret())?;

        if let Err(err) = item.set_label(label) {
            // Roll back the half-created item so a failed add leaves no
            // orphan record in the keychain.
            if let Err(cleanup) = security::delete_item(&item) {
                warn!(error = %cleanup, "rollback of inserted item failed");
            }
            return Err(err);
        }

        debug!(server = %server, "credential stored");
        Ok(())
    }

    /// Fetch the credential stored for the server key.
    ///
    /// # Errors
    ///
    /// Returns the rendered `Security` error if no matching item exists
    /// (`errSecItemNotFound`) or the platform call fails.
    #[instrument(level = "debug", skip(self))]
    pub fn get(&self, server: &Server) -> Result<Credential> {
        server.validate()?;

        let (secret, item) = security::find_internet_password(server)?;
        let username = item.account()?;

        debug!(server = %server, "credential fetched");
        Ok(Credential::new(username, secret))
    }

    /// Delete the item stored for the server key.
    ///
    /// # Errors
    ///
    /// Returns the rendered `Security` error if lookup or deletion fails
    /// (including `errSecItemNotFound`).
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, server: &Server) -> Result<()> {
        server.validate()?;

        let item = security::find_internet_password_item(server)?;
        security::delete_item(&item)?;

        debug!(server = %server, "credential deleted");
        Ok(())
    }

    /// Enumerate all internet-password items carrying the given label.
    ///
    /// Each entry pairs a reconstructed display URL with the stored account;
    /// see [`crate::listing`] for the exact reconstruction rules.
    ///
    /// # Errors
    ///
    /// Returns the rendered `Security` error if the query fails (including
    /// `errSecItemNotFound` when nothing matches the label).
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self, label: &str) -> Result<Vec<ListEntry>> {
        let attributes = security::copy_matching_internet_passwords(label)?;
        let entries: Vec<ListEntry> = attributes.iter().map(ListEntry::from_attributes).collect();

        debug!(label, count = entries.len(), "credentials listed");
        Ok(entries)
    }
}

impl std::fmt::Debug for Keychain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keychain").finish_non_exhaustive()
    }
}

/// Check if the OS keychain is available.
///
/// Convenience function equivalent to [`Keychain::is_available`].
#[must_use]
pub fn is_available() -> bool {
    Keychain::is_available()
}
