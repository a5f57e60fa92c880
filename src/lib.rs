//! Llavero: Safe Rust Interfaces to the macOS Keychain
//!
//! Llavero stores, fetches, deletes, and enumerates internet-password
//! credentials in the OS keychain, keyed by host, path, port, and protocol.
//! It is a thin bridge: all credential storage, encryption, and access
//! control live inside the operating system's Keychain implementation.
//!
//! # Design Philosophy
//!
//! - **Zero unsafe in public API**: All FFI quarantined in internal modules
//! - **Direct platform calls**: Each operation is one stateless round-trip
//!   to the keychain daemon; no retries, no caching, no eviction
//! - **Explicit ownership at the C boundary**: Every buffer handed to C
//!   callers transfers ownership and has a companion free function
//!
//! # Quick Start
//!
//! ```no_run
//! use llavero::{Credential, Keychain, Protocol, Server};
//!
//! # fn main() -> Result<(), llavero::Error> {
//! if let Some(keychain) = Keychain::new() {
//!     let server = Server::new("registry.example.com", Protocol::Https)
//!         .with_path("/v2/");
//!     keychain.add(&server, "My Registry", &Credential::new("alice", "s3cret"))?;
//!
//!     let credential = keychain.get(&server)?;
//!     println!("stored user: {}", credential.username());
//!
//!     for entry in keychain.list("My Registry")? {
//!         println!("{} ({})", entry.url, entry.account);
//!     }
//!
//!     keychain.delete(&server)?;
//! } else {
//!     println!("Keychain not available on this system");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # C Boundary
//!
//! The crate also builds as `staticlib`/`cdylib` and exports a C calling
//! convention for credential-helper programs (see [`capi`]): `keychain_add`,
//! `keychain_get`, `keychain_delete`, `keychain_list`, plus the
//! `keychain_list_free` / `keychain_string_free` release functions.
//!
//! # Error Handling
//!
//! All operations that can fail return [`Result<T, Error>`]. Platform
//! failures carry the OSStatus code and the message Security.framework
//! renders for it; [`Error::is_not_found`] distinguishes the missing-item
//! status programmatically.
//!
//! # Thread Safety
//!
//! [`Keychain`] is `!Send` and `!Sync` because the underlying
//! Security.framework calls are not thread-safe. Create a handle on each
//! thread that needs one; the keychain daemon serializes access to the
//! shared store itself.
//!
//! # Graceful Degradation
//!
//! On non-macOS platforms [`Keychain::new`] returns `None` rather than
//! panicking, allowing applications to fall back to other credential
//! stores.

// SAFETY: This crate denies unsafe code at the library level.
// All unsafe FFI code is quarantined in src/ffi/ and src/capi.rs.
// We use deny (not forbid) so it can be overridden in those modules.
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // Allow OSStatus, CoreFoundation, etc. without backticks

pub mod capi;
pub mod credential;
pub mod error;
pub mod keychain;
pub mod listing;
pub mod protocol;
pub mod server;

// FFI module is internal only - not exported
mod ffi;

// Re-export main types for convenience
pub use credential::Credential;
pub use error::{Error, Result};
pub use keychain::Keychain;
pub use listing::{ItemAttributes, ListEntry};
pub use protocol::Protocol;
pub use server::Server;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if we're running on macOS.
#[must_use]
pub const fn is_macos() -> bool {
    cfg!(target_os = "macos")
}

/// Check if the OS keychain is available.
///
/// Convenience function equivalent to [`Keychain::is_available`].
#[must_use]
pub fn is_available() -> bool {
    Keychain::is_available()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_is_macos_consistent() {
        assert_eq!(is_macos(), cfg!(target_os = "macos"));
    }

    #[test]
    fn test_is_available_matches_platform() {
        assert_eq!(is_available(), is_macos());
    }

    #[test]
    fn test_error_reexport() {
        let err = Error::not_available();
        assert!(err.is_not_available());
    }

    #[test]
    fn test_server_reexport() {
        let server = Server::new("example.com", Protocol::Https);
        assert_eq!(server.url(), "https://example.com");
    }

    #[test]
    fn test_listing_reexport() {
        let entry = ListEntry::from_attributes(&ItemAttributes::default());
        assert_eq!(entry.url, "0");
        assert_eq!(entry.account, "0");
    }
}
