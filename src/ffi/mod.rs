//! FFI Quarantine Zone - All unsafe code isolated here.
//!
//! # Safety Architecture
//!
//! This module contains ALL unsafe platform bindings in the llavero crate.
//! The public API in `src/lib.rs` uses `#![deny(unsafe_code)]`, ensuring no
//! unsafe code can leak into the user-facing interface.
//!
//! ## Safety Rules
//!
//! - Every `unsafe` block has a `// SAFETY:` comment
//! - No raw pointers escape the FFI module
//! - C strings and keychain buffers are copied into owned Rust data before
//!   their backing memory is released
//! - Every CF object obtained under the create rule is released exactly once
//!
//! # Module Structure
//!
//! ```text
//! ffi/
//! ├── mod.rs          # This file - module router + non-macOS stubs
//! └── security.rs     # Security.framework bindings (Keychain Services)
//! ```

// Allow unsafe in this module only - quarantine zone
#![allow(unsafe_code)]

#[cfg(target_os = "macos")]
pub mod security;

// Stub module for non-macOS platforms
#[cfg(not(target_os = "macos"))]
pub mod security {
    //! Stub Security.framework module for non-macOS platforms.
    //!
    //! Every operation fails with `Error::NotAvailable`.

    use crate::error::{Error, Result, UNKNOWN_ERROR_MESSAGE};
    use crate::listing::ItemAttributes;
    use crate::server::Server;

    /// Stub keychain item reference.
    pub struct KeychainItem;

    impl KeychainItem {
        /// Stub: returns `NotAvailable` on non-macOS.
        pub fn set_label(&self, _label: &str) -> Result<()> {
            Err(Error::not_available())
        }

        /// Stub: returns `NotAvailable` on non-macOS.
        pub fn account(&self) -> Result<String> {
            Err(Error::not_available())
        }
    }

    /// Stub: returns `NotAvailable` on non-macOS.
    pub fn add_internet_password(
        _server: &Server,
        _username: &str,
        _secret: &str,
    ) -> Result<KeychainItem> {
        Err(Error::not_available())
    }

    /// Stub: returns `NotAvailable` on non-macOS.
    pub fn find_internet_password(_server: &Server) -> Result<(String, KeychainItem)> {
        Err(Error::not_available())
    }

    /// Stub: returns `NotAvailable` on non-macOS.
    pub fn find_internet_password_item(_server: &Server) -> Result<KeychainItem> {
        Err(Error::not_available())
    }

    /// Stub: returns `NotAvailable` on non-macOS.
    pub fn delete_item(_item: &KeychainItem) -> Result<()> {
        Err(Error::not_available())
    }

    /// Stub: returns `NotAvailable` on non-macOS.
    pub fn copy_matching_internet_passwords(_label: &str) -> Result<Vec<ItemAttributes>> {
        Err(Error::not_available())
    }

    /// Stub: there is no platform lookup off-macOS.
    #[must_use]
    pub fn error_message(_status: i32) -> String {
        UNKNOWN_ERROR_MESSAGE.to_string()
    }
}
