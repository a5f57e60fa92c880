//! Typed protocol identifiers for internet-password items.
//!
//! Keychain Services keys internet-password items by a `SecProtocolType`,
//! a FourCC code such as `'http'` or `'htps'`. HTTP and HTTPS get named
//! variants; any other code is carried through opaquely so callers can
//! store credentials for protocols this crate does not special-case.

use std::fmt;

/// FourCC code for HTTP (`'http'`).
const CODE_HTTP: u32 = four_char_code(*b"http");

/// FourCC code for HTTPS (`'htps'`).
const CODE_HTTPS: u32 = four_char_code(*b"htps");

/// Compute a FourCC code the way the Security headers spell them out.
const fn four_char_code(code: [u8; 4]) -> u32 {
    u32::from_be_bytes(code)
}

/// Protocol of an internet-password item.
///
/// Maps to the platform's `SecProtocolType` FourCC codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// HTTP (`'http'`).
    #[default]
    Http,
    /// HTTPS (`'htps'`).
    Https,
    /// Any other `SecProtocolType` code, passed through unchanged.
    Other(u32),
}

impl Protocol {
    /// The raw `SecProtocolType` FourCC code for this protocol.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Http => CODE_HTTP,
            Self::Https => CODE_HTTPS,
            Self::Other(code) => code,
        }
    }

    /// Build a protocol from a raw `SecProtocolType` code.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            CODE_HTTP => Self::Http,
            CODE_HTTPS => Self::Https,
            other => Self::Other(other),
        }
    }

    /// The four-character attribute string stored with the item
    /// (`kSecAttrProtocol` value), e.g. `"htps"` for HTTPS.
    #[must_use]
    pub fn attribute_string(self) -> String {
        let bytes = self.code().to_be_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Parse a stored `kSecAttrProtocol` attribute string.
    ///
    /// Returns `None` for strings that are not exactly four bytes.
    #[must_use]
    pub fn from_attribute(attribute: &str) -> Option<Self> {
        let bytes: [u8; 4] = attribute.as_bytes().try_into().ok()?;
        Some(Self::from_code(four_char_code(bytes)))
    }

    /// The URL scheme prefix used when reconstructing display URLs.
    ///
    /// HTTPS items render as `https://`; everything else, including
    /// unrecognized protocol codes, renders as `http://`.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Https => "https://",
            Self::Http | Self::Other(_) => "http://",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "HTTP"),
            Self::Https => write!(f, "HTTPS"),
            Self::Other(code) => write!(f, "protocol {code:#010x}"),
        }
    }
}
