//! Server key for internet-password records.
//!
//! A [`Server`] identifies one credential record in the keychain by the
//! host, path, port, and protocol quadruple. It is read-only input to every
//! operation; the crate never mutates or retains it.

use crate::error::{Error, Result};
use crate::protocol::Protocol;
use std::fmt;

/// Identifies an internet-password record by host, path, port, and protocol.
///
/// # Example
///
/// ```
/// use llavero::{Protocol, Server};
///
/// let server = Server::new("registry.example.com", Protocol::Https)
///     .with_path("/v2/")
///     .with_port(5000);
/// assert_eq!(server.url(), "https://registry.example.com/v2/:5000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Server {
    host: String,
    path: String,
    port: u16,
    protocol: Protocol,
}

impl Server {
    /// Create a server key with an empty path and no port.
    #[must_use]
    pub fn new(host: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            path: String::new(),
            port: 0,
            protocol,
        }
    }

    /// Set the path component.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the port. Zero means "no port", matching the keychain's own
    /// treatment of the port attribute.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The host component.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The path component (may be empty).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The port (zero means unset).
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// The protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Reconstruct the display URL: `{scheme}{host}{path}[:port]`.
    ///
    /// The port suffix is appended only when the port is nonzero. This is
    /// the same shape `list` uses for stored items.
    #[must_use]
    pub fn url(&self) -> String {
        let mut url = String::from(self.protocol.scheme());
        url.push_str(&self.host);
        url.push_str(&self.path);
        if self.port != 0 {
            url.push(':');
            url.push_str(&self.port.to_string());
        }
        url
    }

    /// Validate the key before handing it to the platform.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the host is empty.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::invalid_input("host cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_fields() {
        let server = Server::new("example.com", Protocol::Https)
            .with_path("/v2/")
            .with_port(8443);

        assert_eq!(server.host(), "example.com");
        assert_eq!(server.path(), "/v2/");
        assert_eq!(server.port(), 8443);
        assert_eq!(server.protocol(), Protocol::Https);
    }

    #[test]
    fn test_defaults() {
        let server = Server::new("example.com", Protocol::Http);
        assert_eq!(server.path(), "");
        assert_eq!(server.port(), 0);
    }

    #[test]
    fn test_url_without_port() {
        let server = Server::new("example.com", Protocol::Https).with_path("/v2/");
        assert_eq!(server.url(), "https://example.com/v2/");
    }

    #[test]
    fn test_url_with_port() {
        let server = Server::new("example.com", Protocol::Http).with_port(8080);
        assert_eq!(server.url(), "http://example.com:8080");
    }

    #[test]
    fn test_url_unknown_protocol_uses_http_scheme() {
        let server = Server::new("example.com", Protocol::Other(0x6674_7020));
        assert_eq!(server.url(), "http://example.com");
    }

    #[test]
    fn test_display_matches_url() {
        let server = Server::new("example.com", Protocol::Https).with_port(443);
        assert_eq!(server.to_string(), server.url());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let server = Server::new("", Protocol::Http);
        let err = server.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_validate_accepts_normal_host() {
        let server = Server::new("example.com", Protocol::Http);
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_clone_and_eq() {
        let server = Server::new("example.com", Protocol::Https).with_path("/a");
        let cloned = server.clone();
        assert_eq!(server, cloned);
    }
}
