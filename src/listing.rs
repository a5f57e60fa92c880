//! Enumeration output and the display-URL reconstruction rules.
//!
//! `list` queries every internet-password item carrying a given label and
//! reconstructs one `(url, account)` pair per item from the attributes the
//! platform returns. The rules are small but precise:
//!
//! - scheme is `https://` iff the stored protocol attribute is `"htps"`,
//!   otherwise `http://`
//! - host and path are appended verbatim when present
//! - a `:port` suffix is appended only when the port attribute is present
//!   and nonzero
//! - items with no protocol attribute produce the literal placeholder pair
//!   `("0", "0")`
//! - a missing account attribute produces `"account not defined"`

use crate::protocol::Protocol;

/// Placeholder used for both fields when an item has no protocol attribute.
pub const MISSING_PROTOCOL_PLACEHOLDER: &str = "0";

/// Account string used when an item has no account attribute.
pub const MISSING_ACCOUNT_PLACEHOLDER: &str = "account not defined";

/// Raw attributes of one matched internet-password item.
///
/// Every field is optional because the platform omits attributes that were
/// never set on the item. The four-character protocol attribute is kept as
/// the string the platform hands back (e.g. `"htps"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemAttributes {
    /// Stored protocol attribute string (`kSecAttrProtocol`).
    pub protocol: Option<String>,
    /// Stored server/host attribute (`kSecAttrServer`).
    pub server: Option<String>,
    /// Stored path attribute (`kSecAttrPath`).
    pub path: Option<String>,
    /// Stored port attribute (`kSecAttrPort`).
    pub port: Option<i64>,
    /// Stored account attribute (`kSecAttrAccount`).
    pub account: Option<String>,
}

/// One entry of a `list` result: a reconstructed display URL plus the
/// account stored with the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Display URL shaped `{scheme}{server}{path}[:port]`.
    pub url: String,
    /// Account attribute, or [`MISSING_ACCOUNT_PLACEHOLDER`].
    pub account: String,
}

impl ListEntry {
    /// Reconstruct a list entry from raw item attributes.
    #[must_use]
    pub fn from_attributes(attributes: &ItemAttributes) -> Self {
        let Some(protocol) = attributes.protocol.as_deref() else {
            return Self {
                url: MISSING_PROTOCOL_PLACEHOLDER.to_string(),
                account: MISSING_PROTOCOL_PLACEHOLDER.to_string(),
            };
        };

        let scheme = Protocol::from_attribute(protocol)
            .unwrap_or_default()
            .scheme();

        let mut url = String::from(scheme);
        if let Some(server) = attributes.server.as_deref() {
            url.push_str(server);
        }
        if let Some(path) = attributes.path.as_deref() {
            url.push_str(path);
        }
        if let Some(port) = attributes.port {
            if port != 0 {
                url.push(':');
                url.push_str(&port.to_string());
            }
        }

        let account = attributes
            .account
            .clone()
            .unwrap_or_else(|| MISSING_ACCOUNT_PLACEHOLDER.to_string());

        Self { url, account }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn https_item() -> ItemAttributes {
        ItemAttributes {
            protocol: Some("htps".to_string()),
            server: Some("registry.example.com".to_string()),
            path: Some("/v2/".to_string()),
            port: Some(5000),
            account: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_full_https_entry() {
        let entry = ListEntry::from_attributes(&https_item());
        assert_eq!(entry.url, "https://registry.example.com/v2/:5000");
        assert_eq!(entry.account, "alice");
    }

    #[test]
    fn test_http_scheme_for_http_protocol() {
        let mut attributes = https_item();
        attributes.protocol = Some("http".to_string());
        let entry = ListEntry::from_attributes(&attributes);
        assert!(entry.url.starts_with("http://"));
        assert!(!entry.url.starts_with("https://"));
    }

    #[test]
    fn test_unknown_protocol_falls_back_to_http() {
        let mut attributes = https_item();
        attributes.protocol = Some("ftp ".to_string());
        let entry = ListEntry::from_attributes(&attributes);
        assert!(entry.url.starts_with("http://"));
    }

    #[test]
    fn test_missing_protocol_yields_placeholder_pair() {
        let mut attributes = https_item();
        attributes.protocol = None;
        let entry = ListEntry::from_attributes(&attributes);
        assert_eq!(entry.url, "0");
        assert_eq!(entry.account, "0");
    }

    #[test]
    fn test_missing_account_yields_placeholder() {
        let mut attributes = https_item();
        attributes.account = None;
        let entry = ListEntry::from_attributes(&attributes);
        assert_eq!(entry.account, "account not defined");
    }

    #[test]
    fn test_zero_port_omitted() {
        let mut attributes = https_item();
        attributes.port = Some(0);
        let entry = ListEntry::from_attributes(&attributes);
        assert_eq!(entry.url, "https://registry.example.com/v2/");
    }

    #[test]
    fn test_absent_port_omitted() {
        let mut attributes = https_item();
        attributes.port = None;
        let entry = ListEntry::from_attributes(&attributes);
        let after_scheme = entry.url.trim_start_matches("https://");
        assert!(!after_scheme.contains(':'), "url: {}", entry.url);
    }

    #[test]
    fn test_missing_server_and_path_leaves_scheme() {
        let attributes = ItemAttributes {
            protocol: Some("htps".to_string()),
            ..ItemAttributes::default()
        };
        let entry = ListEntry::from_attributes(&attributes);
        assert_eq!(entry.url, "https://");
        assert_eq!(entry.account, "account not defined");
    }

    #[test]
    fn test_default_attributes_are_empty() {
        let attributes = ItemAttributes::default();
        assert!(attributes.protocol.is_none());
        assert!(attributes.server.is_none());
        assert!(attributes.path.is_none());
        assert!(attributes.port.is_none());
        assert!(attributes.account.is_none());
    }
}
