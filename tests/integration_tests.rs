//! Integration tests for Llavero.
//!
//! These tests verify the public API works correctly as a cohesive unit.
//! Tests that touch the real OS keychain are `#[ignore]`d because they
//! require an unlocked keychain and may prompt for authorization; run them
//! explicitly on a development Mac with `cargo test -- --ignored`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use llavero::{
    is_available, is_macos, Credential, Error, ItemAttributes, Keychain, ListEntry, Protocol,
    Server, VERSION,
};

// =============================================================================
// Library-level tests
// =============================================================================

#[test]
fn test_version_semver_format() {
    // Version should be in semver format (x.y.z)
    let parts: Vec<&str> = VERSION.split('.').collect();
    assert!(parts.len() >= 2, "Version should have at least major.minor");
    for part in &parts {
        assert!(
            part.parse::<u32>().is_ok(),
            "Version parts should be numeric"
        );
    }
}

#[test]
fn test_is_macos_platform_detection() {
    let result = is_macos();
    #[cfg(target_os = "macos")]
    assert!(result, "Should detect macOS on macOS");
    #[cfg(not(target_os = "macos"))]
    assert!(!result, "Should not detect macOS on other platforms");
}

#[test]
fn test_keychain_new_graceful() {
    // Should never panic, regardless of platform
    let keychain = Keychain::new();
    assert_eq!(keychain.is_some(), is_available());
}

// =============================================================================
// Server key tests
// =============================================================================

#[test]
fn test_server_key_shapes_url() {
    let server = Server::new("index.example.io", Protocol::Https)
        .with_path("/v1/")
        .with_port(443);
    assert_eq!(server.url(), "https://index.example.io/v1/:443");

    let bare = Server::new("index.example.io", Protocol::Http);
    assert_eq!(bare.url(), "http://index.example.io");
}

#[test]
fn test_server_validation() {
    assert!(Server::new("example.com", Protocol::Http).validate().is_ok());
    assert!(Server::new("", Protocol::Http).validate().is_err());
}

#[test]
fn test_protocol_codes_round_trip() {
    for protocol in [
        Protocol::Http,
        Protocol::Https,
        Protocol::Other(u32::from_be_bytes(*b"ftp ")),
    ] {
        assert_eq!(Protocol::from_code(protocol.code()), protocol);
    }
}

// =============================================================================
// Listing reconstruction tests
// =============================================================================

#[test]
fn test_list_entry_full_reconstruction() {
    let attributes = ItemAttributes {
        protocol: Some("htps".to_string()),
        server: Some("registry.example.com".to_string()),
        path: Some("/v2/".to_string()),
        port: Some(5000),
        account: Some("alice".to_string()),
    };
    let entry = ListEntry::from_attributes(&attributes);
    assert_eq!(entry.url, "https://registry.example.com/v2/:5000");
    assert_eq!(entry.account, "alice");
}

#[test]
fn test_list_entry_placeholders() {
    let no_protocol = ItemAttributes {
        server: Some("registry.example.com".to_string()),
        account: Some("alice".to_string()),
        ..ItemAttributes::default()
    };
    let entry = ListEntry::from_attributes(&no_protocol);
    assert_eq!((entry.url.as_str(), entry.account.as_str()), ("0", "0"));

    let no_account = ItemAttributes {
        protocol: Some("http".to_string()),
        server: Some("registry.example.com".to_string()),
        ..ItemAttributes::default()
    };
    let entry = ListEntry::from_attributes(&no_account);
    assert_eq!(entry.account, "account not defined");
}

// =============================================================================
// Credential tests
// =============================================================================

#[test]
fn test_credential_debug_never_reveals_secret() {
    let credential = Credential::new("alice", "hunter2-very-secret");
    let debug = format!("{credential:?}");
    assert!(!debug.contains("hunter2-very-secret"));
}

// =============================================================================
// Error surface tests
// =============================================================================

#[test]
fn test_not_found_predicate() {
    let err = Error::security(llavero::error::ERR_SEC_ITEM_NOT_FOUND, "missing");
    assert!(err.is_not_found());
    assert_eq!(err.error_code(), Some(-25300));
}

#[test]
#[cfg(not(target_os = "macos"))]
fn test_stub_operations_report_unavailable() {
    assert!(Keychain::new().is_none());
    assert!(!is_available());
}

// =============================================================================
// Real keychain round-trips (macOS only, require an unlocked keychain)
// =============================================================================

#[cfg(target_os = "macos")]
mod keychain_round_trips {
    use super::*;

    const TEST_LABEL: &str = "llavero-integration-test";

    fn test_server(host: &str) -> Server {
        Server::new(host, Protocol::Https).with_path("/v2/")
    }

    #[test]
    #[ignore] // Requires an unlocked keychain
    fn test_add_then_get_round_trips() {
        let keychain = Keychain::new().unwrap();
        let server = test_server("llavero-test-roundtrip.invalid");
        let credential = Credential::new("alice", "s3cret");

        keychain.add(&server, TEST_LABEL, &credential).unwrap();
        let fetched = keychain.get(&server).unwrap();
        assert_eq!(fetched.username(), "alice");
        assert_eq!(fetched.secret(), "s3cret");

        keychain.delete(&server).unwrap();
    }

    #[test]
    #[ignore] // Requires an unlocked keychain
    fn test_delete_then_get_is_not_found() {
        let keychain = Keychain::new().unwrap();
        let server = test_server("llavero-test-delete.invalid");
        let credential = Credential::new("bob", "pw");

        keychain.add(&server, TEST_LABEL, &credential).unwrap();
        keychain.delete(&server).unwrap();

        let err = keychain.get(&server).unwrap_err();
        assert!(err.is_not_found(), "expected not-found, got: {err}");
    }

    #[test]
    #[ignore] // Requires an unlocked keychain
    fn test_duplicate_add_is_duplicate_error() {
        let keychain = Keychain::new().unwrap();
        let server = test_server("llavero-test-duplicate.invalid");
        let credential = Credential::new("carol", "pw");

        keychain.add(&server, TEST_LABEL, &credential).unwrap();
        let err = keychain.add(&server, TEST_LABEL, &credential).unwrap_err();
        assert!(err.is_duplicate(), "expected duplicate, got: {err}");

        keychain.delete(&server).unwrap();
    }

    #[test]
    #[ignore] // Requires an unlocked keychain
    fn test_list_returns_one_entry_per_item() {
        let keychain = Keychain::new().unwrap();
        let hosts = [
            "llavero-test-list-a.invalid",
            "llavero-test-list-b.invalid",
            "llavero-test-list-c.invalid",
        ];

        for host in hosts {
            keychain
                .add(&test_server(host), TEST_LABEL, &Credential::new("dave", "pw"))
                .unwrap();
        }

        let entries = keychain.list(TEST_LABEL).unwrap();
        assert_eq!(entries.len(), hosts.len());
        for entry in &entries {
            assert!(
                entry.url.starts_with("https://llavero-test-list-"),
                "unexpected url: {}",
                entry.url
            );
            assert_eq!(entry.account, "dave");
        }

        for host in hosts {
            keychain.delete(&test_server(host)).unwrap();
        }
    }
}
