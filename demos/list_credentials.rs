//! Credential Listing Example
//!
//! Stores a few labeled credentials, enumerates them, and cleans up.
//!
//! Run with: cargo run --example `list_credentials`

use llavero::{Credential, Keychain, Protocol, Server};

const LABEL: &str = "Llavero Listing Demo";

fn main() -> Result<(), llavero::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          LLAVERO - Credential Listing Demo                 ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let Some(keychain) = Keychain::new() else {
        println!("❌ OS keychain not available on this system (requires macOS).");
        return Ok(());
    };

    let servers = [
        Server::new("alpha.llavero.invalid", Protocol::Https).with_path("/v2/"),
        Server::new("beta.llavero.invalid", Protocol::Http).with_port(8080),
        Server::new("gamma.llavero.invalid", Protocol::Https),
    ];

    println!("Storing {} credentials labeled \"{LABEL}\"...", servers.len());
    for server in &servers {
        keychain.add(server, LABEL, &Credential::new("demo-user", "demo-secret"))?;
    }
    println!("✓ Stored");
    println!();

    println!("Listing items with that label:");
    for entry in keychain.list(LABEL)? {
        println!("  {} ({})", entry.url, entry.account);
    }
    println!();

    println!("Cleaning up...");
    for server in &servers {
        keychain.delete(server)?;
    }
    println!("✓ Done");

    Ok(())
}
