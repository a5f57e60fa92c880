//! Credential Round-Trip Example
//!
//! Stores, fetches, and deletes one internet-password credential.
//!
//! Run with: cargo run --example `store_credential`

use llavero::{Credential, Keychain, Protocol, Server};

fn main() -> Result<(), llavero::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          LLAVERO - Credential Round-Trip Demo              ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let Some(keychain) = Keychain::new() else {
        println!("❌ OS keychain not available on this system (requires macOS).");
        return Ok(());
    };

    println!("✓ Keychain available");
    println!();

    let server = Server::new("demo.llavero.invalid", Protocol::Https).with_path("/v2/");
    let credential = Credential::new("demo-user", "demo-secret");

    println!("Storing credential for {server}...");
    keychain.add(&server, "Llavero Demo", &credential)?;
    println!("✓ Stored");
    println!();

    println!("Fetching it back...");
    let fetched = keychain.get(&server)?;
    println!("✓ Fetched: username = {}", fetched.username());
    println!(
        "{} Secret round-trips: {}",
        if fetched.secret() == credential.secret() { "✓" } else { "❌" },
        fetched.secret() == credential.secret()
    );
    println!();

    println!("Deleting...");
    keychain.delete(&server)?;
    println!("✓ Deleted");
    println!();

    println!("Fetching after delete (expected to fail)...");
    match keychain.get(&server) {
        Err(err) if err.is_not_found() => println!("✓ Not found, as expected"),
        Err(err) => println!("❌ Unexpected error: {err}"),
        Ok(_) => println!("❌ Item still present"),
    }
    println!();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║                    Demo Complete                           ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    Ok(())
}
