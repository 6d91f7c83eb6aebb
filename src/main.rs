//! Bitcoin Signed Message demo
//!
//! Verifies a known signed message, then signs and verifies a fresh one.
//! The network is taken from the first argument (`main` or `test`).

use bitcoin_signed_message::{Address, MessageSigner, Network, PrivateKey, Result, SignedMessage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const KNOWN: &str = "-----BEGIN BITCOIN SIGNED MESSAGE-----
hi
-----BEGIN SIGNATURE-----
IBpGR29vEbbl4kmpK0fcDsT75GPeH2dg5O199D3iIkS3VcDoQahJMGJEDozXot8JGULWjN9Llq79aF+FogOoz/M=
-----END BITCOIN SIGNED MESSAGE-----";

const KNOWN_ADDRESS: &str = "n2Z2DFCxG6vktyX1MFkKAQPQFsrmniGKj5";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitcoin_signed_message=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let network = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Network>()?,
        None => Network::Test,
    };
    tracing::info!(%network, "Bitcoin Signed Message demo");

    let signer: MessageSigner = MessageSigner::default();

    let known_address: Address = KNOWN_ADDRESS.parse()?;
    let valid = signer.verify_armored(KNOWN.as_bytes(), &known_address)?;
    println!("Known message verifies against {known_address}: {valid}");

    let key = PrivateKey::generate(true);
    let address = key.public_key().address(network, key.is_compressed());
    println!("\nFresh {network} key");
    println!("  WIF:     {}", key.to_wif(network));
    println!("  Address: {address}");

    let signed = signer.sign(b"Hello, Bitcoin!", &key)?;
    println!("\n{signed}");

    let parsed: SignedMessage = signed.to_string().parse()?;
    println!("\nVerifies: {}", signer.verify(&parsed, &address));

    Ok(())
}
