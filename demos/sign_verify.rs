//! Sign a message with a WIF key and verify it from the armored text alone.
//!
//! Usage: `cargo run --example sign_verify -- [WIF] [MESSAGE]`

use bitcoin_signed_message::{MessageSigner, PrivateKey, Result, armor};

// Secret key 1, compressed, testnet
const DEFAULT_WIF: &str = "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitcoin_signed_message=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let wif = args.next().unwrap_or_else(|| DEFAULT_WIF.to_string());
    let message = args.next().unwrap_or_else(|| "hello from sign_verify".to_string());

    let (key, network) = PrivateKey::from_wif(&wif)?;
    let address = key.public_key().address(network, key.is_compressed());

    let signer: MessageSigner = MessageSigner::default();
    let signed = signer.sign(message.as_bytes(), &key)?;
    let armored = armor::serialize(&signed);
    println!("{}", String::from_utf8_lossy(&armored));

    let candidate = signer.recover_public_key(&signed)?;
    println!("\nRecovered key: {}", hex::encode(candidate.encode()));
    println!("Address:       {address}");
    println!("Verified:      {}", signer.verify_armored(&armored, &address)?);

    Ok(())
}
