//! Secret/public keys and P2PKH addresses.
//!
//! These are the collaborators message signing needs around the core:
//! SEC public key encoding, Base58Check addresses and WIF private keys.

use crate::curves::{CurveMath, Point};
use crate::error::KeyError;
use crate::hash::hash160;
use crate::secp256k1::SECP256K1;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

/// Bitcoin network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Main,
    Test,
}

impl Network {
    /// Get version byte for P2PKH addresses
    #[inline]
    pub const fn version_byte(self) -> u8 {
        match self {
            Network::Main => 0x00,
            Network::Test => 0x6f,
        }
    }

    /// Get version byte for WIF private keys
    #[inline]
    pub const fn wif_byte(self) -> u8 {
        match self {
            Network::Main => 0x80,
            Network::Test => 0xef,
        }
    }

    /// Get network name
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
        }
    }

    pub const fn from_version_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Network::Main),
            0x6f => Some(Network::Test),
            _ => None,
        }
    }

    pub const fn from_wif_byte(byte: u8) -> Option<Self> {
        match byte {
            0x80 => Some(Network::Main),
            0xef => Some(Network::Test),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Network {
    type Error = KeyError;

    fn try_from(s: &str) -> Result<Self, KeyError> {
        match s {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            _ => Err(KeyError::InvalidFormat(format!("Unknown network: {s}"))),
        }
    }
}

impl FromStr for Network {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        Network::try_from(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate a secret key with uniform random distribution in [1, n)
pub fn gen_secret_key(n: &BigInt) -> BigInt {
    let mut rng = rand::rng();
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let key = BigInt::from_bytes_be(Sign::Plus, &bytes);
        if key >= BigInt::one() && key < *n {
            return key;
        }
    }
}

/// A secp256k1 secret scalar together with the key form its address uses
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: BigInt,
    compressed: bool,
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"<redacted>")
            .field("compressed", &self.compressed)
            .finish()
    }
}

impl PrivateKey {
    /// Wrap a secret scalar, rejecting values outside [1, n-1]
    pub fn new(secret: BigInt, compressed: bool) -> Result<Self, KeyError> {
        if secret < BigInt::one() || &secret >= SECP256K1.order() {
            return Err(KeyError::Validation("Secret key out of range".into()));
        }
        Ok(PrivateKey { secret, compressed })
    }

    /// Fresh random key
    pub fn generate(compressed: bool) -> Self {
        PrivateKey {
            secret: gen_secret_key(SECP256K1.order()),
            compressed,
        }
    }

    /// Parse a hex-encoded secret scalar
    pub fn from_hex(sk_hex: &str, compressed: bool) -> Result<Self, KeyError> {
        let bytes = hex::decode(sk_hex)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidFormat("Secret key must be 32 bytes".into()));
        }
        Self::new(BigInt::from_bytes_be(Sign::Plus, &bytes), compressed)
    }

    /// The secret scalar, always in [1, n-1]
    pub fn secret(&self) -> &BigInt {
        &self.secret
    }

    /// Whether the key's public form and address use SEC compression
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_sk(&self.secret)
    }

    /// Wallet Import Format: base58check(version || secret || [0x01 if compressed])
    pub fn to_wif(&self, net: Network) -> String {
        let mut payload = vec![net.wif_byte()];
        payload.extend_from_slice(&bigint_to_32_bytes(&self.secret));
        if self.compressed {
            payload.push(0x01);
        }
        bs58::encode(payload).with_check().into_string()
    }

    /// Parse a WIF string, returning the key and the network it was encoded for
    pub fn from_wif(wif: &str) -> Result<(Self, Network), KeyError> {
        let bytes = bs58::decode(wif).with_check(None).into_vec()?;

        let compressed = match bytes.len() {
            33 => false,
            34 if bytes[33] == 0x01 => true,
            _ => return Err(KeyError::InvalidFormat("Invalid WIF payload length".into())),
        };
        let net = Network::from_wif_byte(bytes[0])
            .ok_or_else(|| KeyError::Validation("Unknown WIF version byte".into()))?;
        let secret = BigInt::from_bytes_be(Sign::Plus, &bytes[1..33]);

        Ok((Self::new(secret, compressed)?, net))
    }
}

/// Public key - a Point on the secp256k1 curve with encoding/decoding functionality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub point: Point,
}

impl PublicKey {
    /// Create from a Point
    pub fn from_point(pt: Point) -> Self {
        PublicKey { point: pt }
    }

    /// Derive public key from secret key
    pub fn from_sk(sk: &BigInt) -> Self {
        PublicKey::from_point(SECP256K1.multiply_generator(sk))
    }

    /// Decode from SEC binary format
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyError> {
        let Some(&prefix) = bytes.first() else {
            return Err(KeyError::InvalidFormat("Empty public key".into()));
        };

        let point = match prefix {
            // Uncompressed format
            4 => {
                if bytes.len() != 65 {
                    return Err(KeyError::InvalidFormat(
                        "Invalid uncompressed public key length".into(),
                    ));
                }
                let x = BigInt::from_bytes_be(Sign::Plus, &bytes[1..33]);
                let y = BigInt::from_bytes_be(Sign::Plus, &bytes[33..65]);
                Point::new(x, y)
            }
            // Compressed format
            2 | 3 => {
                if bytes.len() != 33 {
                    return Err(KeyError::InvalidFormat(
                        "Invalid compressed public key length".into(),
                    ));
                }
                let x = BigInt::from_bytes_be(Sign::Plus, &bytes[1..33]);
                SECP256K1
                    .lift_x(&x, prefix == 3)
                    .ok_or_else(|| KeyError::Validation("Point not on curve".into()))?
            }
            _ => return Err(KeyError::InvalidFormat("Invalid public key prefix".into())),
        };

        if !SECP256K1.is_on_curve(&point) {
            return Err(KeyError::Validation("Point not on curve".into()));
        }
        Ok(PublicKey { point })
    }

    /// Encode to SEC format. The point at infinity has no encoding and yields
    /// an empty vector.
    pub fn encode(&self, compressed: bool) -> Vec<u8> {
        let (Some(x), Some(y)) = (self.point.x(), self.point.y()) else {
            return Vec::new();
        };
        let x_bytes = bigint_to_32_bytes(x);

        if compressed {
            let prefix = if y.is_even() { 0x02 } else { 0x03 };
            let mut result = vec![prefix];
            result.extend_from_slice(&x_bytes);
            result
        } else {
            let mut result = vec![0x04];
            result.extend_from_slice(&x_bytes);
            result.extend_from_slice(&bigint_to_32_bytes(y));
            result
        }
    }

    /// Encode and hash with HASH160
    pub fn encode_hash160(&self, compressed: bool) -> [u8; 20] {
        hash160(&self.encode(compressed))
    }

    /// Get Bitcoin address for a specific network
    pub fn address(&self, net: Network, compressed: bool) -> Address {
        Address::p2pkh(self, compressed, net)
    }
}

/// A pay-to-public-key-hash address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    hash: [u8; 20],
}

impl Address {
    pub fn new(network: Network, hash: [u8; 20]) -> Self {
        Address { network, hash }
    }

    pub fn p2pkh(pk: &PublicKey, compressed: bool, network: Network) -> Self {
        Address::new(network, pk.encode_hash160(compressed))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// The HASH160 of the public key
    pub fn hash(&self) -> &[u8; 20] {
        &self.hash
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.version_byte());
        payload.extend_from_slice(&self.hash);
        f.write_str(&bs58::encode(payload).with_check().into_string())
    }
}

impl FromStr for Address {
    type Err = KeyError;

    /// Parse a Base58Check address, validating the checksum
    fn from_str(s: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(s).with_check(None).into_vec()?;
        if bytes.len() != 21 {
            return Err(KeyError::InvalidFormat("Invalid address length".into()));
        }

        let network = Network::from_version_byte(bytes[0])
            .ok_or_else(|| KeyError::Validation("Unsupported address version byte".into()))?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&bytes[1..21]);
        Ok(Address { network, hash })
    }
}

/// Generate a (private_key, public_key) pair
pub fn gen_key_pair() -> (PrivateKey, PublicKey) {
    let sk = PrivateKey::generate(true);
    let pk = sk.public_key();
    (sk, pk)
}

/// Convert BigInt to 32-byte big-endian array
fn bigint_to_32_bytes(n: &BigInt) -> [u8; 32] {
    crate::compact::int_to_32_bytes(n)
}
