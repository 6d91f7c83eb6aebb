//! Bitcoin Signed Message
//!
//! Signs arbitrary messages with a Bitcoin private key and verifies them
//! against an address alone, by recovering the signer's public key from a
//! 65-byte compact signature.

pub mod armor;
pub mod compact;
pub mod curves;
pub mod digest;
pub mod ecdsa;
pub mod error;
pub mod hash;
pub mod keys;
pub mod recovery;
pub mod secp256k1;
pub mod signer;

pub use error::{ArmorError, CodecError, KeyError, MessageError, RecoveryError, Result};

pub use armor::SignedMessage;
pub use compact::{CompactSignature, RecoveryId};
pub use curves::{Curve, CurveMath, Generator, Point};
pub use digest::message_digest;
pub use ecdsa::Signature;
pub use keys::{Address, Network, PrivateKey, PublicKey, gen_key_pair};
pub use recovery::{PublicKeyCandidate, recover, select_recovery_id};
pub use secp256k1::{SECP256K1, Secp256k1};
pub use signer::MessageSigner;
