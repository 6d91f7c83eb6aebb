//! Error types for signed message parsing, signature decoding and key recovery

use thiserror::Error;

/// The armored envelope does not follow the signed message grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmorError {
    #[error("Malformed armor: {0}")]
    MalformedArmor(&'static str),
}

/// A compact signature could not be decoded from its binary or base64 form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Compact signature must be 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid compact signature header byte: {0}")]
    InvalidHeader(u8),

    #[error("Invalid base64 in compact signature")]
    InvalidBase64,

    #[error("Signature value does not fit in 32 unsigned bytes")]
    ValueOutOfRange,
}

/// The signature values are inconsistent with the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("Signature r or s is outside [1, n-1]")]
    SignatureOutOfRange,

    #[error("No curve point exists for the recovered x-coordinate")]
    PointNotOnCurve,

    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// No recovery id reproduces the expected public key. This means the signer and
    /// the digest disagree, which is an integration fault rather than bad user input.
    #[error("No recovery id matches the expected public key")]
    NotFound,
}

/// Key and address decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<hex::FromHexError> for KeyError {
    fn from(e: hex::FromHexError) -> Self {
        KeyError::InvalidFormat(e.to_string())
    }
}

impl From<bs58::decode::Error> for KeyError {
    fn from(e: bs58::decode::Error) -> Self {
        KeyError::Validation(e.to_string())
    }
}

/// Main error type for the crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error(transparent)]
    Armor(#[from] ArmorError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MessageError>;
