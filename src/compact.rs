//! Compact (65-byte) recoverable signatures.
//!
//! Binary layout:
//!
//! - byte 0: header, `27 + recovery_id + (4 if compressed)`
//! - bytes 1..33: `r`, 32 bytes big-endian
//! - bytes 33..65: `s`, 32 bytes big-endian
//!
//! The textual form is the standard base64 encoding of those 65 bytes.

use crate::ecdsa::Signature;
use crate::error::CodecError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use num_bigint::{BigInt, Sign};
use std::fmt;
use std::str::FromStr;

/// Size of a compact signature in bytes
pub const SIZE: usize = 65;

/// Lowest valid header byte
const HEADER_BASE: u8 = 27;

/// Header offset for signatures made with a compressed public key
const COMPRESSED_FLAG: u8 = 4;

/// Recovery IDs, a.k.a. "recid".
///
/// It consists of two bits of information:
///
/// - low bit: is the y-coordinate of the nonce point R odd?
/// - high bit: did the x-coordinate of R overflow the curve order, so that
///   `r = R.x - n`?
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Maximum supported value for the recovery ID (inclusive).
    pub const MAX: u8 = 3;

    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self(((is_x_reduced as u8) << 1) | (is_y_odd as u8))
    }

    pub const fn is_y_odd(self) -> bool {
        (self.0 & 1) != 0
    }

    pub const fn is_x_reduced(self) -> bool {
        (self.0 & 0b10) != 0
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte <= Self::MAX {
            Some(Self(byte))
        } else {
            None
        }
    }

    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// All four ids, in trial order
    pub fn all() -> impl Iterator<Item = RecoveryId> {
        (0..=Self::MAX).map(RecoveryId)
    }
}

impl TryFrom<u8> for RecoveryId {
    type Error = CodecError;

    fn try_from(byte: u8) -> Result<Self, CodecError> {
        Self::from_byte(byte).ok_or(CodecError::InvalidHeader(byte))
    }
}

impl From<RecoveryId> for u8 {
    fn from(id: RecoveryId) -> u8 {
        id.0
    }
}

/// An ECDSA signature bundled with the data needed to recover the public key.
///
/// r and s are any 256-bit unsigned values; range checks against the curve
/// order happen during recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactSignature {
    r: BigInt,
    s: BigInt,
    recovery_id: RecoveryId,
    compressed: bool,
}

impl CompactSignature {
    /// Fails with `ValueOutOfRange` if r or s is negative or wider than 32 bytes.
    pub fn new(
        r: BigInt,
        s: BigInt,
        recovery_id: RecoveryId,
        compressed: bool,
    ) -> Result<Self, CodecError> {
        if !fits_32_bytes(&r) || !fits_32_bytes(&s) {
            return Err(CodecError::ValueOutOfRange);
        }
        Ok(CompactSignature {
            r,
            s,
            recovery_id,
            compressed,
        })
    }

    pub fn r(&self) -> &BigInt {
        &self.r
    }

    pub fn s(&self) -> &BigInt {
        &self.s
    }

    pub fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }

    /// Was the signing key serialized in compressed form?
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// The header byte: `27 + recovery_id + (4 if compressed)`
    pub fn flags(&self) -> u8 {
        let compressed = if self.compressed { COMPRESSED_FLAG } else { 0 };
        HEADER_BASE + self.recovery_id.to_byte() + compressed
    }

    /// The plain (r, s) signature, without recovery information
    pub fn to_signature(&self) -> Signature {
        Signature::new(self.r.clone(), self.s.clone())
    }

    /// Decode from the 65-byte binary form
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != SIZE {
            return Err(CodecError::InvalidLength(bytes.len()));
        }

        let header = bytes[0];
        if !(HEADER_BASE..HEADER_BASE + 2 * COMPRESSED_FLAG).contains(&header) {
            return Err(CodecError::InvalidHeader(header));
        }
        let flags = header - HEADER_BASE;
        let recovery_id = RecoveryId(flags & RecoveryId::MAX);
        let compressed = flags >= COMPRESSED_FLAG;

        let r = BigInt::from_bytes_be(Sign::Plus, &bytes[1..33]);
        let s = BigInt::from_bytes_be(Sign::Plus, &bytes[33..65]);

        Ok(CompactSignature {
            r,
            s,
            recovery_id,
            compressed,
        })
    }

    /// Encode to the 65-byte binary form
    pub fn encode(&self) -> [u8; SIZE] {
        let mut bytes = [0u8; SIZE];
        bytes[0] = self.flags();
        bytes[1..33].copy_from_slice(&int_to_32_bytes(&self.r));
        bytes[33..65].copy_from_slice(&int_to_32_bytes(&self.s));
        bytes
    }

    /// Decode from standard base64 text
    pub fn from_base64(text: &str) -> Result<Self, CodecError> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|_| CodecError::InvalidBase64)?;
        Self::decode(&bytes)
    }

    /// Encode as standard base64 text
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.encode())
    }
}

impl fmt::Display for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for CompactSignature {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        Self::from_base64(s)
    }
}

fn fits_32_bytes(n: &BigInt) -> bool {
    n.sign() != Sign::Minus && n.bits() <= 256
}

/// Big-endian, left-padded to 32 bytes. Callers guarantee the value is
/// unsigned and at most 256 bits wide.
pub(crate) fn int_to_32_bytes(n: &BigInt) -> [u8; 32] {
    let (_, bytes) = n.to_bytes_be();
    let mut result = [0u8; 32];
    let len = bytes.len().min(32);
    result[32 - len..].copy_from_slice(&bytes[bytes.len() - len..]);
    result
}
