//! The Bitcoin signed message digest.
//!
//! The value that is actually signed is
//! `hash256(varstr("Bitcoin Signed Message:\n") || varint(len(message)) || message)`.
//! The magic prefix keeps a message signature from ever being valid as a
//! transaction signature.

use crate::hash::hash256;

/// Fixed prefix mixed into every signed message digest
pub const MESSAGE_MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

/// Encode a variable-length integer
pub fn encode_varint(n: u64) -> Vec<u8> {
    if n < 0xfd {
        vec![n as u8]
    } else if n <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(n as u16).to_le_bytes());
        result
    } else if n <= 0xffff_ffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(n as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&n.to_le_bytes());
        result
    }
}

/// Encode bytes prefixed with their varint length
pub fn encode_var_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_varint(data.len() as u64);
    result.extend_from_slice(data);
    result
}

/// Serialized payload that gets double hashed
pub fn message_payload(message: &[u8]) -> Vec<u8> {
    let mut payload = encode_var_bytes(MESSAGE_MAGIC);
    payload.extend(encode_var_bytes(message));
    payload
}

/// Compute the 32-byte digest for a signed message
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    hash256(&message_payload(message))
}
