//! Public key recovery from a compact signature.
//!
//! Given the digest e and a signature (r, s) with recovery id, the signer's
//! key is `Q = r^-1 * (s*R - e*G)`, where R is the nonce point rebuilt from
//! r and the two recovery id bits.

use crate::compact::{CompactSignature, RecoveryId};
use crate::curves::{CurveMath, Point};
use crate::ecdsa::digest_to_int;
use crate::error::RecoveryError;
use crate::keys::{Address, Network, PublicKey};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

/// A recovered public key plus the key form the signer committed to.
///
/// This is only a candidate: a wrong signature still recovers *some* key,
/// which then fails to match the claimed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyCandidate {
    point: Point,
    prefer_compressed: bool,
}

impl PublicKeyCandidate {
    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn prefer_compressed(&self) -> bool {
        self.prefer_compressed
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.point.clone())
    }

    /// SEC encoding in the preferred form
    pub fn encode(&self) -> Vec<u8> {
        self.public_key().encode(self.prefer_compressed)
    }

    /// P2PKH address of the candidate in the preferred form
    pub fn address(&self, network: Network) -> Address {
        Address::p2pkh(&self.public_key(), self.prefer_compressed, network)
    }
}

/// Recover the candidate public key for `sig` over `digest`.
#[allow(non_snake_case)]
pub fn recover<C: CurveMath>(
    curve: &C,
    digest: &[u8; 32],
    sig: &CompactSignature,
) -> Result<PublicKeyCandidate, RecoveryError> {
    let n = curve.order();
    let (r, s) = (sig.r(), sig.s());
    let in_range = |v: &BigInt| v >= &BigInt::one() && v < n;
    if !in_range(r) || !in_range(s) {
        return Err(RecoveryError::SignatureOutOfRange);
    }

    let recovery_id = sig.recovery_id();
    let x = if recovery_id.is_x_reduced() {
        r + n
    } else {
        r.clone()
    };

    // lift_x only yields affine points, so R is never the identity
    let R = curve
        .lift_x(&x, recovery_id.is_y_odd())
        .ok_or(RecoveryError::PointNotOnCurve)?;

    let r_inv = curve
        .inverse_mod_order(r)
        .ok_or(RecoveryError::RecoveryFailed)?;
    let z = digest_to_int(digest).mod_floor(n);

    // Q = u1*G + u2*R with u1 = -z/r, u2 = s/r. Q is the identity exactly
    // when s*k = z (mod n) for the nonce k behind R.
    let u1 = (-(&r_inv * z)).mod_floor(n);
    let u2 = (&r_inv * s).mod_floor(n);
    let Q = curve.add(&curve.multiply_generator(&u1), &curve.multiply(&R, &u2));
    if Q.is_infinity() {
        return Err(RecoveryError::RecoveryFailed);
    }

    Ok(PublicKeyCandidate {
        point: Q,
        prefer_compressed: sig.is_compressed(),
    })
}

/// Find the recovery id under which (r, s) recovers `public_key`.
///
/// Used when signing. `NotFound` means the signature was not produced over
/// this digest by this key.
pub fn select_recovery_id<C: CurveMath>(
    curve: &C,
    digest: &[u8; 32],
    r: &BigInt,
    s: &BigInt,
    public_key: &Point,
    compressed: bool,
) -> Result<RecoveryId, RecoveryError> {
    for recovery_id in RecoveryId::all() {
        let sig = CompactSignature::new(r.clone(), s.clone(), recovery_id, compressed)
            .map_err(|_| RecoveryError::SignatureOutOfRange)?;
        if let Ok(candidate) = recover(curve, digest, &sig) {
            if candidate.point() == public_key {
                return Ok(recovery_id);
            }
        }
    }

    tracing::warn!("no recovery id reproduces the signing key; signer and digest disagree");
    Err(RecoveryError::NotFound)
}
