//! Elliptic Curve Digital Signature Algorithm (ECDSA) over a prehashed digest.
//!
//! This is the raw (r, s) signer that message signing delegates to. Nonces
//! are drawn uniformly at random; nothing here logs or branches observably
//! on secret values beyond the arithmetic itself.

use crate::curves::{CurveMath, Point};
use crate::keys::gen_secret_key;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// ECDSA Signature (r, s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigInt,
    pub s: BigInt,
}

impl Signature {
    pub fn new(r: BigInt, s: BigInt) -> Self {
        Signature { r, s }
    }

    /// Are r and s both in [1, n-1]?
    pub fn is_in_range(&self, n: &BigInt) -> bool {
        let in_range = |v: &BigInt| v >= &BigInt::one() && v < n;
        in_range(&self.r) && in_range(&self.s)
    }
}

/// Interpret a 32-byte digest as an integer. For a 256-bit curve order no
/// truncation is needed; the value is reduced mod n by the callers.
pub fn digest_to_int(digest: &[u8; 32]) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, digest)
}

/// Sign a digest with a secret key.
///
/// Ensures low S value per BIP-62. The caller is expected to pass a secret
/// key in [1, n-1].
#[must_use]
pub fn sign_digest<C: CurveMath>(curve: &C, secret_key: &BigInt, digest: &[u8; 32]) -> Signature {
    let n = curve.order();
    let z = digest_to_int(digest);

    loop {
        let k = gen_secret_key(n);
        let Some(k_inv) = curve.inverse_mod_order(&k) else {
            continue;
        };
        let Some(x) = curve.multiply_generator(&k).x().cloned() else {
            continue;
        };

        let r = x.mod_floor(n);
        if r.is_zero() {
            continue;
        }
        let mut s = (k_inv * (&z + secret_key * &r)).mod_floor(n);
        if s.is_zero() {
            continue;
        }

        // Ensure low S value (BIP-62)
        let half_n = n / BigInt::from(2);
        if s > half_n {
            s = n - &s;
        }

        return Signature::new(r, s);
    }
}

/// Verify a signature over a digest
///
/// Returns `true` if the signature is valid for the given public key point.
#[must_use]
pub fn verify_digest<C: CurveMath>(
    curve: &C,
    public_key: &Point,
    digest: &[u8; 32],
    sig: &Signature,
) -> bool {
    let n = curve.order();

    if !sig.is_in_range(n) || public_key.is_infinity() || !curve.is_on_curve(public_key) {
        return false;
    }

    let z = digest_to_int(digest);
    let Some(w) = curve.inverse_mod_order(&sig.s) else {
        return false;
    };
    let u1 = (&z * &w).mod_floor(n);
    let u2 = (&sig.r * &w).mod_floor(n);

    let p = curve.add(
        &curve.multiply_generator(&u1),
        &curve.multiply(public_key, &u2),
    );

    match p.x() {
        Some(x) => x.mod_floor(n) == sig.r,
        None => false,
    }
}
