//! Signing and verification of Bitcoin signed messages.

use crate::armor::{self, SignedMessage};
use crate::compact::CompactSignature;
use crate::curves::CurveMath;
use crate::digest::message_digest;
use crate::ecdsa::{sign_digest, verify_digest};
use crate::error::{RecoveryError, Result};
use crate::keys::{Address, PrivateKey, PublicKey};
use crate::recovery::{PublicKeyCandidate, recover, select_recovery_id};
use crate::secp256k1::{SECP256K1, Secp256k1};

/// Signs messages and checks signed messages against addresses.
#[derive(Debug)]
pub struct MessageSigner<'a, C: CurveMath = Secp256k1> {
    curve: &'a C,
}

impl Default for MessageSigner<'static, Secp256k1> {
    fn default() -> Self {
        MessageSigner { curve: &*SECP256K1 }
    }
}

impl<'a, C: CurveMath> MessageSigner<'a, C> {
    pub fn new(curve: &'a C) -> Self {
        MessageSigner { curve }
    }

    /// Sign `message` with `key`, committing to the key's compression form.
    pub fn sign(&self, message: &[u8], key: &PrivateKey) -> Result<SignedMessage> {
        let digest = message_digest(message);
        let public_key = self.curve.multiply_generator(key.secret());
        let raw = sign_digest(self.curve, key.secret(), &digest);

        let recovery_id = select_recovery_id(
            self.curve,
            &digest,
            &raw.r,
            &raw.s,
            &public_key,
            key.is_compressed(),
        )?;
        let signature = CompactSignature::new(raw.r, raw.s, recovery_id, key.is_compressed())?;

        Ok(SignedMessage::new(message, signature))
    }

    /// Recover the public key that produced `signed`.
    pub fn recover_public_key(
        &self,
        signed: &SignedMessage,
    ) -> std::result::Result<PublicKeyCandidate, RecoveryError> {
        let digest = message_digest(signed.message());
        recover(self.curve, &digest, signed.signature()).inspect_err(|err| {
            tracing::debug!(%err, "public key recovery failed");
        })
    }

    /// Does `signed` recover to a key whose address is `address`?
    ///
    /// Recovery failures count as a mismatch.
    pub fn verify(&self, signed: &SignedMessage, address: &Address) -> bool {
        let Ok(candidate) = self.recover_public_key(signed) else {
            return false;
        };
        self.matches(&candidate, address)
    }

    /// Like [`verify`](Self::verify), but also checks the (r, s) signature
    /// against the recovered key before comparing addresses.
    pub fn verify_strict(&self, signed: &SignedMessage, address: &Address) -> bool {
        let Ok(candidate) = self.recover_public_key(signed) else {
            return false;
        };

        let digest = message_digest(signed.message());
        let sig = signed.signature().to_signature();
        if !verify_digest(self.curve, candidate.point(), &digest, &sig) {
            tracing::debug!("recovered key does not verify the signature");
            return false;
        }
        self.matches(&candidate, address)
    }

    /// Parse armored text and verify it. Malformed armor or an undecodable
    /// signature is an error; a wrong signer is `Ok(false)`.
    pub fn verify_armored(&self, armored: &[u8], address: &Address) -> Result<bool> {
        let signed = armor::parse(armored)?;
        Ok(self.verify(&signed, address))
    }

    fn matches(&self, candidate: &PublicKeyCandidate, address: &Address) -> bool {
        let derived = Address::p2pkh(
            &PublicKey::from_point(candidate.point().clone()),
            candidate.prefer_compressed(),
            address.network(),
        );
        let valid = derived == *address;
        tracing::debug!(network = %address.network(), valid, "verified signed message");
        valid
    }
}
