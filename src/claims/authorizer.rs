//! Claim token signing and verification
//!
//! A claim token is an Ed25519 signature over the SHA-256 digest of
//! `"{account_id}-{claim_count}"`, base64-encoded for transport. The same
//! routine verifies on-chain claim evidence during reconciliation.
//!
//! Note: nothing in this service increments `claim_count` when a claim
//! commits, so successive claims by one account sign the same message and
//! produce an identical token. Observed behavior, preserved as-is; whether
//! the counter should advance per claim is an open product question.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

/// Signs and verifies claim authorization tokens
pub struct ClaimAuthorizer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl ClaimAuthorizer {
    pub fn new(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    fn digest(account_id: &str, claim_count: u64) -> [u8; 32] {
        let message = format!("{}-{}", account_id, claim_count);
        Sha256::digest(message.as_bytes()).into()
    }

    /// Issue a token authorizing `account_id` at `claim_count`
    pub fn sign(&self, account_id: &str, claim_count: u64) -> String {
        let digest = Self::digest(account_id, claim_count);
        let signature = self.signing_key.sign(&digest);
        BASE64.encode(signature.to_bytes())
    }

    /// Raw signature bytes for the same message (the on-chain wire form)
    pub fn sign_raw(&self, account_id: &str, claim_count: u64) -> [u8; 64] {
        let digest = Self::digest(account_id, claim_count);
        self.signing_key.sign(&digest).to_bytes()
    }

    /// Check claim evidence against the process key.
    ///
    /// Malformed or mismatched signatures return `false`; this never errors.
    pub fn verify(&self, account_id: &str, claim_count: u64, signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        let digest = Self::digest(account_id, claim_count);
        self.verifying_key.verify(&digest, &signature).is_ok()
    }

    /// The public half of the claim-signing key
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::keys::generate_keypair;

    fn authorizer() -> ClaimAuthorizer {
        let (signing_key, _) = generate_keypair();
        ClaimAuthorizer::new(signing_key)
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let authorizer = authorizer();
        for claim_count in [0u64, 1, 42, u64::MAX] {
            let raw = authorizer.sign_raw("u1", claim_count);
            assert!(authorizer.verify("u1", claim_count, &raw));
        }
    }

    #[test]
    fn test_flipped_bit_fails_verification() {
        let authorizer = authorizer();
        let mut raw = authorizer.sign_raw("u1", 3);
        raw[10] ^= 0x01;
        assert!(!authorizer.verify("u1", 3, &raw));
    }

    #[test]
    fn test_wrong_message_fails_verification() {
        let authorizer = authorizer();
        let raw = authorizer.sign_raw("u1", 3);

        assert!(!authorizer.verify("u1", 4, &raw));
        assert!(!authorizer.verify("u2", 3, &raw));
    }

    #[test]
    fn test_malformed_signature_returns_false() {
        let authorizer = authorizer();
        assert!(!authorizer.verify("u1", 1, b"short"));
        assert!(!authorizer.verify("u1", 1, &[0u8; 64]));
    }

    #[test]
    fn test_token_is_deterministic_per_claim_count() {
        // The claim counter does not advance on commit, so re-issuing a
        // token for the same account yields the same base64 string.
        let authorizer = authorizer();
        assert_eq!(authorizer.sign("u1", 5), authorizer.sign("u1", 5));
        assert_ne!(authorizer.sign("u1", 5), authorizer.sign("u1", 6));
    }

    #[test]
    fn test_token_base64_decodes_to_raw_signature() {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        let authorizer = authorizer();
        let token = authorizer.sign("u1", 9);
        let decoded = BASE64.decode(token).unwrap();
        assert_eq!(decoded, authorizer.sign_raw("u1", 9));
    }
}
