//! Signing key custody
//!
//! The claim-signing keypair is Ed25519, loaded once at startup from a
//! PKCS#8 PEM file. A missing or unparseable key is startup-fatal: the
//! service must never issue claim tokens it cannot later verify.

use ed25519_dalek::pkcs8::DecodePrivateKey;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::path::Path;

use crate::types::{Result, TalentsError};

/// Load the claim-signing key from a PEM-encoded PKCS#8 file
pub fn load_signing_key(path: &Path) -> Result<SigningKey> {
    SigningKey::read_pkcs8_pem_file(path).map_err(|e| {
        TalentsError::Config(format!(
            "Failed to load signing key from {}: {}",
            path.display(),
            e
        ))
    })
}

/// Generate a fresh Ed25519 keypair.
///
/// Used in dev mode when no key file is configured; tokens signed with an
/// ephemeral key do not survive a restart.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::pkcs8::EncodePrivateKey;

    #[test]
    fn test_keypair_generation() {
        let (signing_key, verifying_key) = generate_keypair();
        assert_eq!(signing_key.verifying_key(), verifying_key);
    }

    #[test]
    fn test_load_round_trip() {
        let (signing_key, _) = generate_keypair();
        let pem = signing_key
            .to_pkcs8_pem(ed25519_dalek::pkcs8::spki::der::pem::LineEnding::LF)
            .unwrap();

        let dir = std::env::temp_dir().join("talents-key-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("key.pem");
        std::fs::write(&path, pem.as_bytes()).unwrap();

        let loaded = load_signing_key(&path).unwrap();
        assert_eq!(loaded.to_bytes(), signing_key.to_bytes());
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = load_signing_key(Path::new("/nonexistent/key.pem")).unwrap_err();
        assert!(matches!(err, TalentsError::Config(_)));
    }
}
