//! # yap-auth-simple
//!
//! `CredentialVerifier` implementations.
//!
//! `PlainTextVerifier` reproduces the naive reference behavior (stored
//! secret is the password, comparison is equality). `Argon2Verifier` is the
//! hardened drop-in: same trait, PHC-encoded salted hashes. The auth flow
//! does not change between them.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use yap_core::traits::CredentialVerifier;

/// Stores passwords verbatim. Only suitable for the local-first toy setup.
pub struct PlainTextVerifier;

impl CredentialVerifier for PlainTextVerifier {
    fn encode(&self, password: &str) -> anyhow::Result<String> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password == stored
    }
}

/// Argon2id with a per-password random salt, PHC string format.
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn encode(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("argon2 hashing failed: {}", e))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_is_exact_equality() {
        let v = PlainTextVerifier;
        let stored = v.encode("hunter2").unwrap();
        assert_eq!(stored, "hunter2");
        assert!(v.verify("hunter2", &stored));
        // Password comparison is exact, including case and whitespace.
        assert!(!v.verify("Hunter2", &stored));
        assert!(!v.verify("hunter2 ", &stored));
    }

    #[test]
    fn argon2_round_trip() {
        let v = Argon2Verifier;
        let stored = v.encode("hunter2").unwrap();
        assert_ne!(stored, "hunter2");
        assert!(v.verify("hunter2", &stored));
        assert!(!v.verify("wrong", &stored));
    }

    #[test]
    fn argon2_rejects_garbage_hash() {
        let v = Argon2Verifier;
        assert!(!v.verify("anything", "not-a-phc-string"));
    }
}
