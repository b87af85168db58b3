//! Password verification strategies
//!
//! The stored `password` column holds whatever `seal` produced. Swapping
//! the verifier changes what is stored without touching store callers.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;

use super::CredentialError;

/// Turns a password into its stored form and checks claims against it
pub trait CredentialVerifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Value written to the `password` column on registration
    fn seal(&self, password: &str) -> Result<String, CredentialError>;

    /// Whether `password` matches the stored value
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Argon2id PHC strings with a random salt per account
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
    fn name(&self) -> &'static str {
        "argon2"
    }

    fn seal(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => {
                log::warn!("Stored password is not an argon2 hash; rejecting");
                false
            }
        }
    }
}

/// Exact string equality against a plaintext column.
///
/// SECURITY: stores passwords in the clear. Only for reading credential
/// files written by the legacy application.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn name(&self) -> &'static str {
        "plaintext"
    }

    fn seal(&self, password: &str) -> Result<String, CredentialError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password == stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_seal_hides_password() {
        let sealed = Argon2Verifier.seal("hunter2").unwrap();
        assert!(!sealed.contains("hunter2"));
        assert!(sealed.starts_with("$argon2"));
        assert!(Argon2Verifier.verify("hunter2", &sealed));
        assert!(!Argon2Verifier.verify("hunter3", &sealed));
    }

    #[test]
    fn test_argon2_salts_differ() {
        let a = Argon2Verifier.seal("same").unwrap();
        let b = Argon2Verifier.seal("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_argon2_rejects_plaintext_column() {
        assert!(!Argon2Verifier.verify("secret", "secret"));
    }

    #[test]
    fn test_plaintext_exact_match() {
        let sealed = PlaintextVerifier.seal("Secret").unwrap();
        assert!(PlaintextVerifier.verify("Secret", &sealed));
        assert!(!PlaintextVerifier.verify("secret", &sealed));
    }
}
