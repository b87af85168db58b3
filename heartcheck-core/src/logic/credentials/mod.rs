//! Credentials Module - user accounts
//!
//! Accounts are `{username, password, email}` records keyed by username.
//! Records are never updated or deleted once written.

pub mod store;
pub mod verifier;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use serde::Serialize;
use thiserror::Error;

pub use store::{CredentialStore, CsvCredentialStore, CREDENTIAL_COLUMNS};
pub use verifier::{Argon2Verifier, CredentialVerifier, PlaintextVerifier};

/// One registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub username: String,
    /// Stored form produced by the store's `CredentialVerifier`
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("username already registered: {0}")]
    DuplicateUsername(String),

    #[error("malformed credential store {}: {reason}", .path.display())]
    MalformedPersistedStore { path: PathBuf, reason: String },

    #[error("credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Pick a verifier by its configured name (`argon2` or `plaintext`)
pub fn verifier_by_name(name: &str) -> Option<Box<dyn CredentialVerifier>> {
    match name.to_ascii_lowercase().as_str() {
        "argon2" => Some(Box::new(Argon2Verifier)),
        "plaintext" => {
            log::warn!("Plaintext password storage enabled; passwords are stored unhashed");
            Some(Box::new(PlaintextVerifier))
        }
        _ => None,
    }
}
