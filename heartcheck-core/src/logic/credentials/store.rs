//! CSV-backed credential store
//!
//! File layout: header `username,password,email`, one account per row.
//! Every registration rewrites the whole file through a temporary sibling
//! and a rename, so readers see either the old or the new record set.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use parking_lot::Mutex;

use crate::logic::tabular::{parse_records, write_record};
use super::verifier::CredentialVerifier;
use super::{CredentialError, UserAccount};

/// Column names, in the order they are written
pub const CREDENTIAL_COLUMNS: [&str; 3] = ["username", "password", "email"];

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Account lookup and registration
pub trait CredentialStore: Send + Sync {
    /// Whether an account with this username exists
    fn exists(&self, username: &str) -> Result<bool, CredentialError>;

    /// `Some(account)` if the username exists and the password matches
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, CredentialError>;

    /// Add a new account; fails with `DuplicateUsername` if taken
    fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserAccount, CredentialError>;
}

// ============================================================================
// CSV IMPLEMENTATION
// ============================================================================

pub struct CsvCredentialStore {
    path: PathBuf,
    verifier: Box<dyn CredentialVerifier>,
    /// Serializes the read-check-rewrite sequence of `register`
    write_lock: Mutex<()>,
}

impl CsvCredentialStore {
    /// Open the store, creating an empty file with the header if absent
    pub fn open(
        path: impl Into<PathBuf>,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Result<Self, CredentialError> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            write_atomically(&path, &render(&[]))?;
            log::info!("Created credential store at {}", path.display());
        }

        let store = Self {
            path,
            verifier,
            write_lock: Mutex::new(()),
        };

        // Fail early on a file we could not safely rewrite later
        let count = store.load()?.len();
        log::info!(
            "Credential store ready: {} accounts, verifier={}",
            count,
            store.verifier.name()
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of all accounts, in file order
    pub fn accounts(&self) -> Result<Vec<UserAccount>, CredentialError> {
        self.load()
    }

    fn load(&self) -> Result<Vec<UserAccount>, CredentialError> {
        let text = fs::read_to_string(&self.path)?;
        let records = parse_records(&text).map_err(|reason| self.malformed(reason))?;

        let mut rows = records.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| self.malformed("missing header row"))?;

        let mut indices = [0usize; 3];
        for (slot, column) in indices.iter_mut().zip(CREDENTIAL_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| self.malformed(format!("missing column '{}'", column)))?;
        }

        rows.enumerate()
            .map(|(i, row)| {
                if row.len() != header.len() {
                    return Err(self.malformed(format!(
                        "row {} has {} fields, expected {}",
                        i + 2,
                        row.len(),
                        header.len()
                    )));
                }
                Ok(UserAccount {
                    username: row[indices[0]].clone(),
                    password: row[indices[1]].clone(),
                    email: row[indices[2]].clone(),
                })
            })
            .collect()
    }

    fn malformed(&self, reason: impl Into<String>) -> CredentialError {
        CredentialError::MalformedPersistedStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl CredentialStore for CsvCredentialStore {
    fn exists(&self, username: &str) -> Result<bool, CredentialError> {
        Ok(self.load()?.iter().any(|a| a.username == username))
    }

    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, CredentialError> {
        let account = self
            .load()?
            .into_iter()
            .find(|a| a.username == username)
            .filter(|a| self.verifier.verify(password, &a.password));

        if account.is_none() {
            log::debug!("Authentication failed for '{}'", username);
        }
        Ok(account)
    }

    fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserAccount, CredentialError> {
        let _guard = self.write_lock.lock();

        let mut accounts = self.load()?;
        if accounts.iter().any(|a| a.username == username) {
            return Err(CredentialError::DuplicateUsername(username.to_string()));
        }

        let account = UserAccount {
            username: username.to_string(),
            password: self.verifier.seal(password)?,
            email: email.to_string(),
        };
        accounts.push(account.clone());

        write_atomically(&self.path, &render(&accounts))?;
        log::info!("Registered account '{}' ({} total)", username, accounts.len());

        Ok(account)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn render(accounts: &[UserAccount]) -> String {
    let mut out = String::new();
    write_record(&mut out, &CREDENTIAL_COLUMNS);
    for account in accounts {
        write_record(&mut out, &[&account.username, &account.password, &account.email]);
    }
    out
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "credential path has no file name"))?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)
}
