use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

use super::*;

fn plaintext_store(path: &std::path::Path) -> CsvCredentialStore {
    CsvCredentialStore::open(path, Box::new(PlaintextVerifier)).unwrap()
}

#[test]
fn test_open_creates_header_only_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("users.csv");

    let store = plaintext_store(&path);

    assert_eq!(fs::read_to_string(&path).unwrap(), "username,password,email\n");
    assert!(store.accounts().unwrap().is_empty());
    assert!(!store.exists("anyone").unwrap());
}

#[test]
fn test_register_then_authenticate() {
    let dir = tempdir().unwrap();
    let store = plaintext_store(&dir.path().join("users.csv"));

    let created = store.register("alice", "s3cret", "alice@example.com").unwrap();
    assert!(store.exists("alice").unwrap());

    let found = store.authenticate("alice", "s3cret").unwrap();
    assert_eq!(found, Some(created));

    assert_eq!(store.authenticate("alice", "wrong").unwrap(), None);
    assert_eq!(store.authenticate("bob", "s3cret").unwrap(), None);
}

#[test]
fn test_duplicate_username_leaves_record_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let store = plaintext_store(&path);

    store.register("alice", "first", "a@example.com").unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = store.register("alice", "second", "other@example.com").unwrap_err();
    assert!(matches!(err, CredentialError::DuplicateUsername(ref name) if name == "alice"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert!(store.authenticate("alice", "first").unwrap().is_some());
    assert!(store.authenticate("alice", "second").unwrap().is_none());
}

#[test]
fn test_existing_file_is_reused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    fs::write(&path, "username,password,email\nbob,pw,bob@example.com\n").unwrap();

    let store = plaintext_store(&path);
    assert!(store.exists("bob").unwrap());
    assert!(store.authenticate("bob", "pw").unwrap().is_some());

    store.register("carol", "pw2", "carol@example.com").unwrap();
    let reopened = plaintext_store(&path);
    let names: Vec<String> = reopened.accounts().unwrap().into_iter().map(|a| a.username).collect();
    assert_eq!(names, vec!["bob".to_string(), "carol".to_string()]);
}

#[test]
fn test_fields_with_commas_survive_rewrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let store = plaintext_store(&path);

    store.register("dave", "pa,ss\"word", "dave@example.com").unwrap();
    let reopened = plaintext_store(&path);
    assert!(reopened.authenticate("dave", "pa,ss\"word").unwrap().is_some());
}

#[test]
fn test_missing_column_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let original = "username,email\nbob,bob@example.com\n";
    fs::write(&path, original).unwrap();

    let err = CsvCredentialStore::open(&path, Box::new(PlaintextVerifier)).err().unwrap();
    assert!(matches!(err, CredentialError::MalformedPersistedStore { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_malformed_file_aborts_register_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let store = plaintext_store(&path);

    let corrupted = "username,password\nbob,pw\n";
    fs::write(&path, corrupted).unwrap();

    let err = store.register("eve", "pw", "eve@example.com").unwrap_err();
    assert!(matches!(err, CredentialError::MalformedPersistedStore { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), corrupted);
}

#[test]
fn test_ragged_row_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    fs::write(&path, "username,password,email\nbob,pw\n").unwrap();

    let err = CsvCredentialStore::open(&path, Box::new(PlaintextVerifier)).err().unwrap();
    assert!(matches!(err, CredentialError::MalformedPersistedStore { .. }));
}

#[test]
fn test_argon2_store_never_writes_plaintext() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.csv");
    let store = CsvCredentialStore::open(&path, Box::new(Argon2Verifier)).unwrap();

    store.register("frank", "correct horse", "frank@example.com").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("correct horse"));
    assert!(store.authenticate("frank", "correct horse").unwrap().is_some());
    assert!(store.authenticate("frank", "battery staple").unwrap().is_none());
}

#[test]
fn test_concurrent_register_same_username() {
    let dir = tempdir().unwrap();
    let store = Arc::new(plaintext_store(&dir.path().join("users.csv")));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.register("grace", &format!("pw{}", i), "grace@example.com")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(CredentialError::DuplicateUsername(_))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(store.accounts().unwrap().len(), 1);
}

#[test]
fn test_concurrent_register_distinct_usernames_keeps_all() {
    let dir = tempdir().unwrap();
    let store = Arc::new(plaintext_store(&dir.path().join("users.csv")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.register(&format!("user{}", i), "pw", "u@example.com"))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert_eq!(store.accounts().unwrap().len(), 8);
}

#[test]
fn test_verifier_by_name() {
    assert_eq!(verifier_by_name("ARGON2").unwrap().name(), "argon2");
    assert_eq!(verifier_by_name("plaintext").unwrap().name(), "plaintext");
    assert!(verifier_by_name("md5").is_none());
}
