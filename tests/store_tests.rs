//! Integration tests for the credvault store: create, open, add, remove.

use std::fs;
use std::path::PathBuf;

use credvault::crypto::{
    self, derive_key_with_params, verification_tag, Argon2Params, CipherSuite,
};
use credvault::errors::CredVaultError;
use credvault::vault::format::{read_document, write_document};
use credvault::vault::{CredentialStore, NewEntry, Session, SessionStatus, StoreOptions};
use tempfile::TempDir;

/// Helper: a store over a fresh temp dir with cheap Argon2 params.
fn store_with(cipher: CipherSuite) -> (TempDir, CredentialStore) {
    let dir = TempDir::new().expect("create temp dir");
    let options = StoreOptions {
        cipher,
        argon2_params: Argon2Params {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        },
    };
    let store = CredentialStore::with_options(dir.path(), options);
    (dir, store)
}

fn store() -> (TempDir, CredentialStore) {
    store_with(CipherSuite::Aes256Ctr)
}

/// Helper: create "vault" with password "p1" and open it.
fn open_vault(store: &CredentialStore) -> (Session, PathBuf) {
    let path = store.create("vault", "p1").expect("create");
    let session = Session::new();
    store.open(&session, &path, "p1").expect("open");
    (session, path)
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[test]
fn create_writes_empty_document() {
    let (dir, store) = store();

    let path = store.create("vault", "p1").unwrap();
    assert_eq!(path, dir.path().join("vault.json"));

    let doc = read_document(&path).unwrap();
    assert!(doc.database.entries.is_empty());
    assert_eq!(doc.database.meta.name, "vault.json");
    assert_eq!(doc.database.meta.description, "Personal password database");
    assert_eq!(doc.header.crypto.cipher, "AES-256");
    assert_eq!(doc.header.crypto.compression, "GZip");

    let salt = &doc.database.meta.salt;
    assert_eq!(salt.len(), 32);
    assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(
        doc.database.meta.hash,
        verification_tag("vault.json", b"p1").unwrap()
    );
}

#[test]
fn create_does_not_double_the_extension() {
    let (dir, store) = store();
    let path = store.create("vault.json", "p1").unwrap();
    assert_eq!(path, dir.path().join("vault.json"));
}

#[test]
fn create_twice_fails_with_already_exists() {
    let (_dir, store) = store();
    store.create("vault", "p1").unwrap();

    let result = store.create("vault", "p2");
    assert!(matches!(result, Err(CredVaultError::AlreadyExists(_))));

    // The original database is untouched.
    let session = Session::new();
    let path = store.database_path("vault");
    assert!(store.open(&session, &path, "p1").is_ok());
}

#[test]
fn create_rejects_empty_name_or_password() {
    let (_dir, store) = store();
    assert!(matches!(
        store.create("", "p1"),
        Err(CredVaultError::Validation(_))
    ));
    assert!(matches!(
        store.create("vault", ""),
        Err(CredVaultError::Validation(_))
    ));
}

#[test]
fn create_rejects_path_separators() {
    let (_dir, store) = store();
    assert!(matches!(
        store.create("../escape", "p1"),
        Err(CredVaultError::Validation(_))
    ));
}

#[test]
fn create_rejects_hidden_names() {
    let (dir, store) = store();
    for name in [".hidden", ".", ".."] {
        assert!(
            matches!(store.create(name, "p1"), Err(CredVaultError::Validation(_))),
            "{name} was accepted"
        );
    }
    assert!(!dir.path().join(".hidden.json").exists());
}

#[test]
fn create_rejects_kdf_params_that_could_never_open() {
    let dir = TempDir::new().unwrap();
    let options = StoreOptions {
        cipher: CipherSuite::Aes256Ctr,
        argon2_params: Argon2Params {
            memory_kib: 1_024,
            iterations: 1,
            parallelism: 1,
        },
    };
    let store = CredentialStore::with_options(dir.path(), options);

    let result = store.create("vault", "p1");
    assert!(matches!(result, Err(CredVaultError::KeyDerivationFailed(_))));
    assert!(!dir.path().join("vault.json").exists());
}

#[test]
fn freshly_created_database_opens_with_its_own_params() {
    let (_dir, store) = store();
    let path = store.create("vault", "p1").unwrap();

    let session = Session::new();
    let opened = store.open(&session, &path, "p1").unwrap();
    assert!(opened.entries.is_empty());
}

#[test]
fn salts_differ_between_databases() {
    let (_dir, store) = store();
    let a = read_document(&store.create("a", "p1").unwrap()).unwrap();
    let b = read_document(&store.create("b", "p1").unwrap()).unwrap();
    assert_ne!(a.database.meta.salt, b.database.meta.salt);
}

#[test]
fn non_default_kdf_params_are_recorded() {
    let (_dir, store) = store();
    let doc = read_document(&store.create("vault", "p1").unwrap()).unwrap();
    assert_eq!(doc.argon2_params().memory_kib, 8_192);
    assert_eq!(doc.argon2_params().parallelism, 1);
}

#[cfg(unix)]
#[test]
fn database_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    // Rewrites keep the restriction.
    store
        .add_entry(&session, NewEntry::new("email", "s3cr3t"))
        .unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

#[test]
fn open_with_correct_password_succeeds() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);

    assert_eq!(session.status(), SessionStatus::Open);
    assert_eq!(session.path(), Some(path));

    let opened = store.list_entries(&session).unwrap();
    assert_eq!(opened.name, "vault.json");
    assert!(opened.entries.is_empty());
    assert!(opened.skipped.is_empty());
}

#[test]
fn open_with_wrong_password_fails_and_closes_session() {
    let (_dir, store) = store();
    let path = store.create("vault", "p1").unwrap();

    let session = Session::new();
    let result = store.open(&session, &path, "wrong");
    assert!(matches!(result, Err(CredVaultError::InvalidPassword)));
    assert_eq!(session.status(), SessionStatus::Closed);
}

#[test]
fn open_with_empty_password_is_a_validation_error() {
    let (_dir, store) = store();
    let path = store.create("vault", "p1").unwrap();

    let session = Session::new();
    let result = store.open(&session, &path, "");
    assert!(matches!(result, Err(CredVaultError::Validation(_))));
    assert!(!session.is_open());
}

#[test]
fn open_missing_database_is_not_found() {
    let (dir, store) = store();
    let session = Session::new();
    let result = store.open(&session, &dir.path().join("nope.json"), "p1");
    assert!(matches!(result, Err(CredVaultError::NotFound(_))));
}

#[test]
fn open_malformed_json_is_a_format_error() {
    let (dir, store) = store();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let session = Session::new();
    let result = store.open(&session, &path, "p1");
    assert!(matches!(result, Err(CredVaultError::Format(_))));
}

#[test]
fn open_unknown_cipher_is_rejected() {
    let (_dir, store) = store();
    let path = store.create("vault", "p1").unwrap();

    let mut doc = read_document(&path).unwrap();
    doc.header.crypto.cipher = "Twofish".into();
    write_document(&path, &doc).unwrap();

    let session = Session::new();
    let result = store.open(&session, &path, "p1");
    assert!(matches!(result, Err(CredVaultError::UnsupportedCipher(_))));
    assert_eq!(session.status(), SessionStatus::Closed);
}

#[test]
fn is_password_valid_checks_without_opening() {
    let (_dir, store) = store();
    let path = store.create("vault", "p1").unwrap();

    let salt = CredentialStore::is_password_valid(&path, "p1").unwrap();
    assert!(salt.is_some());
    assert!(CredentialStore::is_password_valid(&path, "p2")
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// add / list / remove
// ---------------------------------------------------------------------------

#[test]
fn add_then_reopen_returns_entry() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);

    let id = store
        .add_entry(
            &session,
            NewEntry::new("email", "s3cr3t").with_username("me@example.com"),
        )
        .unwrap();
    store.close(&session);
    assert_eq!(session.status(), SessionStatus::Closed);

    let session = Session::new();
    let opened = store.open(&session, &path, "p1").unwrap();
    assert_eq!(opened.entries.len(), 1);

    let entry = &opened.entries[0];
    assert_eq!(entry.index, 0);
    assert_eq!(entry.id, id);
    assert_eq!(entry.title, "email");
    assert_eq!(entry.username, "me@example.com");
    assert_eq!(entry.secret.as_str(), "s3cr3t");
    assert!(entry.created.is_some());
}

#[test]
fn stored_secret_is_not_plaintext() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    store
        .add_entry(&session, NewEntry::new("email", "s3cr3t"))
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"email\""));
    assert!(!raw.contains("s3cr3t"));
}

#[test]
fn add_rejects_empty_title_or_secret() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);

    assert!(matches!(
        store.add_entry(&session, NewEntry::new("", "x")),
        Err(CredVaultError::Validation(_))
    ));
    assert!(matches!(
        store.add_entry(&session, NewEntry::new("email", "")),
        Err(CredVaultError::Validation(_))
    ));
    assert!(read_document(&path).unwrap().database.entries.is_empty());
}

#[test]
fn add_then_remove_restores_document() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    let before = read_document(&path).unwrap();

    store
        .add_entry(&session, NewEntry::new("email", "s3cr3t"))
        .unwrap();
    let removed = store.remove_entry(&session, 0).unwrap();
    assert_eq!(removed.title, "email");

    assert_eq!(read_document(&path).unwrap(), before);
}

#[test]
fn remove_shifts_later_indices_down() {
    let (_dir, store) = store();
    let (session, _path) = open_vault(&store);

    for (title, secret) in [("a", "1"), ("b", "2"), ("c", "3")] {
        store
            .add_entry(&session, NewEntry::new(title, secret))
            .unwrap();
    }
    store.remove_entry(&session, 1).unwrap();

    let opened = store.list_entries(&session).unwrap();
    let titles: Vec<_> = opened.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["a", "c"]);
    assert_eq!(opened.entries[1].index, 1);
    assert_eq!(opened.entries[1].secret.as_str(), "3");
}

#[test]
fn remove_out_of_range_leaves_file_unchanged() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    store
        .add_entry(&session, NewEntry::new("email", "s3cr3t"))
        .unwrap();
    let before = fs::read(&path).unwrap();

    let result = store.remove_entry(&session, 1);
    assert!(matches!(
        result,
        Err(CredVaultError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn operations_on_closed_session_fail() {
    let (_dir, store) = store();
    let session = Session::new();

    assert!(matches!(
        store.list_entries(&session),
        Err(CredVaultError::SessionClosed)
    ));
    assert!(matches!(
        store.add_entry(&session, NewEntry::new("email", "s3cr3t")),
        Err(CredVaultError::SessionClosed)
    ));
    assert!(matches!(
        store.remove_entry(&session, 0),
        Err(CredVaultError::SessionClosed)
    ));
}

#[test]
fn corrupted_entry_is_skipped_and_reported() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    store.add_entry(&session, NewEntry::new("a", "1")).unwrap();
    store.add_entry(&session, NewEntry::new("b", "2")).unwrap();
    store.close(&session);

    let mut doc = read_document(&path).unwrap();
    doc.database.entries[0].secret_ciphertext = "!!! not base64 !!!".into();
    write_document(&path, &doc).unwrap();

    let session = Session::new();
    let opened = store.open(&session, &path, "p1").unwrap();
    assert_eq!(opened.total(), 2);

    assert_eq!(opened.entries.len(), 1);
    assert_eq!(opened.entries[0].title, "b");
    assert_eq!(opened.entries[0].index, 1);

    assert_eq!(opened.skipped.len(), 1);
    assert_eq!(opened.skipped[0].index, 0);
    assert_eq!(opened.skipped[0].title, "a");

    // The damaged entry can still be removed by its position.
    store.remove_entry(&session, 0).unwrap();
    let opened = store.list_entries(&session).unwrap();
    assert!(opened.skipped.is_empty());
    assert_eq!(opened.entries[0].title, "b");
}

/// Helper: re-derive the data key of the database at `path`.
fn database_key(path: &std::path::Path, password: &str) -> [u8; 32] {
    let doc = read_document(path).unwrap();
    derive_key_with_params(
        password.as_bytes(),
        &doc.salt().unwrap(),
        &doc.argon2_params(),
    )
    .unwrap()
}

#[test]
fn entry_with_invalid_utf8_secret_is_skipped() {
    let (_dir, store) = store();
    let (session, path) = open_vault(&store);
    store.add_entry(&session, NewEntry::new("a", "1")).unwrap();
    store.add_entry(&session, NewEntry::new("b", "2")).unwrap();
    store.close(&session);

    // Encrypts fine under the right key but is not text.
    let key = database_key(&path, "p1");
    let mut doc = read_document(&path).unwrap();
    doc.database.entries[1].secret_ciphertext =
        crypto::encrypt(CipherSuite::Aes256Ctr, &key, &[0xff, 0xfe]).unwrap();
    write_document(&path, &doc).unwrap();

    let session = Session::new();
    let opened = store.open(&session, &path, "p1").unwrap();

    assert_eq!(opened.entries.len(), 1);
    assert_eq!(opened.entries[0].title, "a");
    assert_eq!(opened.entries[0].secret.as_str(), "1");

    assert_eq!(opened.skipped.len(), 1);
    assert_eq!(opened.skipped[0].index, 1);
    assert_eq!(opened.skipped[0].title, "b");
    assert!(opened.skipped[0].reason.contains("UTF-8"));
}

#[test]
fn tampered_gcm_entry_is_skipped() {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let (_dir, store) = store_with(CipherSuite::Aes256Gcm);
    let (session, path) = open_vault(&store);
    store.add_entry(&session, NewEntry::new("a", "1")).unwrap();
    store.add_entry(&session, NewEntry::new("b", "2")).unwrap();
    store.close(&session);

    let mut doc = read_document(&path).unwrap();
    let mut raw = BASE64.decode(&doc.database.entries[0].secret_ciphertext).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    doc.database.entries[0].secret_ciphertext = BASE64.encode(&raw);
    write_document(&path, &doc).unwrap();

    let session = Session::new();
    let opened = store.open(&session, &path, "p1").unwrap();

    assert_eq!(opened.entries.len(), 1);
    assert_eq!(opened.entries[0].title, "b");
    assert_eq!(opened.entries[0].index, 1);
    assert_eq!(opened.skipped.len(), 1);
    assert_eq!(opened.skipped[0].index, 0);
}

#[test]
fn gcm_database_roundtrip() {
    let (_dir, store) = store_with(CipherSuite::Aes256Gcm);
    let (session, path) = open_vault(&store);

    store
        .add_entry(&session, NewEntry::new("email", "s3cr3t"))
        .unwrap();
    assert_eq!(
        read_document(&path).unwrap().header.crypto.cipher,
        "AES-256-GCM"
    );

    let opened = store.list_entries(&session).unwrap();
    assert_eq!(opened.cipher, CipherSuite::Aes256Gcm);
    assert_eq!(opened.entries[0].secret.as_str(), "s3cr3t");
}

#[test]
fn databases_lists_created_files() {
    let (_dir, store) = store();
    store.create("work", "p1").unwrap();
    store.create("home", "p1").unwrap();

    let names: Vec<_> = store
        .databases()
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["home.json", "work.json"]);
}
