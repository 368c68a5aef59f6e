//! Contract tests run against both backends.
//!
//! Each scenario opens a fresh store in a temp directory through
//! `Backend::open`, so the boxed trait object is what gets exercised.

use std::fs;
use std::path::Path;

use chirp_store::json::{MESSAGES_FILE, USERS_FILE};
use chirp_store::{Backend, RecordStore, StoreError};
use chirp_types::{Account, DispatchRecord, FingerprintScheme};

fn backends(dir: &Path) -> [Backend; 2] {
    [
        Backend::Json {
            dir: dir.join("json"),
        },
        Backend::Sqlite {
            path: dir.join("chirp.db"),
        },
    ]
}

fn sample_accounts() -> Vec<Account> {
    vec![
        Account::new("ab_c", "Passw0rd!", "+27831234567"),
        Account::new("u_1", "Secr3t!xy", "+278312345678"),
    ]
}

fn sample_records() -> Vec<DispatchRecord> {
    vec![
        DispatchRecord::from_parts(
            "0012345678".into(),
            "+27831234567".into(),
            "Hi, are we still on for dinner tonight?".into(),
            "5d1f0e9a7c2b".into(),
            "2024-03-01".into(),
            "18:02:11".into(),
        ),
        DispatchRecord::from_parts(
            "0987654321".into(),
            "+27830000000".into(),
            "quotes \" and unicode ✓".into(),
            "HASH_ERR".into(),
            "2024-03-02".into(),
            "07:00:00".into(),
        ),
    ]
}

#[test]
fn saved_lists_load_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        let store = backend.open(FingerprintScheme::Sha256).unwrap();
        store.save_accounts(&sample_accounts()).unwrap();
        store.save_records(&sample_records()).unwrap();

        assert_eq!(store.load_accounts(), sample_accounts(), "{backend:?}");
        assert_eq!(store.load_records(), sample_records(), "{backend:?}");
    }
}

#[test]
fn saving_what_was_loaded_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        let store = backend.open(FingerprintScheme::Sha256).unwrap();
        store.save_accounts(&sample_accounts()).unwrap();
        store.save_records(&sample_records()).unwrap();

        store.save_accounts(&store.load_accounts()).unwrap();
        store.save_records(&store.load_records()).unwrap();

        assert_eq!(store.load_accounts(), sample_accounts(), "{backend:?}");
        assert_eq!(store.load_records(), sample_records(), "{backend:?}");
    }
}

#[test]
fn json_round_trip_is_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Backend::Json {
        dir: dir.path().to_path_buf(),
    };
    let store = backend.open(FingerprintScheme::Sha256).unwrap();
    store.save_accounts(&sample_accounts()).unwrap();
    store.save_records(&sample_records()).unwrap();

    let users_before = fs::read(dir.path().join(USERS_FILE)).unwrap();
    let messages_before = fs::read(dir.path().join(MESSAGES_FILE)).unwrap();

    store.save_accounts(&store.load_accounts()).unwrap();
    store.save_records(&store.load_records()).unwrap();

    assert_eq!(fs::read(dir.path().join(USERS_FILE)).unwrap(), users_before);
    assert_eq!(fs::read(dir.path().join(MESSAGES_FILE)).unwrap(), messages_before);
}

#[test]
fn duplicate_registration_leaves_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        let store = backend.open(FingerprintScheme::Sha256).unwrap();
        store
            .insert_account(&Account::new("ab_c", "Passw0rd!", "+27831234567"))
            .unwrap();
        let before = store.load_accounts();

        let err = store
            .insert_account(&Account::new("ab_c", "Diff3rent!", "+27839999999"))
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateUsername(_)), "{backend:?}");
        assert_eq!(store.load_accounts(), before, "{backend:?}");
    }
}

#[test]
fn inserts_append_in_order() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        let store = backend.open(FingerprintScheme::Sha256).unwrap();
        for account in sample_accounts() {
            store.insert_account(&account).unwrap();
        }
        for record in sample_records() {
            store.insert_record(&record).unwrap();
        }

        assert_eq!(store.load_accounts(), sample_accounts(), "{backend:?}");
        assert_eq!(store.load_records(), sample_records(), "{backend:?}");
    }
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        {
            let store = backend.open(FingerprintScheme::Shorthand).unwrap();
            store.insert_account(&sample_accounts()[0]).unwrap();
        }
        let store = backend.open(FingerprintScheme::Shorthand).unwrap();
        assert_eq!(store.fingerprint_scheme(), FingerprintScheme::Shorthand);
        assert_eq!(store.load_accounts(), vec![sample_accounts()[0].clone()]);
    }
}

#[test]
fn scheme_tag_blocks_mixing_formats() {
    let dir = tempfile::tempdir().unwrap();
    for backend in backends(dir.path()) {
        backend.open(FingerprintScheme::Shorthand).unwrap();
        let result = backend.open(FingerprintScheme::Sha256);
        assert!(
            matches!(result, Err(StoreError::SchemeMismatch { .. })),
            "{backend:?}"
        );
    }
}
