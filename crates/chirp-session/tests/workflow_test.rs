//! End-to-end workflow tests: register, log in, send, view, and recovery
//! from store write failures, across both backends.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};

use chirp_session::{Session, SessionError};
use chirp_store::{Backend, JsonStore, RecordStore, SqlStore};
use chirp_types::FingerprintScheme;

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap()
}

#[test]
fn register_login_send_view_on_both_backends() {
    let dir = tempfile::tempdir().unwrap();
    let backends = [
        Backend::Json {
            dir: dir.path().join("json"),
        },
        Backend::Sqlite {
            path: dir.path().join("chirp.db"),
        },
    ];

    for backend in backends {
        let store = backend.open(FingerprintScheme::Sha256).unwrap();
        let mut session = Session::with_seed(store, 2024);

        session.register("u_1", "Passw0rd!", "+27831234567").unwrap();
        let account = session.login("u_1", "Passw0rd!").unwrap().clone();
        assert_eq!(account.username, "u_1");

        let err = session.login("u_1", "wrong").unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));

        // A failed login does not clear an earlier one.
        assert_eq!(session.current_user(), Some(&account));

        let sent = session
            .send_at("+27839868976", "Did you get the cake?", noon())
            .unwrap();
        assert!(sent.is_persisted(), "{backend:?}");

        let viewed = session.view_messages();
        assert_eq!(viewed.len(), 1);
        assert_eq!(viewed[0], sent.value);
        assert_eq!(session.store().load_records(), vec![sent.value.clone()]);
    }
}

#[test]
fn new_session_sees_previous_data_but_counts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chirp.db");

    {
        let store = SqlStore::open(&path, FingerprintScheme::Sha256).unwrap();
        let mut session = Session::with_seed(store, 1);
        session.register("ab_c", "Passw0rd!", "+27831234567").unwrap();
        session.login("ab_c", "Passw0rd!").unwrap();
        session.send_at("+27831234567", "one", noon()).unwrap();
        session.send_at("+27831234567", "two", noon()).unwrap();
        assert_eq!(session.sent_count(), 2);
    }

    let store = SqlStore::open(&path, FingerprintScheme::Sha256).unwrap();
    let mut session = Session::with_seed(store, 2);
    assert_eq!(session.sent_count(), 0);
    assert_eq!(session.view_messages().len(), 2);

    let err = session
        .register("ab_c", "Passw0rd!", "+27831234567")
        .unwrap_err();
    assert!(matches!(err, SessionError::DuplicateUsername(_)));
    assert!(session.login("ab_c", "Passw0rd!").is_ok());
}

#[test]
fn write_failure_keeps_memory_and_flush_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let store = JsonStore::open(&data, FingerprintScheme::Sha256).unwrap();
    let mut session = Session::with_seed(store, 9);
    session.register("u_1", "Passw0rd!", "+27831234567").unwrap();
    session.login("u_1", "Passw0rd!").unwrap();

    // Pull the directory out from under the store.
    fs::remove_dir_all(&data).unwrap();

    let sent = session.send_at("+27831234567", "offline", noon()).unwrap();
    assert!(!sent.is_persisted());
    assert!(session.is_dirty());
    assert_eq!(session.sent_count(), 1);
    assert_eq!(session.view_messages().len(), 1);

    let registered = session.register("v_2", "Passw0rd!", "+27830000000").unwrap();
    assert!(registered.write_error.is_some());
    assert_eq!(session.accounts().len(), 2);

    // Still failing: stays dirty.
    assert!(matches!(session.flush(), Err(SessionError::Store(_))));
    assert!(session.is_dirty());

    fs::create_dir_all(&data).unwrap();
    session.flush().unwrap();
    assert!(!session.is_dirty());

    let reopened = JsonStore::open(&data, FingerprintScheme::Sha256).unwrap();
    assert_eq!(reopened.load_accounts().len(), 2);
    assert_eq!(reopened.load_records(), vec![sent.value]);
}

#[test]
fn flush_without_changes_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path(), FingerprintScheme::Sha256).unwrap();
    let mut session = Session::open(store);

    session.flush().unwrap();
    assert!(!dir.path().join("users.json").exists());
    assert!(!dir.path().join("messages.json").exists());
}
