use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use chirp_store::RecordStore;
use chirp_types::DispatchRecord;
use chirp_types::validation::{validate_message_body, validate_recipient_cell};

use crate::{Recorded, Session, SessionError};

impl<S: RecordStore> Session<S> {
    /// Send a message as the logged-in user, stamped with the local time.
    pub fn send(
        &mut self,
        recipient_cell: &str,
        body: &str,
    ) -> Result<Recorded<DispatchRecord>, SessionError> {
        self.send_at(recipient_cell, body, Local::now().naive_local())
    }

    /// Send with an explicit capture time.
    pub fn send_at(
        &mut self,
        recipient_cell: &str,
        body: &str,
        captured_at: NaiveDateTime,
    ) -> Result<Recorded<DispatchRecord>, SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NotLoggedIn);
        }
        validate_recipient_cell(recipient_cell)?;
        validate_message_body(body)?;

        let record = self.generator.stamp(recipient_cell, body, captured_at);

        // IDs are not deduplicated; a repeat is only reported.
        if self.records.iter().any(|r| r.id() == record.id()) {
            warn!("Message ID {} is already in use by another message", record.id());
        }

        let write_error = match self.store.insert_record(&record) {
            Ok(()) => None,
            Err(e) => {
                error!("Error saving messages: {}", e);
                self.dirty.records = true;
                Some(e)
            }
        };

        self.records.push(record.clone());
        self.sent_count += 1;
        info!("Message {} sent to {}", record.id(), record.recipient_cell());

        Ok(Recorded {
            value: record,
            write_error,
        })
    }

    /// Every stored message, oldest first.
    pub fn view_messages(&self) -> &[DispatchRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_store::JsonStore;
    use chirp_types::{FingerprintScheme, ValidationError};
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn logged_in(dir: &tempfile::TempDir, scheme: FingerprintScheme) -> Session<JsonStore> {
        let store = JsonStore::open(dir.path(), scheme).unwrap();
        let mut s = Session::with_seed(store, 3);
        s.register("u_1", "Passw0rd!", "+27831234567").unwrap();
        s.login("u_1", "Passw0rd!").unwrap();
        s
    }

    #[test]
    fn send_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path(), FingerprintScheme::Sha256).unwrap();
        let mut s = Session::with_seed(store, 3);

        let err = s.send_at("+27831234567", "hello", at()).unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
        assert_eq!(s.sent_count(), 0);
    }

    #[test]
    fn send_validates_recipient_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = logged_in(&dir, FingerprintScheme::Sha256);

        let err = s.send_at("0831234567", "hello", at()).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::RecipientCell)));

        let err = s.send_at("+27831234567", &"z".repeat(251), at()).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::MessageBody)));

        assert_eq!(s.sent_count(), 0);
        assert!(s.view_messages().is_empty());
    }

    #[test]
    fn send_stamps_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = logged_in(&dir, FingerprintScheme::Sha256);

        let sent = s.send_at("+27831234567", "hello", at()).unwrap();
        assert!(sent.is_persisted());
        assert_eq!(sent.value.date(), "2024-03-01");
        assert_eq!(sent.value.time(), "12:00:00");
        assert_eq!(sent.value.fingerprint().len(), 12);

        s.send_at("+27831234567", "again", at()).unwrap();
        assert_eq!(s.sent_count(), 2);
        assert_eq!(s.view_messages().len(), 2);
        assert_eq!(s.store().load_records().len(), 2);
    }

    #[test]
    fn shorthand_store_gets_shorthand_fingerprints() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = logged_in(&dir, FingerprintScheme::Shorthand);

        let sent = s.send_at("+27831234567", "see you", at()).unwrap();
        let prefix = &sent.value.id()[..2];
        assert_eq!(sent.value.fingerprint(), format!("{prefix}:SU"));
    }
}
