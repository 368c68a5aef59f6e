use tracing::{debug, error, info, warn};

use chirp_store::{RecordStore, StoreError};
use chirp_types::Account;
use chirp_types::validation::{validate_cell_number, validate_password, validate_username};

use crate::{Recorded, Session, SessionError};

impl<S: RecordStore> Session<S> {
    /// Create an account. Fields are validated in prompt order (username,
    /// password, cell number) before the uniqueness check.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        cell_number: &str,
    ) -> Result<Recorded<Account>, SessionError> {
        validate_username(username)?;
        validate_password(password)?;
        validate_cell_number(cell_number)?;

        if self.accounts.iter().any(|a| a.username == username) {
            return Err(SessionError::DuplicateUsername(username.to_string()));
        }

        let account = Account::new(username, password, cell_number);

        let write_error = match self.store.insert_account(&account) {
            Ok(()) => None,
            Err(StoreError::DuplicateUsername(name)) => {
                // Registered in the store since we loaded it.
                warn!("Username {} already present in store", name);
                return Err(SessionError::DuplicateUsername(name));
            }
            Err(e) => {
                error!("Error saving users: {}", e);
                self.dirty.accounts = true;
                Some(e)
            }
        };

        self.accounts.push(account.clone());
        info!("Registered {}", account.username);

        Ok(Recorded {
            value: account,
            write_error,
        })
    }

    /// Log in with exact username and password. On failure the error does
    /// not reveal which of the two was wrong.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&Account, SessionError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.username == username && a.password == password)
            .cloned();

        match account {
            Some(account) => {
                info!("Welcome {}, it is great to see you again.", account.username);
                Ok(&*self.current.insert(account))
            }
            None => {
                debug!("Failed login attempt");
                Err(SessionError::InvalidCredentials)
            }
        }
    }

    /// End the current login, returning who was logged in.
    pub fn logout(&mut self) -> Option<Account> {
        let previous = self.current.take();
        if let Some(account) = &previous {
            info!("Logged out {}", account.username);
        }
        previous
    }
}
