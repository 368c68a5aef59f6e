use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use chirp_session::{Session, SessionError};
use chirp_store::RecordStore;
use chirp_types::DispatchRecord;
use chirp_types::validation::{
    ValidationError, validate_cell_number, validate_message_body, validate_password,
    validate_recipient_cell, validate_username,
};

use crate::console::Console;

const MAIN_MENU: &str = "Main Menu:\n1. Register\n2. Login\n3. Exit\nEnter your choice (1-3):";
const USER_MENU: &str =
    "User Menu:\n1. Send Message(s)\n2. View Messages\n3. Logout\nEnter your choice (1-3):";
const INVALID_CHOICE: &str = "Invalid choice. Please enter 1, 2, or 3.";
const SEPARATOR: &str = "--------------------------------------------------";

/// Drive the main menu until the user exits or input ends, then flush any
/// unsaved changes. The flush also runs when the console itself fails.
pub fn run<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let outcome = main_menu(session, console);

    let saved = match session.flush() {
        Ok(()) => Ok(()),
        Err(e) => console
            .show(&format!("Error saving data: {e}"))
            .map_err(anyhow::Error::from),
    };
    outcome.and(saved)
}

fn main_menu<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    while let Some(choice) = console.prompt(MAIN_MENU)? {
        match choice.trim() {
            "1" => register(session, console)?,
            "2" => {
                if login(session, console)? {
                    user_menu(session, console)?;
                }
            }
            "3" => {
                console.show("Goodbye!")?;
                break;
            }
            _ => console.show(INVALID_CHOICE)?,
        }
    }
    Ok(())
}

/// Ask until `check` accepts the answer. `None` means the user cancelled.
fn ask_valid<R, W>(
    console: &mut Console<R, W>,
    question: &str,
    accepted: &str,
    check: fn(&str) -> Result<(), ValidationError>,
) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(answer) = console.prompt(question)? else {
            return Ok(None);
        };
        match check(&answer) {
            Ok(()) => {
                console.show(accepted)?;
                return Ok(Some(answer));
            }
            Err(e) => console.show(&e.to_string())?,
        }
    }
}

fn register<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let Some(username) = ask_valid(
        console,
        "Enter username:",
        "Username successfully captured.",
        validate_username,
    )?
    else {
        return Ok(());
    };
    let Some(password) = ask_valid(
        console,
        "Enter password:",
        "Password successfully captured.",
        validate_password,
    )?
    else {
        return Ok(());
    };
    let Some(cell) = ask_valid(
        console,
        "Enter cell number (e.g. +27839868976):",
        "Cell phone number successfully captured.",
        validate_cell_number,
    )?
    else {
        return Ok(());
    };

    match session.register(&username, &password, &cell) {
        Ok(recorded) => {
            if let Some(e) = recorded.write_error {
                console.show(&format!("Error saving users: {e}"))?;
            }
            console.show("Registration successful! You can now log in.")?;
        }
        Err(e) => console.show(&e.to_string())?,
    }
    Ok(())
}

fn login<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<bool>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let Some(username) = console.prompt("Login - Enter username:")? else {
        return Ok(false);
    };
    let Some(password) = console.prompt("Login - Enter password:")? else {
        return Ok(false);
    };

    match session.login(&username, &password) {
        Ok(account) => {
            let welcome = format!(
                "Welcome {}, it is great to see you again.",
                account.username
            );
            console.show(&welcome)?;
            Ok(true)
        }
        Err(e) => {
            console.show(&e.to_string())?;
            Ok(false)
        }
    }
}

fn user_menu<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(choice) = console.prompt(USER_MENU)? else {
            session.logout();
            return Ok(());
        };
        match choice.trim() {
            "1" => send_messages(session, console)?,
            "2" => console.show(&render_records(session.view_messages()))?,
            "3" => {
                session.logout();
                console.show("Logged out.")?;
                return Ok(());
            }
            _ => console.show(INVALID_CHOICE)?,
        }
    }
}

fn send_messages<S, R, W>(session: &mut Session<S>, console: &mut Console<R, W>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    let count = loop {
        let Some(answer) = console.prompt("How many messages do you want to send?")? else {
            return Ok(());
        };
        match answer.trim().parse::<u32>() {
            Ok(n) if n > 0 => break n,
            _ => continue,
        }
    };

    for _ in 0..count {
        let Some(recipient) = ask_valid(
            console,
            "Enter recipient cell number (e.g. +27839868976):",
            "Cell phone number successfully captured.",
            validate_recipient_cell,
        )?
        else {
            return Ok(());
        };
        let Some(body) = ask_valid(
            console,
            "Enter message (max 250 chars):",
            "Message ready to send.",
            validate_message_body,
        )?
        else {
            return Ok(());
        };

        match session.send(&recipient, &body) {
            Ok(sent) => {
                console.show(&render_record(&sent.value))?;
                if let Some(e) = sent.write_error {
                    console.show(&format!("Error saving messages: {e}"))?;
                }
            }
            Err(SessionError::NotLoggedIn) => {
                warn!("Send attempted without a logged-in user");
                return Ok(());
            }
            Err(e) => console.show(&e.to_string())?,
        }
    }

    let saved = if session.is_dirty() {
        "Some messages are not saved yet; they will be retried on exit."
    } else {
        "Messages saved."
    };
    console.show(&format!(
        "Total messages sent: {}\n{}",
        session.sent_count(),
        saved
    ))?;
    Ok(())
}

fn render_record(record: &DispatchRecord) -> String {
    format!(
        "Message ID: {}\nRecipient: {}\nMessage: {}\nMessage Hash: {}\nDate: {}\nTime: {}",
        record.id(),
        record.recipient_cell(),
        record.body(),
        record.fingerprint(),
        record.date(),
        record.time(),
    )
}

fn render_records(records: &[DispatchRecord]) -> String {
    if records.is_empty() {
        return "No messages found.".to_string();
    }

    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "Message ID: {}\nRecipient: {}\nMessage: {}\nHash: {}\nDate: {}\nTime: {}\n{}\n",
            record.id(),
            record.recipient_cell(),
            record.body(),
            record.fingerprint(),
            record.date(),
            record.time(),
            SEPARATOR,
        ));
    }
    out
}
