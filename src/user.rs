//! Code for creating the user table and fetching users from the database.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A trimmed, lowercased email address in a valid format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidEmail] if `raw_email` is not a valid email address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        let email = raw_email.trim().to_lowercase();

        if EmailAddress::is_valid(&email) {
            Ok(Self(email))
        } else {
            Err(Error::InvalidEmail)
        }
    }

    /// Create an email without validation.
    ///
    /// The caller should ensure that the string is a valid, lowercase email address.
    pub fn new_unchecked(email: &str) -> Self {
        Self(email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address, unique among users.
    pub email: Email,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if another user already registered `email`,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    email: Email,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (email, password, created_at) VALUES (?1, ?2, ?3)",
        (email.as_ref(), password_hash.as_ref(), created_at),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email,
        password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, ignoring case.
///
/// # Errors
///
/// This function will return an [Error::NotFound] if no user registered with `email`.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", email.as_ref())], map_row)
        .map_err(|error| error.into())
}

/// Replace the password hash of the user `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;
    let created_at = row.get(3)?;

    Ok(User {
        id: UserID::new(raw_id),
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at,
    })
}
