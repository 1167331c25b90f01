//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    CookieIdentityResolver, Error, IdentityResolver, Ledger, auth::DEFAULT_COOKIE_DURATION,
    db::initialize, timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection, used directly for user accounts.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The category and transaction service, sharing `db_connection`.
    pub ledger: Ledger,

    /// Resolves the user making a request for protected routes.
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// Requests are authenticated with the private auth cookie encrypted with a key derived
    /// from `cookie_secret`.
    ///
    /// # Errors
    /// Returns an error if `local_timezone` is not a known timezone or if the database cannot
    /// be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        let cookie_key = create_cookie_key(cookie_secret);
        let identity = Arc::new(CookieIdentityResolver::new(cookie_key.clone()));

        Self::with_identity(db_connection, cookie_key, local_timezone, identity)
    }

    /// Create a new [AppState] that authenticates requests with `identity`.
    ///
    /// # Errors
    /// Returns an error if `local_timezone` is not a known timezone or if the database cannot
    /// be initialized.
    pub fn with_identity(
        db_connection: Connection,
        cookie_key: Key,
        local_timezone: &str,
        identity: Arc<dyn IdentityResolver>,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key,
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            ledger: Ledger::new(connection.clone(), local_timezone),
            db_connection: connection,
            identity,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for Ledger {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
