//! Route handler for log-in requests.
//! The cookie module handles the lower level token and cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Duration;

use crate::{
    AppState, Email, Error, auth::cookie::set_auth_cookie, extract::ApiJson,
    user::get_user_by_email,
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials entered at log-in.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the hash in the database.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInPayload {
    /// The email address the user registered with.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set and a confirmation message returned.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] if the email is unknown or the password is wrong.
/// The two cases are indistinguishable to the client.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    ApiJson(payload): ApiJson<LogInPayload>,
) -> Result<(PrivateCookieJar, Json<Value>), Error> {
    let email = Email::new(&payload.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user.password_hash.verify(&payload.password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        tracing::debug!("rejected log-in for user {} with a wrong password", user.id);
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((jar, Json(json!({ "message": "Login successful" }))))
}
