//! Registration of new user accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Email, Error, PasswordHash, UserID, ValidatedPassword, extract::ApiJson,
    user::create_user,
};

/// The state needed for reading and creating user accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The credentials for a new account.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    /// The email address to log in with.
    pub email: String,
    /// The raw password, validated for strength before hashing.
    pub password: String,
}

/// The public fields of a newly registered user.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    /// The ID of the new user.
    pub id: UserID,
    /// The normalised email address.
    pub email: Email,
    /// When the account was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A route handler for creating a new user.
///
/// Responds with 201 and the new user. The password hash is never returned.
///
/// # Errors
///
/// Returns an [Error::InvalidEmail], [Error::TooWeak] or [Error::DuplicateEmail] when the
/// credentials are rejected.
pub async fn register_user(
    State(state): State<AccountState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<(StatusCode, Json<RegisteredUser>), Error> {
    let email = Email::new(&payload.email)?;
    let password = ValidatedPassword::new(&payload.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        create_user(email, password_hash, &connection)?
    };

    tracing::info!("registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }),
    ))
}

#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        Email, endpoints,
        test_utils::{get_test_db_connection, insert_test_user},
        user::get_user_by_email,
    };

    use super::{AccountState, register_user};

    fn get_test_state() -> AccountState {
        AccountState {
            db_connection: Arc::new(Mutex::new(get_test_db_connection())),
        }
    }

    fn get_test_server(state: AccountState) -> TestServer {
        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_user_succeeds() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::USERS)
            .json(&json!({
                "email": "  Alice@Example.com",
                "password": "iamtestingwhethericancreateanewuser"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["email"], "alice@example.com");
        assert!(body["id"].as_i64().unwrap() > 0);
        assert!(body["createdAt"].is_string());
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_email(&Email::new("alice@example.com").unwrap(), &connection)
            .expect("Could not find registered user");
        assert!(
            user.password_hash
                .verify("iamtestingwhethericancreateanewuser")
                .unwrap()
        );
    }

    #[tokio::test]
    async fn create_user_fails_with_existing_email() {
        let state = get_test_state();
        insert_test_user(&state.db_connection.lock().unwrap(), "alice@example.com");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::USERS)
            .json(&json!({
                "email": "ALICE@example.com",
                "password": "averystrongandsecurepassword"
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "user with this email already exists");
    }

    #[tokio::test]
    async fn create_user_fails_with_invalid_email() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .json(&json!({
                "email": "not-an-email",
                "password": "averystrongandsecurepassword"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["message"], "please provide a valid email address");
    }

    #[tokio::test]
    async fn create_user_fails_with_short_password() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .json(&json!({ "email": "alice@example.com", "password": "abc" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("at least 6 characters")
        );
    }

    #[tokio::test]
    async fn create_user_fails_with_weak_password() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .json(&json!({ "email": "alice@example.com", "password": "password" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_user_fails_with_missing_fields() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .json(&json!({ "email": "alice@example.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
