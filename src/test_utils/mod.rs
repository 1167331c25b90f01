#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Email, PasswordHash, UserID, auth::COOKIE_TOKEN, build_router, create_user,
    db::initialize, endpoints,
};

/// The password of every user created with [insert_test_user].
pub(crate) const TEST_PASSWORD: &str = "correct horse battery staple";

/// An in-memory database with all of the tables created.
pub(crate) fn get_test_db_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Register `email` with [TEST_PASSWORD], hashed with the cheapest bcrypt cost.
pub(crate) fn insert_test_user(connection: &Connection, email: &str) -> UserID {
    let password_hash =
        PasswordHash::from_raw_password(TEST_PASSWORD, 4).expect("Could not hash password");

    create_user(
        Email::new(email).expect("Invalid test email"),
        password_hash,
        connection,
    )
    .expect("Could not create test user")
    .id
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection, "42", "Etc/UTC").expect("Could not create app state")
}

/// A server running the full router over `state`.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).expect("Could not create test server.")
}

/// Log in as `email` and return the auth cookie.
pub(crate) async fn log_in(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_TOKEN)
}

/// Register `email` in `state` and return the user ID with a valid auth cookie.
pub(crate) async fn logged_in_user(
    server: &TestServer,
    state: &AppState,
    email: &str,
) -> (UserID, Cookie<'static>) {
    let user_id = {
        let connection = state
            .db_connection
            .lock()
            .expect("Could not acquire database lock");
        insert_test_user(&connection, email)
    };

    (user_id, log_in(server, email).await)
}
