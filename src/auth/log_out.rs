//! Log-out route handler that invalidates the auth cookie.

use axum::Json;
use axum_extra::extract::PrivateCookieJar;
use serde_json::{Value, json};

use crate::auth::cookie::invalidate_auth_cookie;

/// Invalidate the auth cookie.
///
/// Always succeeds, even if the client was not logged in.
pub async fn post_log_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    let jar = invalidate_auth_cookie(jar);

    (jar, Json(json!({ "message": "Logout successful" })))
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use serde_json::Value;
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{auth::COOKIE_TOKEN, endpoints};

    use super::post_log_out;

    fn get_test_server() -> TestServer {
        let key = Key::from(&Sha512::digest("42"));
        let app = Router::new()
            .route(endpoints::LOG_OUT, post(post_log_out))
            .with_state(key);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_out_expires_auth_cookie() {
        let server = get_test_server();

        let response = server.post(endpoints::LOG_OUT).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["message"], "Logout successful");
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}
