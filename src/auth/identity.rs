//! Resolves the identity of the user making a request.

use axum::http::HeaderMap;
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{Error, UserID, auth::cookie::get_token_from_cookies};

/// Turns the credentials attached to a request into the ID of the user making the request.
///
/// Implementations must fail closed: anything other than a valid credential is an
/// [Error::Unauthorized].
pub trait IdentityResolver: Send + Sync {
    /// Resolve the user from the request `headers`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Unauthorized] if the headers carry no valid credential.
    fn resolve(&self, headers: &HeaderMap) -> Result<UserID, Error>;
}

/// Resolves users from the encrypted auth cookie set on log in.
#[derive(Debug, Clone)]
pub struct CookieIdentityResolver {
    cookie_key: Key,
}

impl CookieIdentityResolver {
    /// Create a resolver that decrypts cookies with `cookie_key`.
    pub fn new(cookie_key: Key) -> Self {
        Self { cookie_key }
    }
}

impl IdentityResolver for CookieIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<UserID, Error> {
        let jar = PrivateCookieJar::from_headers(headers, self.cookie_key.clone());

        get_token_from_cookies(&jar).map(|token| token.user_id)
    }
}
