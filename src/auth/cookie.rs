//! Functions for storing the auth token in an encrypted private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID, auth::token::Token};

/// The name of the cookie holding the auth token.
pub const COOKIE_TOKEN: &str = "auth_token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(1);

/// Add an auth cookie to the cookie jar, indicating that `user_id` is logged in.
///
/// The token and the cookie both expire `duration` from now.
///
/// # Errors
///
/// Returns an [Error::TokenEncodingError] if the token could not be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        user_id,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::TokenEncodingError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete
/// the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the auth token from the cookie jar.
///
/// # Errors
///
/// Returns an [Error::Unauthorized] if the cookie is missing, cannot be decrypted or parsed,
/// or holds an expired token.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthorized)?;

    let token: Token = serde_json::from_str(cookie.value()).map_err(|error| {
        tracing::debug!("could not parse auth token: {error}");
        Error::Unauthorized
    })?;

    if token.is_expired_at(OffsetDateTime::now_utc()) {
        return Err(Error::Unauthorized);
    }

    Ok(token)
}
