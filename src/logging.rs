//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::Request,
    http::{HeaderMap, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest body, in bytes, that is buffered for logging.
///
/// Matches axum's default request body limit. Larger requests are rejected with
/// [Error::PayloadTooLarge].
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// The fields whose values are never logged.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

const REDACTED_VALUE: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in JSON and form bodies are redacted.
///
/// Requests with a body over [MAX_BODY_SIZE] bytes are rejected. Responses that may exceed
/// it are passed through without logging their body.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::debug!("could not read request body: {error}");
            return Error::PayloadTooLarge.into_response();
        }
    };

    log_request(&parts, &redact_body(&parts.headers, &body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let max_size = MAX_BODY_SIZE as u64;
    if body
        .size_hint()
        .upper()
        .is_none_or(|upper| upper > max_size)
    {
        log_response(&parts, "<body not logged>");
        return Response::from_parts(parts, body);
    }

    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return parts.status.into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The body as text with the values of [REDACTED_FIELDS] replaced.
fn redact_body(headers: &HeaderMap, body: &Bytes) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        match serde_json::from_slice::<Value>(body) {
            Ok(mut json) => {
                redact_json(&mut json);
                json.to_string()
            }
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        REDACTED_FIELDS
            .iter()
            .fold(String::from_utf8_lossy(body).into_owned(), |text, field| {
                redact_form_field(&text, field)
            })
    } else {
        String::from_utf8_lossy(body).into_owned()
    }
}

fn redact_json(json: &mut Value) {
    match json {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *value = Value::String(REDACTED_VALUE.to_owned());
                } else {
                    redact_json(value);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_json),
        _ => {}
    }
}

fn redact_form_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{key}={REDACTED_VALUE}"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The longest prefix of `text` that fits in [LOG_BODY_LENGTH_LIMIT] bytes without splitting
/// a character.
fn truncate(text: &str) -> &str {
    let end = text
        .char_indices()
        .map(|(index, c)| index + c.len_utf8())
        .take_while(|&end| end <= LOG_BODY_LENGTH_LIMIT)
        .last()
        .unwrap_or(0);

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request: {parts:#?}\nbody: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Sending response: {}\nbody: {}...", parts.status, truncate(body));
        tracing::debug!("Full response: {parts:#?}\nbody: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}
