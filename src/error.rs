//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::kind::Kind;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid credential.
    #[error("unauthorized access")]
    Unauthorized,

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The category referenced by a new transaction does not exist or belongs
    /// to another user.
    #[error("category not found or doesn't belong to user")]
    CategoryNotFound,

    /// Tried to delete a category that does not exist for the user.
    #[error("category not found")]
    DeleteMissingCategory,

    /// Tried to delete a transaction that does not exist for the user.
    #[error("transaction not found")]
    DeleteMissingTransaction,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used as a transaction description.
    #[error("transaction description cannot be empty")]
    EmptyDescription,

    /// The kind was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid kind, expected \"income\" or \"expense\"")]
    InvalidKind(String),

    /// A zero or negative amount was used to create a transaction.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// An amount above [crate::amount::MAX_AMOUNT] was used to create a transaction.
    #[error("amount must not exceed 1000000000000000")]
    AmountTooLarge,

    /// The kind of a new transaction differs from the kind of its category.
    #[error("category type ({category}) doesn't match transaction type ({transaction})")]
    KindMismatch {
        /// The kind of the referenced category.
        category: Kind,
        /// The kind given for the transaction.
        transaction: Kind,
    },

    /// The start of a date range is after its end.
    #[error("the start date must be on or before the end date")]
    InvalidDateRange,

    /// The email address is not in a valid format.
    #[error("please provide a valid email address")]
    InvalidEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An account with the email address already exists.
    #[error("user with this email already exists")]
    DuplicateEmail,

    /// The category cannot be deleted while transactions still reference it.
    #[error("category is used by {0} transaction(s), delete those first")]
    CategoryInUse(usize),

    /// The request body could not be parsed.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request body is larger than [crate::logging::MAX_BODY_SIZE].
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// Summing transaction amounts exceeded the range of the decimal type.
    #[error("the total amount is too large to represent")]
    AmountOverflow,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token could not be serialized into the cookie.
    #[error("could not encode the auth token: {0}")]
    TokenEncodingError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

/// The coarse classes of [Error] exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No or invalid identity.
    Unauthorized,
    /// The referenced resource is absent or not owned by the caller.
    NotFound,
    /// The request was well-formed but its content was rejected.
    Validation,
    /// A fault on the server side.
    Internal,
}

impl Error {
    /// The class of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized | Error::InvalidCredentials => ErrorKind::Unauthorized,
            Error::NotFound
            | Error::CategoryNotFound
            | Error::DeleteMissingCategory
            | Error::DeleteMissingTransaction => ErrorKind::NotFound,
            Error::EmptyCategoryName
            | Error::EmptyDescription
            | Error::InvalidKind(_)
            | Error::NonPositiveAmount
            | Error::AmountTooLarge
            | Error::KindMismatch { .. }
            | Error::InvalidDateRange
            | Error::InvalidEmail
            | Error::TooWeak(_)
            | Error::DuplicateEmail
            | Error::CategoryInUse(_)
            | Error::InvalidBody(_)
            | Error::PayloadTooLarge => ErrorKind::Validation,
            Error::AmountOverflow
            | Error::HashingError(_)
            | Error::TokenEncodingError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => ErrorKind::Internal,
        }
    }

    /// The HTTP status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateEmail | Error::CategoryInUse(_) => StatusCode::CONFLICT,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            error => match error.kind() {
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body of an error response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// Generic message for faults whose details must stay on the server.
pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self.kind() {
            // Internal errors are not intended to be shown to the client.
            ErrorKind::Internal => {
                tracing::error!("An unexpected error occurred: {}", self);
                INTERNAL_ERROR_MESSAGE.to_owned()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
