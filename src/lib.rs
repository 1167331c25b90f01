//! Ledger is a web service for tracking personal income and expenses.
//!
//! This library provides a JSON REST API for managing a user's categories and
//! transactions, and for reading aggregate statistics over them.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod amount;
mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod extract;
mod kind;
mod ledger;
mod logging;
mod password;
mod routing;
mod stats;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use amount::{Amount, MAX_AMOUNT};
pub use app_state::AppState;
pub use auth::{CookieIdentityResolver, IdentityResolver};
pub use category::{Category, CategoryName, NewCategory};
pub use database_id::{CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorKind};
pub use kind::Kind;
pub use ledger::Ledger;
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_BODY_SIZE, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use stats::{CategoryTotal, MonthlyTotals, Period, Stats, Summary, by_category, by_month};
pub use timezone::get_local_offset;
pub use transaction::{NewTransaction, Transaction, TransactionQuery, TransactionWithCategory};
pub use user::{Email, User, UserID, create_user, get_user_by_email, update_password};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
