//! Route handlers for listing, recording and deleting transactions.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error, Ledger, TransactionId, UserID,
    extract::{ApiJson, ApiPath, ApiQuery},
    transaction::{
        TransactionListParams, TransactionPayload, TransactionQuery, TransactionWithCategory,
    },
};

/// A route handler that returns the transactions of the logged in user, most recent first.
///
/// Accepts the optional query parameters `from` and `to` (inclusive, "YYYY-MM-DD") and
/// `limit`.
pub async fn get_transactions_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(params): ApiQuery<TransactionListParams>,
) -> Result<Json<Vec<TransactionWithCategory>>, Error> {
    let query = TransactionQuery::try_from(params)?;

    ledger.list_transactions(user_id, &query).map(Json)
}

/// A route handler for recording a new transaction.
///
/// Responds with 201 and the new transaction joined with its category.
pub async fn create_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiJson(payload): ApiJson<TransactionPayload>,
) -> Result<(StatusCode, Json<TransactionWithCategory>), Error> {
    let new_transaction = payload.try_into()?;

    let transaction = ledger.create_transaction(user_id, new_transaction)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for deleting a transaction, responds with 204 on success.
pub async fn delete_transaction_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<StatusCode, Error> {
    ledger.delete_transaction(user_id, transaction_id)?;

    Ok(StatusCode::NO_CONTENT)
}
