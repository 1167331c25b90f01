//! Route handlers for the income and expense totals.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error, Ledger, UserID,
    extract::ApiQuery,
    ledger::DEFAULT_SUMMARY_MONTHS,
    stats::{Stats, Summary},
    transaction::DateRangeParams,
};

/// Query parameters for the summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    /// How many of the most recent months to break down.
    pub months: Option<usize>,
}

/// A route handler that returns the total income, total expenses and balance of the logged in
/// user, optionally bounded by the `from` and `to` query parameters.
pub async fn get_stats_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(params): ApiQuery<DateRangeParams>,
) -> Result<Json<Stats>, Error> {
    let date_range = params.date_range()?;

    ledger.get_stats(user_id, date_range.as_ref()).map(Json)
}

/// A route handler that returns the totals with per category and per month breakdowns.
pub async fn get_summary_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<Json<Summary>, Error> {
    let months = params.months.unwrap_or(DEFAULT_SUMMARY_MONTHS);

    ledger.get_summary(user_id, months).map(Json)
}
