//! Core transaction domain types.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Amount, CategoryId, Error, Kind, TransactionId, UserID, category::CategorySummary};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A record of money received or spent by a user.
///
/// Transactions are never modified after they are created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// A short text describing the transaction.
    pub description: String,
    /// How much money moved. Always positive, the direction is given by `kind`.
    pub amount: Amount,
    /// Whether money was received or spent. Always equal to the category's kind.
    pub kind: Kind,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction with the display fields of its category attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    /// The stored transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category the transaction belongs to.
    pub category: CategorySummary,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short, non-empty text describing the transaction.
    pub description: String,
    /// How much money moved.
    pub amount: Amount,
    /// Whether money was received or spent.
    pub kind: Kind,
    /// The category the transaction should be filed under.
    pub category_id: CategoryId,
    /// When the transaction happened, `None` means today.
    pub date: Option<Date>,
}

impl NewTransaction {
    /// Create a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyDescription] if `description` is empty or only whitespace.
    pub fn new(
        description: &str,
        amount: Amount,
        kind: Kind,
        category_id: CategoryId,
        date: Option<Date>,
    ) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(Self {
            description: description.to_owned(),
            amount,
            kind,
            category_id,
            date,
        })
    }
}

/// The request body for creating a transaction.
///
/// Any `userId` field in the body is ignored, the owner is always the authenticated user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    /// A short text describing the transaction.
    pub description: String,
    /// A JSON number or decimal string, read without a round trip through `f64`.
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub amount: Decimal,
    /// "income" or "expense".
    #[serde(alias = "type")]
    pub kind: String,
    /// The category the transaction should be filed under.
    pub category_id: CategoryId,
    /// An optional date formatted as "YYYY-MM-DD".
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

impl TryFrom<TransactionPayload> for NewTransaction {
    type Error = Error;

    fn try_from(payload: TransactionPayload) -> Result<Self, Self::Error> {
        let amount = Amount::new(payload.amount)?;
        let kind = payload.kind.parse()?;

        NewTransaction::new(
            &payload.description,
            amount,
            kind,
            payload.category_id,
            payload.date,
        )
    }
}

/// Defines how transactions should be fetched from [crate::Ledger::list_transactions].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Include transactions within this inclusive date range.
    pub date_range: Option<RangeInclusive<Date>>,
    /// Return at most this many of the most recently recorded transactions.
    pub limit: Option<u64>,
}

/// Build an inclusive date range from optional bounds.
///
/// A missing bound leaves that side of the range open.
///
/// # Errors
///
/// Returns an [Error::InvalidDateRange] if `from` is after `to`.
fn date_range(
    from: Option<Date>,
    to: Option<Date>,
) -> Result<Option<RangeInclusive<Date>>, Error> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange),
        (from, to) => Ok(Some(from.unwrap_or(Date::MIN)..=to.unwrap_or(Date::MAX))),
    }
}

/// Query parameters for listing transactions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListParams {
    /// The earliest date to include.
    #[serde(default, with = "iso_date::option")]
    pub from: Option<Date>,
    /// The latest date to include.
    #[serde(default, with = "iso_date::option")]
    pub to: Option<Date>,
    /// The maximum number of transactions to return.
    pub limit: Option<u64>,
}

impl TryFrom<TransactionListParams> for TransactionQuery {
    type Error = Error;

    fn try_from(params: TransactionListParams) -> Result<Self, Self::Error> {
        Ok(TransactionQuery {
            date_range: date_range(params.from, params.to)?,
            limit: params.limit,
        })
    }
}

/// Query parameters bounding a request by transaction date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeParams {
    /// The earliest date to include.
    #[serde(default, with = "iso_date::option")]
    pub from: Option<Date>,
    /// The latest date to include.
    #[serde(default, with = "iso_date::option")]
    pub to: Option<Date>,
}

impl DateRangeParams {
    /// The inclusive date range, `None` if neither bound was given.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidDateRange] if `from` is after `to`.
    pub fn date_range(&self) -> Result<Option<RangeInclusive<Date>>, Error> {
        date_range(self.from, self.to)
    }
}
