//! Database queries for aggregate stats.

use std::ops::RangeInclusive;

use rusqlite::{Connection, named_params};
use rust_decimal::Decimal;
use time::Date;

use crate::{Amount, Error, Kind, Stats, UserID, transaction::range_bounds};

/// Compute the income, expense and balance totals of `user_id`, optionally only over
/// transactions dated within `date_range`.
///
/// The amounts are read in a single query and summed exactly in memory.
///
/// # Errors
///
/// Returns an [Error::AmountOverflow] if a total does not fit in a [Decimal], or an
/// [Error::SqlError] if the query failed.
pub fn get_stats(
    user_id: UserID,
    date_range: Option<&RangeInclusive<Date>>,
    connection: &Connection,
) -> Result<Stats, Error> {
    let (start, end) = range_bounds(date_range);

    let amounts = connection
        .prepare(
            "SELECT kind, amount FROM \"transaction\"
            WHERE user_id = :user_id
                AND (:start IS NULL OR date >= :start)
                AND (:end IS NULL OR date <= :end)",
        )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
            },
            |row| {
                let kind: Kind = row.get(0)?;
                let amount: Amount = row.get(1)?;
                Ok((kind, amount.value()))
            },
        )?
        .collect::<Result<Vec<(Kind, Decimal)>, rusqlite::Error>>()?;

    Stats::from_amounts(amounts)
}
