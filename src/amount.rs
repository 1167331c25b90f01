//! A strictly positive, currency-agnostic transaction amount.
//!
//! Amounts use [Decimal] so sums are exact and do not depend on the order
//! transactions are added in.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The largest amount a single transaction may carry, 10^15.
///
/// Keeps the totals over any realistic number of transactions well inside the
/// range of [Decimal].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A transaction amount greater than zero and at most [MAX_AMOUNT].
///
/// Serialized as a decimal string, e.g. `"12.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NonPositiveAmount] if `value` is zero or negative, or an
    /// [Error::AmountTooLarge] if `value` is greater than [MAX_AMOUNT].
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            Err(Error::NonPositiveAmount)
        } else if value > MAX_AMOUNT {
            Err(Error::AmountTooLarge)
        } else {
            Ok(Self(value.normalize()))
        }
    }

    /// The amount as a decimal number.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|error| Error::InvalidBody(format!("invalid amount \"{s}\": {error}")))?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Stored as TEXT so no precision is lost to SQLite's REAL type.
impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        let decimal =
            Decimal::from_str(text).map_err(|error| FromSqlError::Other(Box::new(error)))?;

        Ok(Self(decimal))
    }
}
