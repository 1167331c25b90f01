//! Aggregation of transactions into totals.
//!
//! All sums use exact decimal arithmetic, so a total does not depend on the order in which
//! transactions are added up.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use time::Date;

use crate::{CategoryId, Error, Kind, TransactionWithCategory, category::CategorySummary};

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// The sum of all income.
    pub total_income: Decimal,
    /// The sum of all expenses.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
}

impl Stats {
    /// Compute the stats for `(kind, amount)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an [Error::AmountOverflow] if a total does not fit in a [Decimal].
    pub fn from_amounts(
        amounts: impl IntoIterator<Item = (Kind, Decimal)>,
    ) -> Result<Self, Error> {
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;

        for (kind, amount) in amounts {
            match kind {
                Kind::Income => total_income = checked_add(total_income, amount)?,
                Kind::Expense => total_expenses = checked_add(total_expenses, amount)?,
            }
        }

        let balance = total_income
            .checked_sub(total_expenses)
            .ok_or(Error::AmountOverflow)?;

        Ok(Self {
            total_income,
            total_expenses,
            balance,
        })
    }
}

fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal, Error> {
    total.checked_add(amount).ok_or(Error::AmountOverflow)
}

/// The total of one kind of transaction filed under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category the total belongs to.
    pub category: CategorySummary,
    /// The sum of the category's transaction amounts.
    pub total: Decimal,
    /// How many transactions were summed.
    pub transaction_count: usize,
}

/// Sum the transactions of `kind` per category.
///
/// The result is sorted by total, largest first, with ties broken by category name.
///
/// # Errors
///
/// Returns an [Error::AmountOverflow] if a total does not fit in a [Decimal].
pub fn by_category(
    transactions: &[TransactionWithCategory],
    kind: Kind,
) -> Result<Vec<CategoryTotal>, Error> {
    let mut totals: HashMap<CategoryId, CategoryTotal> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction.kind == kind)
    {
        let entry = totals
            .entry(transaction.category.id)
            .or_insert_with(|| CategoryTotal {
                category: transaction.category.clone(),
                total: Decimal::ZERO,
                transaction_count: 0,
            });

        entry.total = checked_add(entry.total, transaction.transaction.amount.value())?;
        entry.transaction_count += 1;
    }

    let mut totals: Vec<CategoryTotal> = totals.into_values().collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.name.as_ref().cmp(b.category.name.as_ref()))
            .then_with(|| a.category.id.cmp(&b.category.id))
    });

    Ok(totals)
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    /// The calendar year.
    pub year: i32,
    /// The month of the year, 1 to 12.
    pub month: u8,
}

impl From<Date> for Period {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    /// The month, serialized as "YYYY-MM".
    pub period: Period,
    /// The sum of the month's income.
    pub income: Decimal,
    /// The sum of the month's expenses.
    pub expense: Decimal,
}

/// Sum income and expenses per calendar month of the transaction date.
///
/// The result is in chronological order and keeps only the `limit` most recent months that
/// have transactions.
///
/// # Errors
///
/// Returns an [Error::AmountOverflow] if a total does not fit in a [Decimal].
pub fn by_month(
    transactions: &[TransactionWithCategory],
    limit: usize,
) -> Result<Vec<MonthlyTotals>, Error> {
    let mut totals: BTreeMap<Period, MonthlyTotals> = BTreeMap::new();

    for transaction in transactions {
        let transaction = &transaction.transaction;
        let period = Period::from(transaction.date);
        let entry = totals.entry(period).or_insert(MonthlyTotals {
            period,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        });

        let amount = transaction.amount.value();
        match transaction.kind {
            Kind::Income => entry.income = checked_add(entry.income, amount)?,
            Kind::Expense => entry.expense = checked_add(entry.expense, amount)?,
        }
    }

    let skip = totals.len().saturating_sub(limit);

    Ok(totals.into_values().skip(skip).collect())
}

/// The data behind a dashboard or report: overall stats with per category and per month
/// breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Totals over all of the user's transactions.
    pub stats: Stats,
    /// Expense totals per category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Income totals per category, largest first.
    pub income_by_category: Vec<CategoryTotal>,
    /// Totals for the most recent months, oldest first.
    pub monthly: Vec<MonthlyTotals>,
}

impl Summary {
    /// Build a summary from `stats` and the transactions the stats were computed over.
    ///
    /// # Errors
    ///
    /// Returns an [Error::AmountOverflow] if a total does not fit in a [Decimal].
    pub fn new(
        stats: Stats,
        transactions: &[TransactionWithCategory],
        months: usize,
    ) -> Result<Self, Error> {
        Ok(Self {
            stats,
            expenses_by_category: by_category(transactions, Kind::Expense)?,
            income_by_category: by_category(transactions, Kind::Income)?,
            monthly: by_month(transactions, months)?,
        })
    }
}


#[cfg(test)]
mod breakdown_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        Amount, CategoryName, Kind, Transaction, TransactionWithCategory, UserID,
        category::CategorySummary,
    };

    use super::{Period, by_category, by_month};

    fn category(id: i64, name: &str, kind: Kind) -> CategorySummary {
        CategorySummary {
            id,
            name: CategoryName::new_unchecked(name),
            kind,
            icon: "💰".to_owned(),
            color: "from-blue-500 to-blue-600".to_owned(),
        }
    }

    fn transaction(
        id: i64,
        category: &CategorySummary,
        amount: Decimal,
        date: Date,
    ) -> TransactionWithCategory {
        TransactionWithCategory {
            transaction: Transaction {
                id,
                user_id: UserID::new(1),
                category_id: category.id,
                description: format!("transaction {id}"),
                amount: Amount::new(amount).unwrap(),
                kind: category.kind,
                date,
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            category: category.clone(),
        }
    }

    #[test]
    fn by_category_sums_one_kind_largest_first() {
        let food = category(1, "Food", Kind::Expense);
        let rent = category(2, "Rent", Kind::Expense);
        let salary = category(3, "Salary", Kind::Income);
        let transactions = vec![
            transaction(1, &food, dec!(20), date!(2024 - 01 - 01)),
            transaction(2, &rent, dec!(500), date!(2024 - 01 - 01)),
            transaction(3, &food, dec!(30.5), date!(2024 - 01 - 02)),
            transaction(4, &salary, dec!(2000), date!(2024 - 01 - 03)),
        ];

        let got = by_category(&transactions, Kind::Expense).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].category, rent);
        assert_eq!(got[0].total, dec!(500));
        assert_eq!(got[1].category, food);
        assert_eq!(got[1].total, dec!(50.5));
        assert_eq!(got[1].transaction_count, 2);
    }

    #[test]
    fn by_category_breaks_ties_by_name() {
        let snacks = category(1, "Snacks", Kind::Expense);
        let coffee = category(2, "Coffee", Kind::Expense);
        let transactions = vec![
            transaction(1, &snacks, dec!(5), date!(2024 - 01 - 01)),
            transaction(2, &coffee, dec!(5), date!(2024 - 01 - 01)),
        ];

        let got = by_category(&transactions, Kind::Expense).unwrap();

        assert_eq!(got[0].category, coffee);
        assert_eq!(got[1].category, snacks);
    }

    #[test]
    fn by_month_is_chronological_and_limited() {
        let food = category(1, "Food", Kind::Expense);
        let salary = category(2, "Salary", Kind::Income);
        let transactions = vec![
            transaction(1, &food, dec!(10), date!(2024 - 03 - 31)),
            transaction(2, &salary, dec!(100), date!(2024 - 01 - 15)),
            transaction(3, &food, dec!(5), date!(2023 - 12 - 24)),
            transaction(4, &food, dec!(2.5), date!(2024 - 03 - 01)),
            transaction(5, &salary, dec!(100), date!(2024 - 03 - 15)),
        ];

        let got = by_month(&transactions, 2).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].period, Period::from(date!(2024 - 01 - 01)));
        assert_eq!(got[0].income, dec!(100));
        assert_eq!(got[0].expense, dec!(0));
        assert_eq!(got[1].period.to_string(), "2024-03");
        assert_eq!(got[1].income, dec!(100));
        assert_eq!(got[1].expense, dec!(12.5));
    }

    #[test]
    fn period_serializes_as_year_month() {
        let period = Period::from(date!(2024 - 07 - 09));

        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2024-07\"");
    }
}
