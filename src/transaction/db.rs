//! Database operations for transactions.

use std::ops::RangeInclusive;

use rusqlite::{Connection, Row, params};
use time::{Date, OffsetDateTime};

use crate::{
    CategoryId, Error, TransactionId, UserID,
    category::{CategoryName, CategorySummary},
    transaction::{NewTransaction, Transaction, TransactionQuery, TransactionWithCategory},
};

const SELECT_WITH_CATEGORY: &str = "SELECT
        t.id, t.user_id, t.category_id, t.description, t.amount, t.kind, t.date, t.created_at,
        c.name, c.kind, c.icon, c.color
    FROM \"transaction\" t
    INNER JOIN category c ON c.id = t.category_id";

/// Insert a transaction for `user_id` and return it with its generated ID.
///
/// The caller must have checked that the category exists, belongs to `user_id`, and has
/// the same kind as the transaction.
pub fn insert_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    date: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\" (user_id, category_id, description, amount, kind, date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id.as_i64(),
            new_transaction.category_id,
            new_transaction.description,
            new_transaction.amount,
            new_transaction.kind,
            date,
            created_at,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        user_id,
        category_id: new_transaction.category_id,
        description: new_transaction.description,
        amount: new_transaction.amount,
        kind: new_transaction.kind,
        date,
        created_at,
    })
}

/// Retrieve the transaction `transaction_id` owned by `user_id` together with its category.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the transaction does not exist or belongs to another user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY} WHERE t.id = :id AND t.user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_row_with_category,
        )
        .map_err(|error| error.into())
}

/// Retrieve the transactions of `user_id` with their categories, most recently recorded first.
pub fn get_transactions(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let (start, end) = range_bounds(query.date_range.as_ref());
    // A negative limit means no limit in SQLite.
    let limit = query
        .limit
        .and_then(|limit| i64::try_from(limit).ok())
        .unwrap_or(-1);

    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY}
            WHERE t.user_id = :user_id
                AND (:start IS NULL OR t.date >= :start)
                AND (:end IS NULL OR t.date <= :end)
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT :limit"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start,
                ":end": end,
                ":limit": limit,
            },
            map_row_with_category,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete the transaction `transaction_id` owned by `user_id`.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingTransaction] if the transaction does not exist or belongs to
/// another user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Count the transactions filed under `category_id`.
pub fn count_category_references(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<usize, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;

    usize::try_from(count)
        .map_err(|_| Error::SqlError(rusqlite::Error::IntegralValueOutOfRange(0, count)))
}

/// Split an optional date range into optional SQL bounds.
pub(crate) fn range_bounds(
    date_range: Option<&RangeInclusive<Date>>,
) -> (Option<Date>, Option<Date>) {
    match date_range {
        Some(range) => (Some(*range.start()), Some(*range.end())),
        None => (None, None),
    }
}

/// Initialize the transaction table and indexes.
///
/// The category reference has no delete action, so a category cannot be removed while
/// transactions still point to it.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    let category_id = row.get(2)?;
    let raw_category_name: String = row.get(8)?;

    let transaction = Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id,
        description: row.get(3)?,
        amount: row.get(4)?,
        kind: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    };

    let category = CategorySummary {
        id: category_id,
        name: CategoryName::new_unchecked(&raw_category_name),
        kind: row.get(9)?,
        icon: row.get(10)?,
        color: row.get(11)?,
    };

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Amount, CategoryName, Error, Kind, NewCategory, NewTransaction, TransactionQuery, UserID,
        category::{Category, create_category},
        test_utils::{get_test_db_connection, insert_test_user},
    };

    use super::{
        count_category_references, delete_transaction, get_transaction, get_transactions,
        insert_transaction,
    };

    struct Fixture {
        connection: Connection,
        user_id: UserID,
        other_user_id: UserID,
        food: Category,
    }

    fn setup() -> Fixture {
        let connection = get_test_db_connection();
        let user_id = insert_test_user(&connection, "alice@example.com");
        let other_user_id = insert_test_user(&connection, "bob@example.com");
        let food = create_category(
            user_id,
            NewCategory::new(
                CategoryName::new_unchecked("Food"),
                Kind::Expense,
                Some("🍔"),
                None,
            ),
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            user_id,
            other_user_id,
            food,
        }
    }

    fn insert(fixture: &Fixture, description: &str, date: time::Date) -> crate::Transaction {
        let new_transaction = NewTransaction::new(
            description,
            Amount::new(dec!(12.5)).unwrap(),
            Kind::Expense,
            fixture.food.id,
            None,
        )
        .unwrap();

        insert_transaction(fixture.user_id, new_transaction, date, &fixture.connection).unwrap()
    }

    #[test]
    fn insert_and_get_transaction_with_category() {
        let fixture = setup();
        let inserted = insert(&fixture, "Groceries", date!(2024 - 03 - 01));

        let got = get_transaction(inserted.id, fixture.user_id, &fixture.connection).unwrap();

        assert_eq!(got.transaction.id, inserted.id);
        assert_eq!(got.transaction.description, "Groceries");
        assert_eq!(got.transaction.amount.value(), dec!(12.5));
        assert_eq!(got.transaction.date, date!(2024 - 03 - 01));
        assert_eq!(got.category, fixture.food.summary());
    }

    #[test]
    fn get_transaction_of_other_user_returns_not_found() {
        let fixture = setup();
        let inserted = insert(&fixture, "Groceries", date!(2024 - 03 - 01));

        let got = get_transaction(inserted.id, fixture.other_user_id, &fixture.connection);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_orders_most_recent_first() {
        let fixture = setup();
        let first = insert(&fixture, "First", date!(2024 - 03 - 01));
        let second = insert(&fixture, "Second", date!(2024 - 01 - 01));

        let got: Vec<i64> = get_transactions(
            fixture.user_id,
            &TransactionQuery::default(),
            &fixture.connection,
        )
        .unwrap()
        .into_iter()
        .map(|transaction| transaction.transaction.id)
        .collect();

        assert_eq!(got, vec![second.id, first.id]);
    }

    #[test]
    fn get_transactions_filters_by_date_and_limit() {
        let fixture = setup();
        insert(&fixture, "January", date!(2024 - 01 - 15));
        let february = insert(&fixture, "February", date!(2024 - 02 - 15));
        let late_february = insert(&fixture, "Late February", date!(2024 - 02 - 29));
        insert(&fixture, "March", date!(2024 - 03 - 01));

        let in_february = get_transactions(
            fixture.user_id,
            &TransactionQuery {
                date_range: Some(date!(2024 - 02 - 01)..=date!(2024 - 02 - 29)),
                limit: None,
            },
            &fixture.connection,
        )
        .unwrap();
        let ids: Vec<i64> = in_february.iter().map(|t| t.transaction.id).collect();
        assert_eq!(ids, vec![late_february.id, february.id]);

        let limited = get_transactions(
            fixture.user_id,
            &TransactionQuery {
                date_range: None,
                limit: Some(2),
            },
            &fixture.connection,
        )
        .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn get_transactions_excludes_other_users() {
        let fixture = setup();
        insert(&fixture, "Groceries", date!(2024 - 03 - 01));

        let got = get_transactions(
            fixture.other_user_id,
            &TransactionQuery::default(),
            &fixture.connection,
        )
        .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn delete_transaction_scoped_to_owner() {
        let fixture = setup();
        let inserted = insert(&fixture, "Groceries", date!(2024 - 03 - 01));

        assert_eq!(
            delete_transaction(inserted.id, fixture.other_user_id, &fixture.connection),
            Err(Error::DeleteMissingTransaction)
        );
        assert_eq!(
            delete_transaction(inserted.id, fixture.user_id, &fixture.connection),
            Ok(())
        );
        assert_eq!(
            get_transaction(inserted.id, fixture.user_id, &fixture.connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn counts_category_references() {
        let fixture = setup();
        assert_eq!(
            count_category_references(fixture.food.id, &fixture.connection),
            Ok(0)
        );

        insert(&fixture, "Groceries", date!(2024 - 03 - 01));
        insert(&fixture, "Takeaways", date!(2024 - 03 - 02));

        assert_eq!(
            count_category_references(fixture.food.id, &fixture.connection),
            Ok(2)
        );
    }

    #[test]
    fn schema_rejects_unknown_category() {
        let fixture = setup();
        let new_transaction = NewTransaction::new(
            "Dangling",
            Amount::new(dec!(1)).unwrap(),
            Kind::Expense,
            fixture.food.id + 100,
            None,
        )
        .unwrap();

        let got = insert_transaction(
            fixture.user_id,
            new_transaction,
            date!(2024 - 03 - 01),
            &fixture.connection,
        );

        assert!(matches!(got, Err(Error::SqlError(_))));
    }
}
