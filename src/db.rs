//! Database schema setup.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Enable foreign key enforcement and create the application's tables if they do not exist.
///
/// The tables are created inside a single exclusive transaction, so either all of them exist
/// afterwards or none of them were added.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the SQL statements failed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, SQLite ignores it otherwise.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .collect()
    }

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        assert_eq!(
            table_names(&connection),
            vec!["category", "transaction", "user"]
        );
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn can_run_twice() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert!(initialize(&connection).is_ok());
    }
}
