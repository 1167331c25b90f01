//! The ledger service, the entry point for reading and changing a user's categories and
//! transactions.
//!
//! Every operation takes the [UserID] of the authenticated user and only ever touches that
//! user's records. Writes that depend on a check, e.g. the category lookup before inserting a
//! transaction, run inside one SQL transaction while the connection lock is held.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use time::Date;

use crate::{
    CategoryId, Error, NewCategory, NewTransaction, TransactionId, TransactionQuery,
    TransactionWithCategory, UserID,
    category::{self, Category},
    stats::{self, Stats, Summary},
    timezone::local_today,
    transaction,
};

/// The number of months in a summary when the caller does not ask for a specific number.
pub const DEFAULT_SUMMARY_MONTHS: usize = 6;

/// Manages categories and transactions on behalf of authenticated users.
#[derive(Debug, Clone)]
pub struct Ledger {
    connection: Arc<Mutex<Connection>>,
    local_timezone: String,
}

impl Ledger {
    /// Create a ledger backed by `connection`.
    ///
    /// `local_timezone` is the canonical name of the timezone used to decide what "today" is
    /// for transactions created without a date, e.g. "Pacific/Auckland".
    ///
    /// The database must have been initialized with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>, local_timezone: &str) -> Self {
        Self {
            connection,
            local_timezone: local_timezone.to_owned(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    /// List the categories of `user_id` in the order they were created.
    pub fn list_categories(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        let connection = self.lock()?;

        category::get_categories(user_id, &connection)
    }

    /// Create a category for `user_id`.
    pub fn create_category(
        &self,
        user_id: UserID,
        new_category: NewCategory,
    ) -> Result<Category, Error> {
        let connection = self.lock()?;

        category::create_category(user_id, new_category, &connection)
    }

    /// Delete the category `category_id` of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::DeleteMissingCategory] if the category does not exist or belongs to another
    ///   user,
    /// - [Error::CategoryInUse] if transactions are still filed under the category.
    pub fn delete_category(&self, user_id: UserID, category_id: CategoryId) -> Result<(), Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;

        match category::get_category(category_id, user_id, &sql_transaction) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
            Err(error) => return Err(error),
        }

        let reference_count =
            transaction::count_category_references(category_id, &sql_transaction)?;
        if reference_count > 0 {
            return Err(Error::CategoryInUse(reference_count));
        }

        category::delete_category(category_id, user_id, &sql_transaction)?;
        sql_transaction.commit()?;

        tracing::info!("deleted category {category_id} of user {user_id}");

        Ok(())
    }

    /// List the transactions of `user_id` with their categories, most recently recorded first.
    pub fn list_transactions(
        &self,
        user_id: UserID,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionWithCategory>, Error> {
        let connection = self.lock()?;

        transaction::get_transactions(user_id, query, &connection)
    }

    /// Record a transaction for `user_id`.
    ///
    /// The transaction is dated today in the ledger's timezone if no date is given.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::CategoryNotFound] if the category does not exist or belongs to another user,
    /// - [Error::KindMismatch] if the transaction's kind differs from the category's kind.
    ///
    /// Nothing is stored if an error is returned.
    pub fn create_transaction(
        &self,
        user_id: UserID,
        new_transaction: NewTransaction,
    ) -> Result<TransactionWithCategory, Error> {
        let connection = self.lock()?;
        let sql_transaction = connection.unchecked_transaction()?;

        let category = match category::get_category(
            new_transaction.category_id,
            user_id,
            &sql_transaction,
        ) {
            Ok(category) => category,
            Err(Error::NotFound) => return Err(Error::CategoryNotFound),
            Err(error) => return Err(error),
        };

        if category.kind != new_transaction.kind {
            return Err(Error::KindMismatch {
                category: category.kind,
                transaction: new_transaction.kind,
            });
        }

        let date = match new_transaction.date {
            Some(date) => date,
            None => local_today(&self.local_timezone)?,
        };

        let inserted =
            transaction::insert_transaction(user_id, new_transaction, date, &sql_transaction)?;
        let created = transaction::get_transaction(inserted.id, user_id, &sql_transaction)?;
        sql_transaction.commit()?;

        Ok(created)
    }

    /// Delete the transaction `transaction_id` of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::DeleteMissingTransaction] if the transaction does not exist or
    /// belongs to another user.
    pub fn delete_transaction(
        &self,
        user_id: UserID,
        transaction_id: TransactionId,
    ) -> Result<(), Error> {
        let connection = self.lock()?;

        transaction::delete_transaction(transaction_id, user_id, &connection)
    }

    /// Compute the income, expense and balance totals of `user_id`, optionally only over the
    /// transactions dated within `date_range`.
    pub fn get_stats(
        &self,
        user_id: UserID,
        date_range: Option<&RangeInclusive<Date>>,
    ) -> Result<Stats, Error> {
        let connection = self.lock()?;

        stats::get_stats(user_id, date_range, &connection)
    }

    /// Compute the overall totals of `user_id` together with the per category breakdowns and
    /// the totals of the `months` most recent months.
    pub fn get_summary(&self, user_id: UserID, months: usize) -> Result<Summary, Error> {
        let connection = self.lock()?;

        let stats = stats::get_stats(user_id, None, &connection)?;
        let transactions =
            transaction::get_transactions(user_id, &TransactionQuery::default(), &connection)?;

        Summary::new(stats, &transactions, months)
    }
}
