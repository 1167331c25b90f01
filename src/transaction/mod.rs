//! Transactions record money received or spent, each filed under one of the user's categories.

mod db;
mod domain;
mod endpoints;

pub use db::{
    count_category_references, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, insert_transaction,
};
pub(crate) use db::range_bounds;
pub use domain::{
    DateRangeParams, NewTransaction, Transaction, TransactionListParams, TransactionPayload,
    TransactionQuery, TransactionWithCategory,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
};
