//! Categories group a user's transactions under one kind, e.g. 'Food' for expenses.

mod db;
mod domain;
mod endpoints;

pub use db::{create_category, create_category_table, delete_category, get_categories, get_category};
pub use domain::{Category, CategoryName, CategoryPayload, CategorySummary, NewCategory};
pub use endpoints::{create_category_endpoint, delete_category_endpoint, get_categories_endpoint};
