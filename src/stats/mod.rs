//! Aggregate statistics over a user's transactions.

mod aggregation;
mod db;
mod endpoints;

pub use aggregation::{
    CategoryTotal, MonthlyTotals, Period, Stats, Summary, by_category, by_month,
};
pub use db::get_stats;
pub use endpoints::{get_stats_endpoint, get_summary_endpoint};
