//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use
//! [format_endpoint].

/// The liveness check.
pub const HEALTH: &str = "/health";

/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route describing the logged in user.
pub const DASHBOARD: &str = "/api/dashboard";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// Income, expense and balance totals.
pub const TRANSACTION_STATS: &str = "/api/transactions/stats";
/// Totals broken down by category and month.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g. '{category_id}' in
/// '/api/categories/{category_id}'. Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the original `endpoint_path` is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
