//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    extract::{MatchedPath, Request},
    middleware,
    routing::{delete, get, post},
};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;

use crate::{
    AppState, Error,
    auth::{auth_guard, get_dashboard, post_log_in, post_log_out, register_user},
    category::{create_category_endpoint, delete_category_endpoint, get_categories_endpoint},
    endpoints,
    logging::logging_middleware,
    stats::{get_stats_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests to protected routes without a valid auth cookie are rejected with 401 before
/// reaching a handler. Every request is traced and logged.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::TRANSACTION_STATS, get(get_stats_endpoint))
        .route(endpoints::TRANSACTION_SUMMARY, get(get_summary_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let router = protected_routes
        .merge(unprotected_routes)
        .fallback(get_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state);

    add_tracing_layer(router)
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

/// The body of the liveness check.
#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

async fn get_health() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: OffsetDateTime::now_utc(),
    })
}

async fn get_not_found() -> Error {
    Error::NotFound
}
