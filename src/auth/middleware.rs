//! Authentication middleware that rejects requests without a valid identity.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, auth::IdentityResolver};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Resolves the user making a request.
    pub identity: Arc<dyn IdentityResolver>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            identity: state.identity.clone(),
        }
    }
}

/// Middleware function that resolves the user making the request.
///
/// The user ID is placed into the request and the request executed normally if the identity
/// is valid, otherwise a 401 JSON response is returned and the handler is never called.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>`
/// to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.identity.resolve(request.headers()) {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(
                "rejected request to {} without a valid identity",
                request.uri().path()
            );
            error.into_response()
        }
    }
}
