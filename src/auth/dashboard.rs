//! Reports who is logged in.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{Email, Error, UserID, auth::register::AccountState, user::get_user_by_id};

/// The identity of the logged in user.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// The ID of the logged in user.
    pub user_id: UserID,
    /// The email the user registered with.
    pub email: Email,
}

/// Return the ID and email of the user making the request.
///
/// # Errors
///
/// Returns an [Error::Unauthorized] if the user in the auth cookie no longer exists.
pub async fn get_dashboard(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<CurrentUser>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })?;

    Ok(Json(CurrentUser {
        user_id: user.id,
        email: user.email,
    }))
}
