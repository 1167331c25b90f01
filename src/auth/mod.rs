//! Account registration, log in and log out, and the middleware that guards protected routes.
//!
//! A successful log in stores a signed-in token in an encrypted private cookie. Protected routes
//! resolve the requesting user from that cookie via an [IdentityResolver].

mod cookie;
mod dashboard;
mod identity;
mod log_in;
mod log_out;
mod middleware;
mod register;
mod token;

pub use cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION};
pub use dashboard::{CurrentUser, get_dashboard};
pub use identity::{CookieIdentityResolver, IdentityResolver};
pub use log_in::{LogInPayload, LogInState, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use register::{AccountState, RegisterPayload, RegisteredUser, register_user};
