//! Route definitions for the HTTP API.

pub mod history;
pub mod messages;
pub mod profiles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(messages::routes())
        .merge(users::routes())
        .merge(profiles::routes())
        .merge(history::routes())
        .with_state(state)
}
