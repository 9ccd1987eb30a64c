use axum::routing::get;
use axum::Router;

use crate::state::AppState;

mod handler;
pub mod service;
pub mod session;

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/chat/groups", get(handler::groups))
        .route("/chat/groups/{id}/messages", get(handler::messages))
        .with_state(state)
}
