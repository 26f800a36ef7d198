pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::siting::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/score", post(handlers::handle_score))
        .route("/information", post(handlers::handle_information))
        .with_state(state)
}
