use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/visits", post(handlers::log_visit))
        .route("/visits/:date/delete", post(handlers::delete_visit))
        .route("/api/visits", get(handlers::get_overview).post(handlers::create_visit))
        .route("/api/visits/:date", delete(handlers::remove_visit))
        .with_state(state)
}
