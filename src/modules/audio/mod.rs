use axum::routing::post;
use axum::Router;
use crate::state::AppState;

pub mod handler;
pub mod job;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mix", post(handler::mix))
        .route("/concat", post(handler::concat))
}
