use axum::extract::DefaultBodyLimit;
use axum::Router;
use crate::state::AppState;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    crate::routes::configure_routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
