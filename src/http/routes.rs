use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/session", get(handlers::get_session))
        // Uploads; no size limit on documents
        .route(
            "/uploads",
            post(handlers::upload_file)
                .get(handlers::list_uploads)
                .delete(handlers::clear_uploads)
                .layer(DefaultBodyLimit::disable()),
        )
        // Generation and download
        .route("/minutes", post(handlers::generate_minutes))
        .route("/downloads/:file_name", get(handlers::download_minutes))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
