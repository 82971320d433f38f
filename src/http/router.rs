//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Template management
        .route("/templates", post(handlers::create_template))
        .route("/templates", get(handlers::list_templates))
        .route("/templates/{template_id}", get(handlers::get_template))
        .route("/templates/{template_id}", delete(handlers::delete_template))
        .route("/templates/{template_id}/expand", post(handlers::expand_template))
        // Class discovery & availability
        .route("/classes", get(handlers::search_classes))
        .route("/classes/{instance_id}/availability", get(handlers::get_availability))
        .route("/classes/{instance_id}/cancel", post(handlers::cancel_instance))
        // Booking flow
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings/{booking_id}", delete(handlers::cancel_booking))
        // Waitlist flow
        .route("/classes/{instance_id}/waitlist", post(handlers::join_waitlist))
        .route("/waitlist/{entry_id}", delete(handlers::leave_waitlist));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use crate::services::notifier::LogNotifier;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo, Arc::new(LogNotifier), AppConfig::default());
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
