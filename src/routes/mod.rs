use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{self, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    // Leave headroom over the upload cap for the multipart framing.
    let body_limit = state.config.max_upload_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/events", get(handlers::events::list_events))
        .route("/api/events/ws", get(handlers::events::events_feed))
        .route("/api/events/:id", get(handlers::events::get_event))
        .route(
            "/api/events/:id/register",
            post(handlers::registrations::register),
        )
        .route(
            "/api/registrations",
            get(handlers::registrations::my_registrations),
        )
        .route("/api/notices", get(handlers::notices::list_notices))
        .route("/api/auth/signup", post(handlers::auth::sign_up))
        .route("/api/auth/signin", post(handlers::auth::sign_in))
        .route("/api/auth/signout", post(handlers::auth::sign_out))
        .route("/api/auth/password", put(handlers::auth::change_password))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/api/profile/notifications",
            put(handlers::profile::update_notifications),
        )
        .route("/api/profile/photo", post(handlers::profile::upload_photo))
        .route("/api/admin/events", post(handlers::admin::create_event))
        .route(
            "/api/admin/events/:id",
            put(handlers::admin::update_event).delete(handlers::admin::delete_event),
        )
        .route(
            "/api/admin/events/:id/registrations",
            get(handlers::registrations::event_registrations),
        )
        .route("/api/admin/dashboard", get(handlers::admin::dashboard))
        .route("/api/admin/notices", post(handlers::admin::create_notice))
        .route(
            "/api/admin/notices/:id",
            put(handlers::admin::update_notice).delete(handlers::admin::delete_notice),
        )
        .nest_service("/assets", ServeDir::new(&state.config.asset_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_security_headers_layer())
                .layer(create_cors_layer())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
