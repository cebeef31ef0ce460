//! Identity Engine HTTP server
//!
//! Wires the identity core to an axum router: public authentication
//! endpoints, token-gated user management, and an admin-gated delete.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use server::{AppState, ServerConfig};

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/exist", post(handlers::auth::exist))
        .route("/api/auth/signin", post(handlers::auth::sign_in))
        .route("/api/auth/signon", post(handlers::auth::sign_on))
        .route(
            "/api/user",
            get(handlers::users::list_users).post(handlers::users::create_user),
        );

    let protected = Router::new()
        .route("/api/auth/user", get(handlers::auth::current_user))
        .route(
            "/api/user/:id",
            get(handlers::users::get_user).put(handlers::users::update_user),
        )
        .route("/api/user/:id/photo", put(handlers::users::update_photo))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    let admin = Router::new()
        .route("/api/user/:id", delete(handlers::users::remove_user))
        .route_layer(from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
