//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: store wiring and the operations behind the handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Listing and single-rank reads are anonymous; every mutation goes through
/// the bearer-token middleware.
pub fn build_app(jwt_secret: String) -> Router {
    let jwt = Arc::new(toplist_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let services = Arc::new(services::build_services());

    let auth_state = middleware::AuthState {
        jwt,
        users: services.user_store(),
    };

    let protected = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .nest("/ranks", routes::ranks::protected_router())
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let public = Router::new()
        .route("/health", get(routes::system::health))
        .nest("/ranks", routes::ranks::public_router())
        .nest("/users", routes::users::router());

    public
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
