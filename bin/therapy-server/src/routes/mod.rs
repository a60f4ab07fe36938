//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - The OpenAPI document at `/api-docs/openapi.json`
//! - Health / heartbeat route
//! - Persona catalog, session lifecycle and report routes

mod characters;
pub mod doc;
mod health;
mod report;
mod session;

use axum::{Router, middleware};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(doc::router())
        .merge(characters::router())
        .merge(session::router())
        .merge(report::router())
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
