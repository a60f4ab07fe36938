use crate::state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// CORS layer built from `THERAPY_CORS_ORIGINS`; any origin when unset or unparsable.
pub fn cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let base = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    let Some(origins_str) = &state.config.cors_allowed_origins else {
        return base.allow_origin(Any);
    };
    let origins: Vec<axum::http::HeaderValue> = origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
    }
}
