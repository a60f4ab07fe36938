use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::json;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Largest JSON body that is written to the debug log verbatim.
const MAX_LOGGED_BODY: usize = 1024;

/// Upper bound for buffering a JSON body; matches axum's default body limit.
pub const MAX_BUFFERED_BODY: usize = 2 * 1024 * 1024;

/// Wrap every request in an `http_request` span keyed by a trace id.
///
/// The id is taken from an incoming `x-trace-id` header when it is a valid
/// UUID, otherwise generated, and echoed back on the response. JSON bodies
/// above [`MAX_BUFFERED_BODY`] are refused with 413 before reaching a handler.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let mut response = match log_json_body("request", &parts.headers, body).await {
            Ok(body) => {
                let mut req = Request::from_parts(parts, body);
                if let Some(v) = &header_value {
                    req.headers_mut().insert(X_TRACE_ID, v.clone());
                }
                let response = next.run(req).await;
                let (parts, body) = response.into_parts();
                match log_json_body("response", &parts.headers, body).await {
                    Ok(body) => Response::from_parts(parts, body),
                    Err(_) => status_response(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }
            Err(status) => status_response(status),
        };
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Buffer a JSON body up to [`MAX_BUFFERED_BODY`] and log it when small.
/// Other bodies pass through untouched.
async fn log_json_body(direction: &str, headers: &HeaderMap, body: Body) -> Result<Body, StatusCode> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return Ok(body);
    }

    let bytes = match Limited::new(body, MAX_BUFFERED_BODY).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(direction, limit = MAX_BUFFERED_BODY, "body exceeds limit");
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
        Err(e) => {
            warn!(direction, error = %e, "failed to buffer body");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            debug!(direction, body = %text, "body");
        }
    } else {
        debug!(direction, size = bytes.len(), "body too large to log");
    }
    Ok(Body::from(bytes))
}

fn status_response(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("request failed");
    (status, Json(json!({ "error": message }))).into_response()
}
