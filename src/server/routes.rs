//! Stub endpoint routes.
//!
//! The remote metadata service is reduced to the two behaviors the subject
//! exercises: `GET /ip.txt` answers with a fixed WAN address, and any POST is
//! acknowledged so the subject's payload upload succeeds. Everything else is
//! a 404. Every request is logged before its response is produced.

use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Fixed IP payload returned for the recognized path.
pub const IP_PAYLOAD: &str = "192.168.1.100";

/// Body returned for unrecognized GET paths.
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Body acknowledging any POST.
pub const POST_ACK_BODY: &str = "OK";

pub fn build_router() -> Router {
    Router::new()
        .route("/ip.txt", get(serve_ip).post(acknowledge_post))
        .fallback(unmatched)
        .layer(TraceLayer::new_for_http())
}

async fn serve_ip(uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    log_request(&Method::GET, &uri, &headers);
    info!(ip = IP_PAYLOAD, "served IP payload");
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], IP_PAYLOAD)
}

async fn acknowledge_post(uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    log_request(&Method::POST, &uri, &headers);
    info!(data = %String::from_utf8_lossy(&body), "acknowledged POST payload");
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], POST_ACK_BODY).into_response()
}

/// Any request that missed the fixed routes: POSTs are still acknowledged
/// regardless of path, everything else is not found.
async fn unmatched(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    if method == Method::POST {
        return acknowledge_post(uri, headers, body).await;
    }
    log_request(&method, &uri, &headers);
    warn!(path = %uri.path(), "path not found");
    (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, "text/plain")], NOT_FOUND_BODY)
        .into_response()
}

fn log_request(method: &Method, uri: &Uri, headers: &HeaderMap) {
    let header_map: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                serde_json::Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    info!(
        method = %method,
        path = %uri.path(),
        headers = %serde_json::Value::Object(header_map),
        "inbound request"
    );
}
