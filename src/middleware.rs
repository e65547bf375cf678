use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::dto::ErrorResponse;

/// Request body buffered by [`buffer_body`], kept as a request extension so
/// later stages can look at it without consuming the body.
#[derive(Debug, Clone)]
pub struct BufferedBody(pub Bytes);

/// Whether the request declares an `application/json` body.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Body as a JSON parser would expose it to handlers: `{}` for anything
/// that is not a well-formed JSON document.
fn parsed_body(headers: &HeaderMap, bytes: &Bytes) -> Value {
    if !is_json(headers) || bytes.is_empty() {
        return Value::Object(serde_json::Map::new());
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

/// Buffers the request body up to `body_limit` bytes.
///
/// Larger bodies are answered with 413 and never reach routing.
pub async fn buffer_body(
    State(body_limit): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                "Rejected request body over {body_limit} bytes: {e}"
            );
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorResponse::new("request entity too large")),
            )
                .into_response();
        }
    };

    parts.extensions.insert(BufferedBody(bytes.clone()));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Logs method, path and body of every request, then hands it on untouched.
pub async fn log_request(request: Request, next: Next) -> Response {
    let body = request.extensions().get::<BufferedBody>().map_or_else(
        || Value::Object(serde_json::Map::new()),
        |BufferedBody(bytes)| parsed_body(request.headers(), bytes),
    );

    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        body = %body,
        "Incoming request"
    );

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        Router,
        http::{self, HeaderValue},
        routing::post,
    };
    use tower::ServiceExt;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    fn echo_router(body_limit: usize) -> Router {
        Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn(log_request))
            .layer(axum::middleware::from_fn_with_state(body_limit, buffer_body))
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&json_headers("application/json")));
        assert!(is_json(&json_headers("application/json; charset=utf-8")));
        assert!(is_json(&json_headers("Application/JSON")));
        assert!(!is_json(&json_headers("application/merge-patch+json")));
        assert!(!is_json(&json_headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn test_parsed_body_defaults_to_empty_object() {
        let empty = serde_json::json!({});
        let headers = json_headers("application/json");

        assert_eq!(parsed_body(&headers, &Bytes::new()), empty);
        assert_eq!(parsed_body(&headers, &Bytes::from_static(b"{nope")), empty);
        assert_eq!(
            parsed_body(&json_headers("text/plain"), &Bytes::from_static(b"{}")),
            empty
        );
        assert_eq!(
            parsed_body(&headers, &Bytes::from_static(br#"{"content":"a"}"#)),
            serde_json::json!({"content": "a"})
        );
    }

    #[tokio::test]
    async fn test_body_reaches_handler_intact() {
        let response = echo_router(1024)
            .oneshot(
                http::Request::post("/echo")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"content":"kept"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"content":"kept"}"#);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let response = echo_router(4)
            .oneshot(
                http::Request::post("/echo")
                    .body(Body::from("far too long"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "request entity too large"}));
    }

    #[tokio::test]
    async fn test_logger_passes_on_without_buffered_body() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn(log_request));

        let response = app
            .oneshot(
                http::Request::post("/echo")
                    .body(Body::from("streamed"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"streamed");
    }
}
