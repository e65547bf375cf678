use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::{
    handlers::rest,
    middleware::{buffer_body, log_request},
    service::NoteService,
};

/// The served application: the router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Routes, unknown-endpoint fallback, body buffering, request logger, CORS
/// and tracing.
///
/// Unsupported verbs on known paths fall through to the unknown-endpoint
/// handler instead of answering 405. Trailing slashes are trimmed before
/// routing, so `/api/notes/` and `/api/notes/1/` reach the same handlers as
/// their bare forms.
pub fn build_router(service: Arc<NoteService>, body_limit: usize) -> App {
    let router = Router::new()
        .route("/", get(rest::root).fallback(rest::unknown_endpoint))
        .route(
            "/api/notes",
            get(rest::get_all_notes)
                .post(rest::create_note)
                .fallback(rest::unknown_endpoint),
        )
        .route(
            "/api/notes/{id}",
            get(rest::get_one_note)
                .delete(rest::delete_note)
                .fallback(rest::unknown_endpoint),
        )
        .route(
            "/api-doc/openapi.json",
            get(rest::openapi_json).fallback(rest::unknown_endpoint),
        )
        .fallback(rest::unknown_endpoint)
        .with_state(service)
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn_with_state(body_limit, buffer_body))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
