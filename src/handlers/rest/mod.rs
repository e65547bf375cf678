use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_macros::debug_handler;
use serde_json::Value;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, ErrorResponse, NoteResponse},
    middleware::is_json,
    repository::ValidationError,
    service::{NoteService, NoteServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        create_note,
        delete_note,
        get_one_note,
        get_all_notes
    ),
    components(schemas(NoteResponse, CreateNoteRequest, ErrorResponse)),
    tags(
        (name = "notes", description = "In-memory notes API")
    )
)]
pub struct ApiDoc;

/// Maps a path segment to a note id the way numeric coercion would.
///
/// Integral values (`"3"`, `" 3 "`, `"3.0"`, `"3e0"`) resolve to an id; anything
/// else resolves to `None`, which matches no stored note.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn parse_note_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }

    let value = trimmed.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Reads `content` and `important` from a JSON object body.
///
/// Bodies that are not JSON, or JSON values other than an object, carry no
/// fields and yield an empty request.
fn parse_create_request(headers: &HeaderMap, body: &Bytes) -> Result<CreateNoteRequest, String> {
    if !is_json(headers) || body.is_empty() {
        return Ok(CreateNoteRequest::default());
    }

    match serde_json::from_slice(body).map_err(|e| e.to_string())? {
        Value::Object(fields) => {
            serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
        }
        _ => Ok(CreateNoteRequest::default()),
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting page", content_type = "text/html", body = String)
    )
)]
#[debug_handler]
pub async fn root() -> Html<&'static str> {
    Html("<h1>Hello World!</h1>")
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created", body = NoteResponse),
        (status = 400, description = "Content missing or malformed body", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_create_request(&headers, &body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("rejected malformed note body: {}", e);
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))).into_response();
        }
    };

    match service.create_note(request).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(NoteServiceError::Validation(e @ ValidationError::ContentMissing)) => {
            tracing::warn!("failed to create note entry: {}", e);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note removed, or was never there")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    if let Some(id) = parse_note_id(&id) {
        service.delete_note(id).await;
    }
    StatusCode::NO_CONTENT.into_response()
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found, empty body")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let note = match parse_note_id(&id) {
        Some(id) => service.get_one_note(id).await,
        None => None,
    };

    match note {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes in insertion order", body = Vec<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    (StatusCode::OK, Json(service.get_all_notes().await)).into_response()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn unknown_endpoint() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("unknown endpoint")),
    )
        .into_response()
}
