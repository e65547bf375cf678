use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::models::Note;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note content
    pub content: String,
    /// Creation time, RFC 3339 with millisecond precision
    #[serde(serialize_with = "serialize_millis")]
    #[schema(value_type = String, format = DateTime, example = "2022-05-30T17:30:31.098Z")]
    pub date: DateTime<Utc>,
    /// Importance flag
    pub important: bool,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            content: note.content,
            date: note.date,
            important: note.important,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note content, required and non-empty
    pub content: Option<String>,
    /// Importance flag, `false` when omitted
    pub important: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn serialize_millis<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
