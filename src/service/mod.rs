use crate::{
    dto::{CreateNoteRequest, NoteResponse},
    repository::{Repository, ValidationError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl NoteService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let note = self
            .repo
            .lock()
            .await
            .create(request.content, request.important)?;

        tracing::info!("Created note {}", note.id);

        Ok(note.into())
    }

    /// Removes the note if present; returns whether anything was removed.
    pub async fn delete_note(&self, id: i64) -> bool {
        let removed = self.repo.lock().await.remove(id);
        if removed {
            tracing::info!("Deleted note {}", id);
        }
        removed
    }

    pub async fn get_one_note(&self, id: i64) -> Option<NoteResponse> {
        self.repo
            .lock()
            .await
            .find_by_id(id)
            .cloned()
            .map(NoteResponse::from)
    }

    pub async fn get_all_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .list()
            .iter()
            .cloned()
            .map(NoteResponse::from)
            .collect()
    }
}
