use chrono::{DateTime, Utc};

use crate::models::Note;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("content missing")]
    ContentMissing,
}

/// In-memory note store, ordered by insertion.
#[derive(Debug, Default)]
pub struct Repository {
    notes: Vec<Note>,
}

impl Repository {
    pub const fn empty() -> Self {
        Self { notes: Vec::new() }
    }

    /// Store seeded with the three start-up notes (ids 1, 2, 3).
    pub fn with_fixtures() -> Result<Self, chrono::ParseError> {
        let fixtures = [
            (1, "HTML is easy", "2022-05-30T17:30:31.098Z", true),
            (
                2,
                "Browser can execute only Javascript",
                "2022-05-30T18:39:34.091Z",
                false,
            ),
            (
                3,
                "GET and POST are the most important methods of HTTP protocol",
                "2022-05-30T19:20:14.298Z",
                true,
            ),
        ];

        let mut notes = Vec::with_capacity(fixtures.len());
        for (id, content, date, important) in fixtures {
            notes.push(Note {
                id,
                content: content.to_string(),
                important,
                date: DateTime::parse_from_rfc3339(date)?.with_timezone(&Utc),
            });
        }

        Ok(Self { notes })
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Drops the note with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        self.notes.len() != before
    }

    pub fn create(
        &mut self,
        content: Option<String>,
        important: Option<bool>,
    ) -> Result<Note, ValidationError> {
        self.create_at(content, important, Utc::now())
    }

    pub fn create_at(
        &mut self,
        content: Option<String>,
        important: Option<bool>,
        date: DateTime<Utc>,
    ) -> Result<Note, ValidationError> {
        let content = content
            .filter(|content| !content.is_empty())
            .ok_or(ValidationError::ContentMissing)?;

        let note = Note {
            id: self.generated_id(),
            content,
            important: important.unwrap_or(false),
            date,
        };

        tracing::debug!("Storing note {}", note.id);
        self.notes.push(note.clone());

        Ok(note)
    }

    /// One past the largest id currently stored, `1` when empty.
    ///
    /// Ids freed by removing the current maximum are handed out again.
    pub fn generated_id(&self) -> i64 {
        self.notes.iter().map(|note| note.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(repo: &Repository) -> Vec<i64> {
        repo.list().iter().map(|note| note.id).collect()
    }

    #[test]
    fn test_generated_id_empty_store() {
        assert_eq!(Repository::empty().generated_id(), 1);
    }

    #[test]
    fn test_generated_id_after_fixtures() {
        let repo = Repository::with_fixtures().unwrap();
        assert_eq!(ids(&repo), vec![1, 2, 3]);
        assert_eq!(repo.generated_id(), 4);
    }

    #[test]
    fn test_generated_id_reuses_removed_max() {
        let mut repo = Repository::with_fixtures().unwrap();
        assert!(repo.remove(3));
        assert_eq!(repo.generated_id(), 3);

        let note = repo.create(Some("again".to_string()), None).unwrap();
        assert_eq!(note.id, 3);
    }

    #[test]
    fn test_generated_id_ignores_gaps() {
        let mut repo = Repository::with_fixtures().unwrap();
        repo.remove(2);
        assert_eq!(repo.generated_id(), 4);
    }

    #[test]
    fn test_fixture_contents() {
        let repo = Repository::with_fixtures().unwrap();
        let first = repo.find_by_id(1).unwrap();
        assert_eq!(first.content, "HTML is easy");
        assert!(first.important);
        assert_eq!(
            first.date,
            DateTime::parse_from_rfc3339("2022-05-30T17:30:31.098Z").unwrap()
        );
        assert!(!repo.find_by_id(2).unwrap().important);
    }

    #[test]
    fn test_create_assigns_defaults() {
        let mut repo = Repository::empty();
        let date = DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let note = repo
            .create_at(Some("first".to_string()), None, date)
            .unwrap();

        assert_eq!(note.id, 1);
        assert!(!note.important);
        assert_eq!(note.date, date);
        assert_eq!(repo.list(), &[note]);
    }

    #[test]
    fn test_create_keeps_important_flag() {
        let mut repo = Repository::empty();
        let note = repo.create(Some("flagged".to_string()), Some(true)).unwrap();
        assert!(note.important);
    }

    #[test]
    fn test_create_appends_in_order() {
        let mut repo = Repository::with_fixtures().unwrap();
        repo.create(Some("four".to_string()), None).unwrap();
        repo.create(Some("five".to_string()), None).unwrap();
        assert_eq!(ids(&repo), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_create_rejects_missing_content() {
        let mut repo = Repository::with_fixtures().unwrap();

        assert_eq!(
            repo.create(None, Some(true)),
            Err(ValidationError::ContentMissing)
        );
        assert_eq!(
            repo.create(Some(String::new()), None),
            Err(ValidationError::ContentMissing)
        );
        assert_eq!(repo.list().len(), 3);
    }

    #[test]
    fn test_find_by_id_missing() {
        let repo = Repository::with_fixtures().unwrap();
        assert!(repo.find_by_id(42).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut repo = Repository::with_fixtures().unwrap();

        assert!(repo.remove(2));
        assert!(!repo.remove(2));
        assert!(!repo.remove(99));
        assert_eq!(ids(&repo), vec![1, 3]);
    }
}
