//! Note creation form: validation, single in-flight submission, and cache
//! invalidation on success.

use notehub_api_types::{CreateNoteData, Note};
use thiserror::Error;
use tracing::{error, info};

use crate::cache::{QueryCache, ResourceKind};
use crate::domain::validation::{FieldErrors, NoteDraft, NoteField, validate, validate_field};

use super::notes_api::{ApiError, NotesApi, SubmissionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Done,
    Cancelled,
}

/// Result of a submit attempt, handled by the caller.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The note was created and cached note lists were invalidated.
    Created(Note),
    /// Validation failed; the form is editable again with errors set.
    Invalid(FieldErrors),
    /// The backend rejected the request; input is retained.
    Failed(SubmissionError),
    /// The form was not in a state that accepts a submission.
    Rejected(FormPhase),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form is {0:?} and can no longer be cancelled")]
    NotEditing(FormPhase),
}

#[derive(Debug, Clone)]
pub struct NoteForm {
    draft: NoteDraft,
    errors: FieldErrors,
    phase: FormPhase,
}

impl Default for NoteForm {
    fn default() -> Self {
        Self::from_draft(NoteDraft::default())
    }
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(draft: NoteDraft) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
            phase: FormPhase::Editing,
        }
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Update a field while editing. A field that currently shows an error is
    /// re-validated so the error clears once the value becomes valid.
    pub fn set_field(&mut self, field: NoteField, value: impl Into<String>) {
        if self.phase != FormPhase::Editing {
            return;
        }
        let value = value.into();
        match field {
            NoteField::Title => self.draft.title = value,
            NoteField::Content => self.draft.content = value,
            NoteField::Tag => self.draft.tag = value,
        }
        if self.errors.contains(field) {
            self.errors.set(field, validate_field(&self.draft, field));
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// True when the current values are valid and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Editing && validate(&self.draft).is_ok()
    }

    /// Whether the rendered submit button is disabled.
    pub fn submit_disabled(&self) -> bool {
        self.is_submitting() || !self.errors.is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Creating..."
        } else {
            "Create note"
        }
    }

    pub async fn submit(&mut self, api: &dyn NotesApi, cache: &QueryCache) -> SubmitOutcome {
        let data = match self.start_submission() {
            Ok(data) => data,
            Err(outcome) => return outcome,
        };
        let result = api.create_note(&data).await;
        self.complete_submission(result, cache)
    }

    /// Validate and move to `Submitting`, yielding the payload to send.
    ///
    /// Any outcome returned here ends the attempt before the backend is called.
    pub(crate) fn start_submission(&mut self) -> Result<CreateNoteData, SubmitOutcome> {
        if self.phase != FormPhase::Editing {
            return Err(SubmitOutcome::Rejected(self.phase));
        }

        self.phase = FormPhase::Validating;
        match validate(&self.draft) {
            Ok(data) => {
                self.errors = FieldErrors::default();
                self.phase = FormPhase::Submitting;
                Ok(data)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.phase = FormPhase::Editing;
                Err(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Settle an in-flight submission with the backend's answer.
    pub(crate) fn complete_submission(
        &mut self,
        result: Result<Note, ApiError>,
        cache: &QueryCache,
    ) -> SubmitOutcome {
        if self.phase != FormPhase::Submitting {
            return SubmitOutcome::Rejected(self.phase);
        }

        match result {
            Ok(note) => {
                let marked = cache.invalidate(ResourceKind::Notes);
                self.phase = FormPhase::Done;
                info!(
                    target = "notehub::form",
                    note_id = %note.id,
                    tag = %note.tag,
                    invalidated = marked,
                    "note created"
                );
                SubmitOutcome::Created(note)
            }
            Err(err) => {
                self.phase = FormPhase::Editing;
                let err = SubmissionError(err);
                error!(
                    target = "notehub::form",
                    error = %err,
                    cause = %err.0,
                    "error creating note"
                );
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Abandon the form, discarding input. Only allowed while editing.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        if self.phase != FormPhase::Editing {
            return Err(FormError::NotEditing(self.phase));
        }
        self.draft = NoteDraft::default();
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use notehub_api_types::{NoteTag, NotesPage};

    use super::*;
    use crate::application::fake_api::RecordingApi;
    use crate::cache::{CacheConfig, QueryKey};

    fn filled(title: &str, content: &str, tag: &str) -> NoteForm {
        let mut form = NoteForm::new();
        form.set_field(NoteField::Title, title);
        form.set_field(NoteField::Content, content);
        form.set_field(NoteField::Tag, tag);
        form
    }

    fn seeded_cache() -> QueryCache {
        let cache = QueryCache::new(&CacheConfig::default());
        for (tag, page) in [(None, 1), (Some("Work"), 1), (Some("Todo"), 2)] {
            cache.insert(
                QueryKey {
                    kind: ResourceKind::Notes,
                    tag: tag.map(str::to_string),
                    page,
                },
                NotesPage {
                    notes: Vec::new(),
                    total_pages: 1,
                },
            );
        }
        cache
    }

    #[test]
    fn defaults_match_initial_values() {
        let form = NoteForm::new();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft().title, "");
        assert_eq!(form.draft().tag, "Todo");
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), "Create note");
    }

    #[test]
    fn can_submit_tracks_every_rule() {
        assert!(filled("abc", "", "Todo").can_submit());
        assert!(filled(&"a".repeat(50), &"c".repeat(500), "Meeting").can_submit());

        assert!(!filled("ab", "", "Todo").can_submit());
        assert!(!filled(&"a".repeat(51), "", "Todo").can_submit());
        assert!(!filled("abc", &"c".repeat(501), "Todo").can_submit());
        assert!(!filled("abc", "", "Groceries").can_submit());
    }

    #[tokio::test]
    async fn valid_submission_creates_once_and_invalidates_once() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Buy milk", "", "Shopping");

        let outcome = form.submit(&api, &cache).await;
        let note = match outcome {
            SubmitOutcome::Created(note) => note,
            other => panic!("expected created, got {other:?}"),
        };
        assert_eq!(note.title, "Buy milk");

        let creates = api.creates.lock().expect("creates lock").clone();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].title, "Buy milk");
        assert_eq!(creates[0].content, "");
        assert_eq!(creates[0].tag, NoteTag::Shopping);

        assert_eq!(cache.invalidation_count(), 1);
        assert_eq!(form.phase(), FormPhase::Done);
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn success_marks_every_cached_list_stale() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Quarterly review", "agenda", "Work");

        form.submit(&api, &cache).await;

        let key = |tag: Option<&str>, page| QueryKey {
            kind: ResourceKind::Notes,
            tag: tag.map(str::to_string),
            page,
        };
        for k in [key(None, 1), key(Some("Work"), 1), key(Some("Todo"), 2)] {
            assert!(cache.get_fresh(&k).is_none(), "{k:?} should be stale");
        }
    }

    #[tokio::test]
    async fn done_form_rejects_second_submit() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Buy milk", "", "Shopping");

        form.submit(&api, &cache).await;
        let outcome = form.submit(&api, &cache).await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(FormPhase::Done)));
        assert_eq!(api.create_count(), 1);
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn in_flight_submission_locks_the_form() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Buy milk", "", "Shopping");

        let data = form.start_submission().expect("valid draft");
        assert_eq!(data.title, "Buy milk");
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(form.is_submitting());
        assert!(form.submit_disabled());
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), "Creating...");

        let second = form.submit(&api, &cache).await;
        assert!(matches!(second, SubmitOutcome::Rejected(FormPhase::Submitting)));
        assert_eq!(api.create_count(), 0);

        let note = api.create_note(&data).await.expect("create");
        let outcome = form.complete_submission(Ok(note), &cache);
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(form.phase(), FormPhase::Done);
        assert_eq!(form.submit_label(), "Create note");
        assert_eq!(api.create_count(), 1);
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_collects_errors_without_calls() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("ab", &"c".repeat(501), "Errands");

        let outcome = form.submit(&api, &cache).await;
        let errors = match outcome {
            SubmitOutcome::Invalid(errors) => errors,
            other => panic!("expected invalid, got {other:?}"),
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.submit_disabled());
        assert_eq!(api.create_count(), 0);
        assert_eq!(cache.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn errors_clear_as_fields_become_valid() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("ab", "", "Errands");
        form.submit(&api, &cache).await;
        assert_eq!(form.errors().len(), 2);

        form.set_field(NoteField::Title, "abc");
        assert!(!form.errors().contains(NoteField::Title));
        assert!(form.errors().contains(NoteField::Tag));

        form.set_field(NoteField::Tag, "Personal");
        assert!(form.errors().is_empty());
        assert!(!form.submit_disabled());
    }

    #[tokio::test]
    async fn failed_create_keeps_input_and_cache() {
        let api = RecordingApi::failing_create();
        let cache = seeded_cache();
        let mut form = filled("Buy milk", "two litres", "Shopping");

        let outcome = form.submit(&api, &cache).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft().content, "two litres");
        assert!(form.errors().is_empty());
        assert_eq!(cache.invalidation_count(), 0);
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn cancel_never_creates_or_invalidates() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Half-written", "", "Work");

        form.cancel().expect("cancel while editing");
        assert_eq!(form.phase(), FormPhase::Cancelled);
        assert_eq!(form.draft().title, "");

        let outcome = form.submit(&api, &cache).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(FormPhase::Cancelled)));
        assert_eq!(api.create_count(), 0);
        assert_eq!(cache.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn cancel_after_success_is_rejected() {
        let api = RecordingApi::default();
        let cache = seeded_cache();
        let mut form = filled("Buy milk", "", "Shopping");
        form.submit(&api, &cache).await;

        let err = form.cancel().expect_err("done form cannot cancel");
        assert!(matches!(err, FormError::NotEditing(FormPhase::Done)));
    }
}
