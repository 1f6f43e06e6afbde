//! Form State Controller - the create/update modal's working copy.
//!
//! ```text
//! Idle --open_create/open_update--> Editing --submit--> Validating
//!   ^                                 |  ^                 |    |
//!   +------------cancel---------------+  +---invalid-------+    |
//!   |                                    +---remote error--+    v
//!   +---------------------saved--------------------------- Submitting
//! ```
//!
//! Edits change exactly one field and never touch validation errors. A
//! failed save keeps the form open with its draft so the user can retry.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::list::ListController;
use crate::person::{validate, FieldErrors, Person, PersonDraft, PersonId};
use crate::remote::RemoteCollection;

/// Generic indicator shown when a valid draft could not be saved.
pub const SAVE_FAILED_MESSAGE: &str = "Could not save person";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(PersonId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Validating,
    Submitting,
}

/// A single keystroke or toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    FirstName(String),
    MiddleName(String),
    LastName(String),
    Email(String),
    Description(String),
    Dob(String),
    IsMale(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("form is not open")]
    NotEditing,
    #[error("invalid person: {0}")]
    Invalid(FieldErrors),
    #[error("could not save person: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone)]
pub struct FormController {
    phase: FormPhase,
    mode: FormMode,
    draft: PersonDraft,
    errors: FieldErrors,
    submit_failure: Option<TransportError>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Idle,
            mode: FormMode::Create,
            draft: PersonDraft::default(),
            errors: FieldErrors::new(),
            submit_failure: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Idle
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &PersonDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The remote error from the last failed save, if the form is still
    /// showing it.
    pub fn submit_failure(&self) -> Option<&TransportError> {
        self.submit_failure.as_ref()
    }

    /// Open with a fresh, empty draft.
    pub fn open_create(&mut self) {
        self.open(FormMode::Create, PersonDraft::default());
    }

    /// Open seeded from `person`'s current values.
    pub fn open_update(&mut self, person: &Person) {
        self.open(FormMode::Update(person.id.clone()), person.details.clone());
    }

    fn open(&mut self, mode: FormMode, draft: PersonDraft) {
        debug!(?mode, "form opened");
        self.mode = mode;
        self.draft = draft;
        self.errors = FieldErrors::new();
        self.submit_failure = None;
        self.phase = FormPhase::Editing;
    }

    /// Apply one edit to the working copy. Ignored while the form is closed.
    pub fn apply(&mut self, input: FormInput) {
        if self.phase != FormPhase::Editing {
            return;
        }
        let draft = &mut self.draft;
        match input {
            FormInput::FirstName(v) => draft.first_name = v,
            FormInput::MiddleName(v) => draft.middle_name = v,
            FormInput::LastName(v) => draft.last_name = v,
            FormInput::Email(v) => draft.email = v,
            FormInput::Description(v) => draft.description = v,
            FormInput::Dob(v) => draft.dob = v,
            FormInput::IsMale(v) => draft.is_male = v,
        }
        self.submit_failure = None;
    }

    /// Close without saving, discarding the working copy.
    pub fn cancel(&mut self) {
        if self.phase != FormPhase::Idle {
            debug!("form cancelled");
        }
        self.reset();
    }

    /// Validate the draft and, if it passes, hand it to the list controller.
    ///
    /// On success the form closes and resets. Validation failures and remote
    /// failures leave it open in `Editing` with the draft intact.
    pub async fn submit<C: RemoteCollection>(
        &mut self,
        list: &mut ListController<C>,
    ) -> Result<Person, SubmitError> {
        if self.phase != FormPhase::Editing {
            return Err(SubmitError::NotEditing);
        }

        self.phase = FormPhase::Validating;
        self.submit_failure = None;
        let errors = validate(&self.draft);
        if !errors.is_empty() {
            debug!(%errors, "form invalid");
            self.errors = errors.clone();
            self.phase = FormPhase::Editing;
            return Err(SubmitError::Invalid(errors));
        }
        self.errors = FieldErrors::new();

        let result = {
            let _submitting = Submitting::enter(&mut self.phase);
            match &self.mode {
                FormMode::Create => list.create(&self.draft).await,
                FormMode::Update(id) => list.update(id, &self.draft).await,
            }
        };

        match result {
            Ok(person) => {
                info!(id = %person.id, "form saved");
                self.reset();
                Ok(person)
            }
            Err(err) => {
                warn!(error = %err, "{}", SAVE_FAILED_MESSAGE);
                self.submit_failure = Some(err.clone());
                self.phase = FormPhase::Editing;
                Err(SubmitError::Transport(err))
            }
        }
    }

    fn reset(&mut self) {
        self.phase = FormPhase::Idle;
        self.mode = FormMode::Create;
        self.draft = PersonDraft::default();
        self.errors = FieldErrors::new();
        self.submit_failure = None;
    }
}

/// Holds the phase at `Submitting` for the duration of the remote call and
/// puts it back to `Editing` when dropped, including when the submit future
/// itself is dropped mid-call.
struct Submitting<'a> {
    phase: &'a mut FormPhase,
}

impl<'a> Submitting<'a> {
    fn enter(phase: &'a mut FormPhase) -> Self {
        *phase = FormPhase::Submitting;
        Self { phase }
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.phase = FormPhase::Editing;
    }
}
