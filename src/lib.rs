pub mod config;
mod delete_gate;
mod error;
mod form;
mod list;
pub mod logging;
mod person;
mod remote;

pub use crate::config::{LoggingSettings, RemoteSettings, Settings};
pub use delete_gate::{DeleteGate, GateError};
pub use error::{Operation, TransportError};
pub use form::{FormController, FormInput, FormMode, FormPhase, SubmitError, SAVE_FAILED_MESSAGE};
pub use list::{filter_view, matches_query, ListController, LoadState};
pub use person::{validate, Field, FieldErrors, Person, PersonDraft, PersonId};
pub use remote::{Acknowledgement, HttpRemoteCollection, InMemoryRemoteCollection, RemoteCollection};

// Re-export so callers can hand a token to `ListController::with_cancellation`
// without depending on tokio-util directly.
pub use tokio_util::sync::CancellationToken;
