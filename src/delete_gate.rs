//! Two-step delete: arm with a target, then confirm or cancel.

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::list::ListController;
use crate::person::PersonId;
use crate::remote::RemoteCollection;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("no delete is awaiting confirmation")]
    NotArmed,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Holds at most one pending delete target.
///
/// Arming again before confirming replaces the target; the last request wins.
#[derive(Debug, Clone, Default)]
pub struct DeleteGate {
    armed: Option<PersonId>,
    last_error: Option<TransportError>,
}

impl DeleteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id awaiting confirmation, if any.
    pub fn armed(&self) -> Option<&PersonId> {
        self.armed.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Error from the last failed confirm, shown inline while still armed.
    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    pub fn request(&mut self, id: PersonId) {
        if let Some(previous) = self.armed.as_ref().filter(|armed| **armed != id) {
            debug!(%previous, %id, "delete target replaced");
        }
        self.armed = Some(id);
        self.last_error = None;
    }

    pub fn cancel(&mut self) {
        self.armed = None;
        self.last_error = None;
    }

    /// Delete the armed target through `list` and disarm.
    ///
    /// On a remote failure the target stays armed and the error is kept.
    pub async fn confirm<C: RemoteCollection>(
        &mut self,
        list: &mut ListController<C>,
    ) -> Result<PersonId, GateError> {
        let id = self.armed.clone().ok_or(GateError::NotArmed)?;
        match list.delete(&id).await {
            Ok(_) => {
                self.armed = None;
                self.last_error = None;
                Ok(id)
            }
            Err(err) => {
                warn!(%id, error = %err, "delete not confirmed by server");
                self.last_error = Some(err.clone());
                Err(GateError::Transport(err))
            }
        }
    }
}
