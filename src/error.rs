use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The four calls the remote collection supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Failure of a remote collection call.
///
/// Messages are held as strings so the error stays `Clone` and can be kept
/// around by the list, form and delete gate for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: Operation,
        status: u16,
        body: String,
    },
    /// The request never produced a response.
    #[error("{operation} failed: {message}")]
    Network { operation: Operation, message: String },
    /// The response body did not match the wire schema.
    #[error("{operation} returned an unreadable body: {message}")]
    Decode { operation: Operation, message: String },
    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: Operation, after: Duration },
    #[error("{operation} was cancelled")]
    Cancelled { operation: Operation },
}

impl TransportError {
    pub fn operation(&self) -> Operation {
        match self {
            TransportError::Status { operation, .. }
            | TransportError::Network { operation, .. }
            | TransportError::Decode { operation, .. }
            | TransportError::Timeout { operation, .. }
            | TransportError::Cancelled { operation } => *operation,
        }
    }

    /// HTTP status when the server responded, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
