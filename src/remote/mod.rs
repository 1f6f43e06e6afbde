//! Remote Collection - the REST resource holding the authoritative records.
//!
//! `RemoteCollection` is the seam the list controller depends on. Two
//! implementations ship with the crate:
//!
//! - `HttpRemoteCollection` talks to a `/REST/ppl`-style endpoint with reqwest.
//! - `InMemoryRemoteCollection` keeps the collection in process memory, with
//!   failure and latency injection for tests and offline development.
//!
//! ## Example
//!
//! ```ignore
//! use people_sync::{HttpRemoteCollection, ListController, RemoteCollection};
//!
//! let remote = HttpRemoteCollection::new("http://localhost:6011/REST/ppl", timeout)?;
//! let people = remote.list().await?;
//! ```

mod http;
mod in_memory;
pub(crate) mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::person::{Person, PersonDraft, PersonId};

pub use http::HttpRemoteCollection;
pub use in_memory::InMemoryRemoteCollection;

/// Whatever the server sent back for a delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement(pub Value);

/// The four calls against a single REST collection.
///
/// Implementations keep no state about the caller between calls. Every
/// non-success outcome is a `TransportError`; nothing is swallowed.
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Fetch every record, in server order.
    async fn list(&self) -> Result<Vec<Person>, TransportError>;

    /// Submit a draft; returns the record with its server-assigned id.
    async fn create(&self, draft: &PersonDraft) -> Result<Person, TransportError>;

    /// Replace the record stored under `id`; returns the server's version.
    async fn update(&self, id: &PersonId, person: &Person) -> Result<Person, TransportError>;

    /// Remove the record stored under `id`.
    async fn delete(&self, id: &PersonId) -> Result<Acknowledgement, TransportError>;
}

#[async_trait]
impl<T: RemoteCollection + ?Sized> RemoteCollection for Arc<T> {
    async fn list(&self) -> Result<Vec<Person>, TransportError> {
        (**self).list().await
    }

    async fn create(&self, draft: &PersonDraft) -> Result<Person, TransportError> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &PersonId, person: &Person) -> Result<Person, TransportError> {
        (**self).update(id, person).await
    }

    async fn delete(&self, id: &PersonId) -> Result<Acknowledgement, TransportError> {
        (**self).delete(id).await
    }
}
