//! List Controller - owner of the local person collection.
//!
//! The controller keeps an in-memory copy of the remote collection and applies
//! a mutation locally only after the remote call for it succeeded. There is no
//! optimistic update: what the collection holds has been confirmed by the
//! server.
//!
//! Mutations take `&mut self`, so they are serialized by construction. Every
//! remote call is bounded by a timeout and aborted when the controller's
//! cancellation token fires (see [`ListController::shutdown`]).
//!
//! ## Example
//!
//! ```ignore
//! use people_sync::{InMemoryRemoteCollection, ListController, PersonDraft};
//!
//! let mut list = ListController::new(InMemoryRemoteCollection::new());
//! list.initialize().await?;
//! list.create(&PersonDraft::new("Bo", "Ng", "bo@x.com", "2000-01-01")).await?;
//! list.set_query("bo");
//! assert_eq!(list.visible().len(), 1);
//! ```

mod filter;

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::{Operation, TransportError};
use crate::person::{Person, PersonDraft, PersonId};
use crate::remote::{Acknowledgement, RemoteCollection};

pub use filter::{filter_view, matches_query};

/// Outcome of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    /// The collection is empty because loading failed, not because the
    /// server has no records. Offer a retry.
    Failed(TransportError),
}

pub struct ListController<C> {
    remote: C,
    records: Vec<Person>,
    query: String,
    load_state: LoadState,
    call_timeout: Duration,
    cancel: CancellationToken,
}

impl<C: RemoteCollection> ListController<C> {
    pub fn new(remote: C) -> Self {
        Self {
            remote,
            records: Vec::new(),
            query: String::new(),
            load_state: LoadState::NotLoaded,
            call_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            cancel: CancellationToken::new(),
        }
    }

    /// Bound every remote call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Tie in-flight calls to an externally owned token (e.g. the lifetime of
    /// the view showing this list).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn remote(&self) -> &C {
        &self.remote
    }

    /// Cancel in-flight calls and refuse new ones.
    pub fn shutdown(&self) {
        debug!("list controller shutting down");
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The authoritative collection, in server/append order.
    pub fn records(&self) -> &[Person] {
        &self.records
    }

    pub fn get(&self, id: &PersonId) -> Option<&Person> {
        self.records.iter().find(|p| &p.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Records matching the current query. Recomputed on every call, so it
    /// always reflects the latest collection.
    pub fn filtered(&self) -> Vec<&Person> {
        filter_view(&self.records, &self.query)
    }

    /// What a list view should show: the filtered view while a query is
    /// active, the whole collection otherwise.
    pub fn visible(&self) -> Vec<&Person> {
        if self.query.is_empty() {
            self.records.iter().collect()
        } else {
            self.filtered()
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Replace the collection with the server's list.
    ///
    /// On failure the collection is emptied and `load_state` records the
    /// error, so an empty list is never mistaken for ground truth.
    pub async fn initialize(&mut self) -> Result<usize, TransportError> {
        let remote = &self.remote;
        match self.guarded(Operation::List, remote.list()).await {
            Ok(people) => {
                self.records = dedup_by_id(people);
                self.load_state = LoadState::Loaded;
                info!(count = self.records.len(), "person list loaded");
                Ok(self.records.len())
            }
            Err(err) => {
                warn!(error = %err, "person list failed to load");
                self.records.clear();
                self.load_state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Load again after a failure (or to refresh).
    pub async fn retry(&mut self) -> Result<usize, TransportError> {
        self.initialize().await
    }

    /// Create `draft` remotely and append the persisted record.
    pub async fn create(&mut self, draft: &PersonDraft) -> Result<Person, TransportError> {
        let remote = &self.remote;
        let person = self
            .guarded(Operation::Create, remote.create(draft))
            .await
            .inspect_err(|err| warn!(error = %err, "create failed"))?;

        match self.records.iter_mut().find(|p| p.id == person.id) {
            Some(existing) => {
                warn!(
                    id = %person.id,
                    "server returned an id already in the list, replacing entry"
                );
                *existing = person.clone();
            }
            None => self.records.push(person.clone()),
        }
        info!(id = %person.id, "person created");
        Ok(person)
    }

    /// Update the record under `id` remotely, then replace the local entry
    /// with the server's version. No local entry for `id` leaves the
    /// collection untouched.
    pub async fn update(
        &mut self,
        id: &PersonId,
        details: &PersonDraft,
    ) -> Result<Person, TransportError> {
        let outgoing = Person::new(id.clone(), details.clone());
        let remote = &self.remote;
        let mut person = self
            .guarded(Operation::Update, remote.update(id, &outgoing))
            .await
            .inspect_err(|err| warn!(%id, error = %err, "update failed"))?;

        if &person.id != id {
            warn!(
                %id,
                returned = %person.id,
                "server echoed a different id, keeping the requested one"
            );
            person.id = id.clone();
        }

        match self.records.iter_mut().find(|p| &p.id == id) {
            Some(existing) => {
                *existing = person.clone();
                info!(%id, "person updated");
            }
            None => warn!(%id, "updated person is not in the list"),
        }
        Ok(person)
    }

    /// Delete the record under `id` remotely, then drop it locally.
    pub async fn delete(&mut self, id: &PersonId) -> Result<Acknowledgement, TransportError> {
        let remote = &self.remote;
        let ack = self
            .guarded(Operation::Delete, remote.delete(id))
            .await
            .inspect_err(|err| warn!(%id, error = %err, "delete failed"))?;

        let before = self.records.len();
        self.records.retain(|p| &p.id != id);
        if self.records.len() < before {
            info!(%id, "person deleted");
        } else {
            debug!(%id, "deleted person was not in the list");
        }
        Ok(ack)
    }

    /// Set the search query. An empty query shows the whole collection.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        debug!(query = %self.query, "search query changed");
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Run a remote call under the controller's timeout and cancellation.
    async fn guarded<T>(
        &self,
        operation: Operation,
        call: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, TransportError> {
        if self.cancel.is_cancelled() {
            return Err(TransportError::Cancelled { operation });
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(TransportError::Cancelled { operation }),
            result = tokio::time::timeout(self.call_timeout, call) => match result {
                Ok(inner) => inner,
                Err(_) => Err(TransportError::Timeout {
                    operation,
                    after: self.call_timeout,
                }),
            },
        }
    }
}

/// Keep the first record for each id.
fn dedup_by_id(people: Vec<Person>) -> Vec<Person> {
    let mut kept: Vec<Person> = Vec::with_capacity(people.len());
    for person in people {
        if kept.iter().any(|p| p.id == person.id) {
            warn!(id = %person.id, "server listed a duplicate id, dropping it");
            continue;
        }
        kept.push(person);
    }
    kept
}
