//! InMemoryRemoteCollection - process-local stand-in for the REST resource.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{Acknowledgement, RemoteCollection};
use crate::error::{Operation, TransportError};
use crate::person::{Person, PersonDraft, PersonId};

#[derive(Default)]
struct ServerState {
    records: Vec<Person>,
    next_id: i64,
    failures: HashMap<Operation, VecDeque<u16>>,
    calls: HashMap<Operation, usize>,
    latency: Option<Duration>,
}

impl ServerState {
    fn take_failure(&mut self, operation: Operation) -> Option<TransportError> {
        let status = self.failures.get_mut(&operation)?.pop_front()?;
        Some(TransportError::Status {
            operation,
            status,
            body: json!({ "error": "injected failure" }).to_string(),
        })
    }

    fn not_found(operation: Operation, id: &PersonId) -> TransportError {
        TransportError::Status {
            operation,
            status: 404,
            body: json!({ "error": format!("person {} not found", id) }).to_string(),
        }
    }
}

/// In-memory remote collection that behaves like the REST server.
///
/// Numeric ids are assigned in sequence. Clone-friendly via Arc, so a test
/// can keep a handle to inspect "server-side" state while a controller owns
/// another.
#[derive(Clone, Default)]
pub struct InMemoryRemoteCollection {
    state: Arc<RwLock<ServerState>>,
}

impl InMemoryRemoteCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection pre-populated with persisted records.
    pub fn with_records(records: Vec<Person>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|p| p.id.wire_key().parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            state: Arc::new(RwLock::new(ServerState {
                records,
                next_id,
                ..ServerState::default()
            })),
        }
    }

    /// Make the next call of `operation` fail with `status`. Queues up.
    pub fn fail_next(&self, operation: Operation, status: u16) {
        if let Ok(mut state) = self.state.write() {
            state.failures.entry(operation).or_default().push_back(status);
        }
    }

    /// Delay every call by `latency` before it touches the collection.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut state) = self.state.write() {
            state.latency = latency;
        }
    }

    /// Snapshot of the server-side records.
    pub fn records(&self) -> Vec<Person> {
        self.state
            .read()
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    /// Number of calls received for `operation`, including failed ones.
    pub fn calls(&self, operation: Operation) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    async fn enter(&self, operation: Operation) -> Result<(), TransportError> {
        let latency = {
            let mut state = self.write(operation)?;
            *state.calls.entry(operation).or_default() += 1;
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }

    fn write(
        &self,
        operation: Operation,
    ) -> Result<std::sync::RwLockWriteGuard<'_, ServerState>, TransportError> {
        self.state.write().map_err(|_| TransportError::Network {
            operation,
            message: "lock poisoned".into(),
        })
    }
}

#[async_trait]
impl RemoteCollection for InMemoryRemoteCollection {
    async fn list(&self) -> Result<Vec<Person>, TransportError> {
        self.enter(Operation::List).await?;
        let mut state = self.write(Operation::List)?;
        if let Some(err) = state.take_failure(Operation::List) {
            return Err(err);
        }
        Ok(state.records.clone())
    }

    async fn create(&self, draft: &PersonDraft) -> Result<Person, TransportError> {
        self.enter(Operation::Create).await?;
        let mut state = self.write(Operation::Create)?;
        if let Some(err) = state.take_failure(Operation::Create) {
            return Err(err);
        }
        state.next_id += 1;
        let person = Person::new(state.next_id, draft.clone());
        state.records.push(person.clone());
        Ok(person)
    }

    async fn update(&self, id: &PersonId, person: &Person) -> Result<Person, TransportError> {
        self.enter(Operation::Update).await?;
        let mut state = self.write(Operation::Update)?;
        if let Some(err) = state.take_failure(Operation::Update) {
            return Err(err);
        }
        let slot = state
            .records
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ServerState::not_found(Operation::Update, id))?;
        *slot = Person::new(id.clone(), person.details.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &PersonId) -> Result<Acknowledgement, TransportError> {
        self.enter(Operation::Delete).await?;
        let mut state = self.write(Operation::Delete)?;
        if let Some(err) = state.take_failure(Operation::Delete) {
            return Err(err);
        }
        let before = state.records.len();
        state.records.retain(|p| &p.id != id);
        if state.records.len() == before {
            return Err(ServerState::not_found(Operation::Delete, id));
        }
        Ok(Acknowledgement(json!({ "id": id })))
    }
}
