//! Fixtures for list controller tests.

use std::collections::HashSet;

use async_trait::async_trait;
use people_sync::{
    Acknowledgement, InMemoryRemoteCollection, ListController, Person, PersonDraft, PersonId,
    RemoteCollection, TransportError,
};
use serde_json::Value;

pub fn ann() -> Person {
    Person::new(1_i64, PersonDraft::new("Ann", "Lee", "ann@x.com", "1990-04-01"))
}

pub fn cy() -> Person {
    Person::new(2_i64, PersonDraft::new("Cy", "Park", "cy@z.net", "1985-07-12"))
}

pub fn bo_draft() -> PersonDraft {
    PersonDraft::new("Bo", "Ng", "bo@x.com", "2000-01-01")
}

/// A remote seeded with `records` and a controller already loaded from it.
pub async fn loaded(
    records: Vec<Person>,
) -> (InMemoryRemoteCollection, ListController<InMemoryRemoteCollection>) {
    let remote = InMemoryRemoteCollection::with_records(records);
    let mut list = ListController::new(remote.clone());
    list.initialize().await.unwrap();
    (remote, list)
}

pub fn assert_unique_ids(records: &[Person]) {
    let mut seen = HashSet::new();
    for person in records {
        assert!(seen.insert(person.id.clone()), "duplicate id {}", person.id);
    }
}

/// A misbehaving server that hands out the same id for every create.
pub struct FixedIdRemote {
    pub id: PersonId,
}

#[async_trait]
impl RemoteCollection for FixedIdRemote {
    async fn list(&self) -> Result<Vec<Person>, TransportError> {
        Ok(Vec::new())
    }

    async fn create(&self, draft: &PersonDraft) -> Result<Person, TransportError> {
        Ok(Person::new(self.id.clone(), draft.clone()))
    }

    async fn update(&self, _id: &PersonId, person: &Person) -> Result<Person, TransportError> {
        Ok(person.clone())
    }

    async fn delete(&self, _id: &PersonId) -> Result<Acknowledgement, TransportError> {
        Ok(Acknowledgement(Value::Null))
    }
}
