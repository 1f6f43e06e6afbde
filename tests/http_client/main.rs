//! HTTP transport integration tests.
//!
//! Starts a fake axum collection server and drives `HttpRemoteCollection`
//! against it, directly and through the list controller.


use std::time::Duration;

use people_sync::{
    DeleteGate, FormController, FormInput, HttpRemoteCollection, ListController, Operation,
    PersonDraft, PersonId, RemoteCollection, TransportError,
};
use serde_json::{json, Value};
use server::{FakeServer, Flavor, COLLECTION_PATH};

fn ann_json() -> Value {
    json!({
        "firstName": "Ann",
        "middleName": "",
        "lastName": "Lee",
        "email": "ann@x.com",
        "description": "",
        "dob": "1990-04-01",
        "isMale": false
    })
}

fn bo_draft() -> PersonDraft {
    PersonDraft::new("Bo", "Ng", "bo@x.com", "2000-01-01").with_is_male(true)
}

async fn client_for(server: &FakeServer) -> HttpRemoteCollection {
    let base = server.start().await;
    HttpRemoteCollection::new(format!("{base}{COLLECTION_PATH}"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_decodes_canonical_records() {
    let server = FakeServer::new(Flavor::Canonical);
    server.seed(ann_json());
    let remote = client_for(&server).await;

    let people = remote.list().await.unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people[0].id, PersonId::Number(1));
    assert_eq!(people[0].details.first_name, "Ann");
    assert_eq!(people[0].details.dob, "1990-04-01");
}

#[tokio::test]
async fn create_sends_camel_case_draft_without_id() {
    let server = FakeServer::new(Flavor::Canonical);
    let remote = client_for(&server).await;

    let created = remote.create(&bo_draft()).await.unwrap();

    assert_eq!(created.id, PersonId::Number(1));
    assert_eq!(created.details, bo_draft());

    let received = server.received();
    let body = received[0].body.as_ref().unwrap();
    assert_eq!(received[0].method, "POST");
    assert!(body.get("id").is_none());
    assert_eq!(body["firstName"], json!("Bo"));
    assert_eq!(body["isMale"], json!(true));
}

#[tokio::test]
async fn update_targets_id_query_with_full_record() {
    let server = FakeServer::new(Flavor::Canonical);
    let id = server.seed(ann_json());
    let remote = client_for(&server).await;

    let mut person = remote.list().await.unwrap().remove(0);
    person.details.last_name = "Lee2".into();
    let updated = remote.update(&PersonId::Number(id), &person).await.unwrap();

    assert_eq!(updated.details.last_name, "Lee2");
    let put = server.received().into_iter().find(|r| r.method == "PUT").unwrap();
    assert_eq!(put.id.as_deref(), Some("1"));
    let body = put.body.unwrap();
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["lastName"], json!("Lee2"));
    assert_eq!(server.people()[0]["lastName"], json!("Lee2"));
}

#[tokio::test]
async fn delete_returns_acknowledgement() {
    let server = FakeServer::new(Flavor::Canonical);
    let id = server.seed(ann_json());
    let remote = client_for(&server).await;

    let ack = remote.delete(&PersonId::Number(id)).await.unwrap();

    assert_eq!(ack.0["message"], json!("deleted"));
    assert!(server.people().is_empty());
}

#[tokio::test]
async fn legacy_envelopes_and_snake_case_are_normalized() {
    let server = FakeServer::new(Flavor::Legacy);
    server.seed(ann_json());
    let remote = client_for(&server).await;

    let people = remote.list().await.unwrap();
    assert_eq!(people[0].details.first_name, "Ann");
    assert_eq!(people[0].details.last_name, "Lee");

    let created = remote.create(&bo_draft()).await.unwrap();
    assert_eq!(created.id, PersonId::Number(2));
    assert_eq!(created.details, bo_draft());

    let ack = remote.delete(&created.id).await.unwrap();
    assert_eq!(ack.0, Value::Null);
}

#[test_log::test(tokio::test)]
async fn non_success_status_becomes_transport_error() {
    let server = FakeServer::new(Flavor::Canonical);
    let remote = client_for(&server).await;

    server.fail_next(503);
    let err = remote.list().await.unwrap_err();
    assert_eq!(err.operation(), Operation::List);
    assert_eq!(err.status(), Some(503));

    let err = remote.delete(&PersonId::Number(99)).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        TransportError::Status { body, .. } => assert!(body.contains("not found")),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let remote =
        HttpRemoteCollection::new(format!("http://{addr}{COLLECTION_PATH}"), Duration::from_secs(5))
            .unwrap();

    let err = remote.list().await.unwrap_err();

    assert!(matches!(
        err,
        TransportError::Network {
            operation: Operation::List,
            ..
        }
    ));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = FakeServer::new(Flavor::Canonical);
    server.set_delay(Duration::from_millis(500));
    let base = server.start().await;
    let remote =
        HttpRemoteCollection::new(format!("{base}{COLLECTION_PATH}"), Duration::from_millis(50))
            .unwrap();

    let err = remote.list().await.unwrap_err();

    assert!(matches!(err, TransportError::Timeout { .. }));
}

#[test_log::test(tokio::test)]
async fn full_flow_through_controllers() {
    let server = FakeServer::new(Flavor::Canonical);
    server.seed(ann_json());
    let remote = client_for(&server).await;
    let mut list = ListController::new(remote);
    list.initialize().await.unwrap();

    // Create via the form.
    let mut form = FormController::new();
    form.open_create();
    form.apply(FormInput::FirstName("Bo".into()));
    form.apply(FormInput::LastName("Ng".into()));
    form.apply(FormInput::Email("bo@x.com".into()));
    form.apply(FormInput::Dob("2000-01-01".into()));
    let bo = form.submit(&mut list).await.unwrap();
    assert_eq!(list.records().len(), 2);

    // Update Ann via the form.
    let ann = list.get(&PersonId::Number(1)).cloned().unwrap();
    form.open_update(&ann);
    form.apply(FormInput::LastName("Lee2".into()));
    form.submit(&mut list).await.unwrap();
    assert_eq!(list.get(&PersonId::Number(1)).unwrap().details.last_name, "Lee2");

    // Search.
    list.set_query("ng");
    assert_eq!(list.visible().len(), 1);
    list.clear_query();

    // Delete Bo through the gate.
    let mut gate = DeleteGate::new();
    gate.request(bo.id.clone());
    gate.confirm(&mut list).await.unwrap();

    assert_eq!(list.records().len(), 1);
    let server_people = server.people();
    assert_eq!(server_people.len(), 1);
    assert_eq!(server_people[0]["lastName"], json!("Lee2"));
}
