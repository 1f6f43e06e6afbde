//! HTTP transport for the remote collection.
//!
//! ## Routes
//!
//! | Call   | Request                       |
//! |--------|-------------------------------|
//! | list   | `GET {endpoint}`              |
//! | create | `POST {endpoint}` + JSON body |
//! | update | `PUT {endpoint}?id={id}` + JSON body |
//! | delete | `DELETE {endpoint}?id={id}`   |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use super::wire;
use super::{Acknowledgement, RemoteCollection};
use crate::config::RemoteSettings;
use crate::error::{Operation, TransportError};
use crate::person::{Person, PersonDraft, PersonId};

/// reqwest-backed `RemoteCollection`.
#[derive(Debug, Clone)]
pub struct HttpRemoteCollection {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpRemoteCollection {
    /// Build a client for the collection at `endpoint` (full URL, e.g.
    /// `http://localhost:6011/REST/ppl`) with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn from_settings(settings: &RemoteSettings) -> Result<Self, reqwest::Error> {
        Self::new(settings.endpoint(), settings.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, operation: Operation, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                operation,
                after: self.timeout,
            }
        } else {
            TransportError::Network {
                operation,
                message: err.to_string(),
            }
        }
    }

    /// Send a request and return the body of a success response.
    async fn execute(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%operation, status = status.as_u16(), "remote collection rejected request");
            return Err(TransportError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        debug!(
            %operation,
            status = status.as_u16(),
            bytes = body.len(),
            "remote collection responded"
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RemoteCollection for HttpRemoteCollection {
    async fn list(&self) -> Result<Vec<Person>, TransportError> {
        let body = self
            .execute(Operation::List, self.client.get(&self.endpoint))
            .await?;
        wire::decode_list(&body)
    }

    async fn create(&self, draft: &PersonDraft) -> Result<Person, TransportError> {
        let body = self
            .execute(Operation::Create, self.client.post(&self.endpoint).json(draft))
            .await?;
        wire::decode_record(Operation::Create, &body)
    }

    async fn update(&self, id: &PersonId, person: &Person) -> Result<Person, TransportError> {
        let request = self
            .client
            .put(&self.endpoint)
            .query(&[("id", id.to_string())])
            .json(person);
        let body = self.execute(Operation::Update, request).await?;
        wire::decode_record(Operation::Update, &body)
    }

    async fn delete(&self, id: &PersonId) -> Result<Acknowledgement, TransportError> {
        let request = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", id.to_string())]);
        let body = self.execute(Operation::Delete, request).await?;
        wire::decode_ack(&body)
    }
}
