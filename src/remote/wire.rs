//! Response normalization at the remote collection boundary.
//!
//! Requests always go out in the canonical camelCase form (the serde derives
//! on `Person` / `PersonDraft`). Responses are read leniently: bare values or
//! a `{ "data": ... }` envelope, camelCase or snake_case field names, missing
//! or `null` optional fields. Everything is turned into domain types here so
//! the list controller only ever sees one shape.

use serde::Deserialize;
use serde_json::Value;

use super::Acknowledgement;
use crate::error::{Operation, TransportError};
use crate::person::{Person, PersonDraft, PersonId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePerson {
    #[serde(default)]
    id: Option<PersonId>,
    #[serde(default, alias = "first_name")]
    first_name: Option<String>,
    #[serde(default, alias = "middle_name")]
    middle_name: Option<String>,
    #[serde(default, alias = "last_name")]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    dob: Option<String>,
    #[serde(default, alias = "is_male")]
    is_male: Option<bool>,
}

impl WirePerson {
    fn into_person(self, operation: Operation) -> Result<Person, TransportError> {
        let id = self.id.ok_or_else(|| TransportError::Decode {
            operation,
            message: "record has no id".to_string(),
        })?;
        Ok(Person {
            id,
            details: PersonDraft {
                first_name: self.first_name.unwrap_or_default(),
                middle_name: self.middle_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
                dob: self.dob.unwrap_or_default(),
                is_male: self.is_male.unwrap_or(false),
            },
        })
    }
}

// Wrapped is listed first: a bare record would otherwise swallow `{data: ..}`
// since every field of `WirePerson` is optional.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Wrapped { data: Vec<WirePerson> },
    Bare(Option<Vec<WirePerson>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<WirePerson>),
    One(WirePerson),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordBody {
    Wrapped { data: OneOrMany },
    Bare(WirePerson),
}

fn parse<'a, T: Deserialize<'a>>(
    operation: Operation,
    bytes: &'a [u8],
) -> Result<T, TransportError> {
    serde_json::from_slice(bytes).map_err(|e| TransportError::Decode {
        operation,
        message: e.to_string(),
    })
}

/// Decode a list response into persisted records. An empty or `null` body is
/// an empty collection.
pub(crate) fn decode_list(bytes: &[u8]) -> Result<Vec<Person>, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let records = match parse::<ListBody>(Operation::List, bytes)? {
        ListBody::Wrapped { data } => data,
        ListBody::Bare(data) => data.unwrap_or_default(),
    };
    records
        .into_iter()
        .map(|record| record.into_person(Operation::List))
        .collect()
}

/// Decode a create/update response into the single record it carries.
pub(crate) fn decode_record(operation: Operation, bytes: &[u8]) -> Result<Person, TransportError> {
    let record = match parse::<RecordBody>(operation, bytes)? {
        RecordBody::Bare(record) => record,
        RecordBody::Wrapped {
            data: OneOrMany::One(record),
        } => record,
        RecordBody::Wrapped {
            data: OneOrMany::Many(records),
        } => records
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::Decode {
                operation,
                message: "empty data envelope".to_string(),
            })?,
    };
    record.into_person(operation)
}

/// Decode a delete acknowledgement. An empty body is accepted.
pub(crate) fn decode_ack(bytes: &[u8]) -> Result<Acknowledgement, TransportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Acknowledgement(Value::Null));
    }
    parse::<Value>(Operation::Delete, bytes).map(Acknowledgement)
}
