//! Person records as they live in the form (draft) and in the list (persisted).
//!
//! A `PersonDraft` has no identity; it only becomes a `Person` by coming back
//! from the remote collection's create call carrying a server-assigned id.
//!
//! The serde derives here are the canonical camelCase wire form. Legacy
//! response shapes are normalized in `remote::wire` before they reach these
//! types.

mod validate;

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

pub use validate::{validate, Field, FieldErrors};

/// Server-assigned, opaque record identity.
///
/// Kept in the shape the server sent it so it round-trips unchanged. Equality
/// and hashing go through the `?id=` form, so `1` and `"1"` are one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonId::Number(n) => write!(f, "{}", n),
            PersonId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for PersonId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PersonId::Number(a), PersonId::Number(b)) => a == b,
            (PersonId::Text(a), PersonId::Text(b)) => a == b,
            _ => self.wire_key() == other.wire_key(),
        }
    }
}

impl Eq for PersonId {}

impl Hash for PersonId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wire_key().hash(state);
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        PersonId::Number(value)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        PersonId::Text(value.to_string())
    }
}

impl From<String> for PersonId {
    fn from(value: String) -> Self {
        PersonId::Text(value)
    }
}

impl PersonId {
    /// Parse user input (e.g. a CLI argument): digits become `Number`,
    /// anything else stays `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => PersonId::Number(n),
            Err(_) => PersonId::Text(raw.to_string()),
        }
    }

    /// The form sent as the `id` query parameter.
    pub fn wire_key(&self) -> Cow<'_, str> {
        match self {
            PersonId::Number(n) => Cow::Owned(n.to_string()),
            PersonId::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Field values of a person without identity.
///
/// Optional text fields use the empty string for "absent", matching how the
/// form edits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub description: String,
    /// ISO date (`YYYY-MM-DD`).
    pub dob: String,
    pub is_male: bool,
}

impl PersonDraft {
    pub fn new(first_name: &str, last_name: &str, email: &str, dob: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            dob: dob.to_string(),
            ..Self::default()
        }
    }

    pub fn with_middle_name(mut self, middle_name: &str) -> Self {
        self.middle_name = middle_name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_is_male(mut self, is_male: bool) -> Self {
        self.is_male = is_male;
        self
    }
}

/// A persisted person: server identity plus field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(flatten)]
    pub details: PersonDraft,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, details: PersonDraft) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    /// First, middle (when present) and last name joined by spaces.
    pub fn display_name(&self) -> String {
        [
            self.details.first_name.as_str(),
            self.details.middle_name.as_str(),
            self.details.last_name.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Date of birth as a calendar date.
    ///
    /// Accepts a plain ISO date or a full RFC 3339 timestamp (some servers
    /// echo dates back with a time part). `None` when neither parses.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let raw = self.details.dob.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }
}
