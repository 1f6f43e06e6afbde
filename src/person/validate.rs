//! Required-field checks for a draft before it may be written.

use std::collections::BTreeMap;
use std::fmt;

use super::PersonDraft;

/// Fields that carry a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Dob,
}

impl Field {
    /// Wire/form name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Dob => "dob",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to message, one entry per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Check the required fields of a draft.
///
/// Only the empty string fails; whitespace is accepted as typed. No rule
/// applies to middle name, description or the sex flag.
pub fn validate(draft: &PersonDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.first_name.is_empty() {
        errors.insert(Field::FirstName, "First name is required");
    }
    if draft.last_name.is_empty() {
        errors.insert(Field::LastName, "Last name is required");
    }
    if draft.email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    }
    if draft.dob.is_empty() {
        errors.insert(Field::Dob, "Date of birth is required");
    }
    errors
}
