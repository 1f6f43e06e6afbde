//! Search filtering over the collection.

use crate::person::Person;

/// Whether `person` matches `query`: first name, last name or email contains
/// it, ignoring case.
pub fn matches_query(person: &Person, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        &person.details.first_name,
        &person.details.last_name,
        &person.details.email,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// The subsequence of `records` matching `query`, in collection order.
pub fn filter_view<'a>(records: &'a [Person], query: &str) -> Vec<&'a Person> {
    records
        .iter()
        .filter(|person| matches_query(person, query))
        .collect()
}
