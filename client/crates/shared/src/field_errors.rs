//! Field Errors
//!
//! Mapping of field name to a single human-readable message.
//! A field without an entry passed validation. This is the shape every
//! presentation layer consumes, so it serializes as a flat JSON object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key used for errors that belong to the submit action rather than a field
pub const SUBMIT_FIELD: &str = "submit";

/// Field name → message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping holding only a `submit` entry
    pub fn submit(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(SUBMIT_FIELD, message);
        errors
    }

    /// Set the message for a field, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Record a message only if the field has none yet
    ///
    /// Rules are checked in priority order, so the first violation wins.
    pub fn insert_first(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `true` when no field has an error
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
