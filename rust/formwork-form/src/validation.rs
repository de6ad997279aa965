use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Reference;

/// A problem found with one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    reference: Reference,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl ValidationError {
    /// Creates a new [`ValidationError`] without an associated value.
    pub fn new(reference: Reference, message: impl Into<String>) -> Self {
        Self {
            reference,
            message: message.into(),
            value: None,
        }
    }

    /// Returns a copy carrying `value`.
    pub fn with_value(self, value: Option<Value>) -> Self {
        Self { value, ..self }
    }

    /// The field the error is attributed to.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Human readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending value, if recorded.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reference, self.message)
    }
}
