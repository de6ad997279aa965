use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FormError;

/// The longest allowed reference, in characters.
pub const REFERENCE_MAX_LENGTH: usize = 255;

/// Identifies a field within a form, e.g. `address/street`.
///
/// A reference is non-empty, at most [`REFERENCE_MAX_LENGTH`] characters
/// long and contains no whitespace, control characters or commas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Reference(String);

impl Reference {
    /// The reference as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Reference {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let length = value.chars().count();
        if length == 0 || length > REFERENCE_MAX_LENGTH {
            return Err(FormError::InvalidReference(format!(
                "Reference \"{value}\" must be between 1 and {REFERENCE_MAX_LENGTH} characters"
            )));
        }

        if let Some(character) = value
            .chars()
            .find(|character| character.is_whitespace() || character.is_control() || *character == ',')
        {
            return Err(FormError::InvalidReference(format!(
                "Reference \"{value}\" contains {character:?}"
            )));
        }

        Ok(Self(value))
    }
}

impl FromStr for Reference {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reference::try_from(s.to_owned())
    }
}

impl From<Reference> for String {
    fn from(value: Reference) -> Self {
        value.0
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
