//! Validated plugin names.
//!
//! A [`Name`] starts with an ASCII letter, continues with ASCII letters,
//! digits or `-`, and is between [`NAME_MIN_LENGTH`] and [`NAME_MAX_LENGTH`]
//! characters long. Comparison is case-sensitive.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::text::serde_via_text;
use crate::{PluginError, PluginKind};

/// The shortest allowed name, in characters.
pub const NAME_MIN_LENGTH: usize = 1;

/// The longest allowed name, in characters.
pub const NAME_MAX_LENGTH: usize = 255;

/// Returns true if `character` may start a name.
pub fn is_name_initial(character: char) -> bool {
    character.is_ascii_alphabetic()
}

/// Returns true if `character` may appear after the first character of a name.
pub fn is_name_part(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '-'
}

/// Checks `text` against the name rules without building a [`Name`].
///
/// Other identifier types that follow the same rules (form names, for
/// example) validate through this function.
pub fn validate_name(text: &str) -> Result<(), PluginError> {
    let length = text.chars().count();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&length) {
        return Err(PluginError::InvalidLength {
            text: text.to_owned(),
            length,
            min: NAME_MIN_LENGTH,
            max: NAME_MAX_LENGTH,
        });
    }

    for (position, character) in text.chars().enumerate() {
        let valid = if position == 0 {
            is_name_initial(character)
        } else {
            is_name_part(character)
        };
        if !valid {
            return Err(PluginError::InvalidCharacter {
                text: text.to_owned(),
                character,
                position,
            });
        }
    }

    Ok(())
}

/// The name of a plugin of kind `K`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name<K: PluginKind> {
    text: Cow<'static, str>,
    kind: PhantomData<K>,
}

impl<K: PluginKind> Name<K> {
    /// Builds a well-known name at compile time.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `text` breaks the
    /// name rules.
    pub const fn constant(text: &'static str) -> Self {
        let bytes = text.as_bytes();
        assert!(
            bytes.len() >= NAME_MIN_LENGTH && bytes.len() <= NAME_MAX_LENGTH,
            "name length out of range"
        );
        assert!(bytes[0].is_ascii_alphabetic(), "name must start with a letter");
        let mut i = 1;
        while i < bytes.len() {
            assert!(
                bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-',
                "name may only contain letters, digits and '-'"
            );
            i += 1;
        }
        Self {
            text: Cow::Borrowed(text),
            kind: PhantomData,
        }
    }

    /// Parses and validates a name. Text equal to one of the kind's
    /// [`PluginKind::CONSTANTS`] yields that constant.
    pub fn parse(text: &str) -> Result<Self, PluginError> {
        validate_name(text)?;

        if let Some(constant) = K::CONSTANTS.iter().find(|constant| **constant == text) {
            return Ok(Self {
                text: Cow::Borrowed(constant),
                kind: PhantomData,
            });
        }

        Ok(Self {
            text: Cow::Owned(text.to_owned()),
            kind: PhantomData,
        })
    }

    /// The name as text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if this name shares the text of a well-known constant.
    pub fn is_constant(&self) -> bool {
        matches!(self.text, Cow::Borrowed(_))
    }

    /// Length in characters.
    pub(crate) fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl<K: PluginKind> AsRef<str> for Name<K> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<K: PluginKind> fmt::Debug for Name<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name").field(&self.as_str()).finish()
    }
}

impl<K: PluginKind> fmt::Display for Name<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<K: PluginKind> FromStr for Name<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<K: PluginKind> TryFrom<String> for Name<K> {
    type Error = PluginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<K: PluginKind> From<Name<K>> for String {
    fn from(value: Name<K>) -> Self {
        value.text.into_owned()
    }
}

serde_via_text!(Name);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::Widget;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_a_valid_name() {
        let name = Name::<Widget>::parse("text-length2").unwrap();
        assert_eq!(name.as_str(), "text-length2");
        assert!(!name.is_constant());
    }

    #[test]
    fn it_round_trips_through_display() {
        for text in ["a", "non-null", "Z9-z", &"x".repeat(NAME_MAX_LENGTH)] {
            let name = Name::<Widget>::parse(text).unwrap();
            assert_eq!(Name::<Widget>::parse(&name.to_string()).unwrap(), name);
        }
    }

    #[test]
    fn it_rejects_an_invalid_initial() {
        assert_eq!(
            Name::<Widget>::parse("1abc"),
            Err(PluginError::InvalidCharacter {
                text: "1abc".into(),
                character: '1',
                position: 0,
            })
        );
    }

    #[test]
    fn it_rejects_an_invalid_part() {
        assert_eq!(
            Name::<Widget>::parse("abc$def"),
            Err(PluginError::InvalidCharacter {
                text: "abc$def".into(),
                character: '$',
                position: 3,
            })
        );
    }

    #[test]
    fn it_reports_character_offsets_not_byte_offsets() {
        let error = Name::<Widget>::parse("ab\u{e9}").unwrap_err();
        assert_eq!(
            error,
            PluginError::InvalidCharacter {
                text: "ab\u{e9}".into(),
                character: '\u{e9}',
                position: 2,
            }
        );
    }

    #[test]
    fn it_rejects_empty_and_overlong_names() {
        assert!(matches!(
            Name::<Widget>::parse(""),
            Err(PluginError::InvalidLength { length: 0, .. })
        ));
        let long = "a".repeat(NAME_MAX_LENGTH + 1);
        assert!(matches!(
            Name::<Widget>::parse(&long),
            Err(PluginError::InvalidLength { length: 256, .. })
        ));
    }

    #[test]
    fn it_compares_case_sensitively() {
        let lower = Name::<Widget>::parse("button").unwrap();
        let upper = Name::<Widget>::parse("Button").unwrap();
        assert_ne!(lower, upper);
        assert!(upper < lower);
    }

    #[test]
    fn it_returns_constants_by_identity() {
        let parsed = Name::<Widget>::parse("button").unwrap();
        assert!(parsed.is_constant());
        assert_eq!(parsed, Widget::BUTTON);
        assert!(!Name::<Widget>::parse("buttons").unwrap().is_constant());
    }

    #[test]
    fn it_serializes_as_a_json_string() {
        let name = Name::<Widget>::parse("slider").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"slider\"");
        assert_eq!(serde_json::from_str::<Name<Widget>>(&json).unwrap(), name);
        assert!(serde_json::from_str::<Name<Widget>>("\"9\"").is_err());
    }
}
