use thiserror::Error;

use crate::PluginKind;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    /// A character is not allowed at its position, either in a name or in
    /// selector text
    #[error("Invalid character {character:?} at {position} in {text:?}")]
    InvalidCharacter {
        /// The complete text that was being parsed.
        text: String,
        /// The offending character, exactly as it appears in `text`.
        character: char,
        /// Zero based character (not byte) offset of `character`.
        position: usize,
    },

    /// A name was shorter or longer than allowed
    #[error("Length {length} of {text:?} not between {min} and {max}")]
    InvalidLength {
        /// The rejected text.
        text: String,
        /// Length of `text` in characters.
        length: usize,
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Text ended before a construct was complete
    #[error("End of text, expected {expected} in {text:?}")]
    EndOfText {
        /// The complete text that was being parsed.
        text: String,
        /// What the parser was looking for when the text ran out.
        expected: &'static str,
    },

    /// Selector parameter lists were nested deeper than allowed
    #[error("Nesting deeper than {max} levels at {position} in {text:?}")]
    NestingTooDeep {
        /// The complete text that was being parsed.
        text: String,
        /// Zero based character offset of the `(` opening the level that
        /// exceeded `max`.
        position: usize,
        /// The deepest nesting allowed.
        max: usize,
    },

    /// A URL could not be parsed
    #[error("Invalid url {text:?}: {reason}")]
    InvalidUrl {
        /// The rejected text.
        text: String,
        /// Why the url was rejected.
        reason: String,
    },

    /// No provider entry matched the queried name
    #[error("Unknown {kind} {name}")]
    UnknownPlugin {
        /// Label of the plugin kind, e.g. `validator`.
        kind: &'static str,
        /// The queried identifier.
        name: String,
    },

    /// A set or mapping would contain the same name more than once, or a
    /// mapping was not injective
    #[error("{0}")]
    AliasCardinality(String),

    /// Parameter values were rejected by an alias or a plugin factory
    #[error("Invalid parameters for {name}: {reason}")]
    InvalidParameters {
        /// The plugin or alias name the values were passed to.
        name: String,
        /// Why the values were rejected.
        reason: String,
    },
}

impl PluginError {
    /// An [`PluginError::UnknownPlugin`] for the plugin kind `K`.
    pub fn unknown<K: PluginKind>(name: impl ToString) -> Self {
        PluginError::UnknownPlugin {
            kind: K::LABEL,
            name: name.to_string(),
        }
    }

    /// An [`PluginError::InvalidParameters`] for the given plugin or alias.
    pub fn invalid_parameters(name: impl ToString, reason: impl Into<String>) -> Self {
        PluginError::InvalidParameters {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Re-anchors an error raised while parsing `text[start..]` so that it
    /// reports positions within the complete `text`.
    pub(crate) fn within(self, text: &str, start: usize) -> Self {
        match self {
            PluginError::InvalidCharacter {
                character,
                position,
                ..
            } => PluginError::InvalidCharacter {
                text: text.to_owned(),
                character,
                position: start + position,
            },
            PluginError::NestingTooDeep { position, max, .. } => PluginError::NestingTooDeep {
                text: text.to_owned(),
                position: start + position,
                max,
            },
            PluginError::EndOfText { expected, .. } => PluginError::EndOfText {
                text: text.to_owned(),
                expected,
            },
            other => other,
        }
    }
}
