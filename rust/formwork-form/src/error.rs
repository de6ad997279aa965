use formwork_plugin::PluginError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// A plugin name, selector or alias could not be parsed or resolved
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Fields were supplied that the form does not declare
    #[error("Unknown form fields: {0}")]
    UnknownFields(String),

    /// Two fields of one form share a reference
    #[error("Duplicate form field: {0}")]
    DuplicateField(String),

    /// A field reference was malformed
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Field values could not be loaded or saved
    #[error("Storage operation failed: {0}")]
    Storage(String),
}

impl FormError {
    /// A [`FormError::UnknownFields`] listing `references` sorted, without
    /// repeats and comma separated.
    pub fn unknown_fields<I, T>(references: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let mut references: Vec<String> = references
            .into_iter()
            .map(|reference| reference.to_string())
            .collect();
        references.sort();
        references.dedup();
        FormError::UnknownFields(references.join(", "))
    }
}
