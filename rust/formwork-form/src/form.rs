//! Forms and their fields.
//!
//! Both are values: every `set_*` method returns a rebuilt copy and leaves
//! the original untouched.

use std::collections::BTreeSet;
use std::{fmt::Display, str::FromStr};

use formwork_plugin::{PluginError, validate_name};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FormError, Reference, ValidationError, ValidatorSelector};

/// The name of a form. Follows the same rules as plugin names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FormName(String);

impl FormName {
    /// The name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FormName {
    type Error = PluginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_name(&value)?;
        Ok(Self(value))
    }
}

impl FromStr for FormName {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormName::try_from(s.to_owned())
    }
}

impl From<FormName> for String {
    fn from(value: FormName) -> Self {
        value.0
    }
}

impl Display for FormName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    reference: Reference,
    label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator: Option<ValidatorSelector>,
}

impl FormField {
    /// A field with a label and nothing else.
    pub fn new(reference: Reference, label: impl Into<String>) -> Self {
        Self {
            reference,
            label: label.into(),
            value_type: None,
            value: None,
            validator: None,
        }
    }

    /// Identifies the field within its form.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The declared value type, e.g. `text` or `number`.
    pub fn value_type(&self) -> Option<&str> {
        self.value_type.as_deref()
    }

    /// The current value.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The validator applied to the value.
    pub fn validator(&self) -> Option<&ValidatorSelector> {
        self.validator.as_ref()
    }

    /// Returns a copy with a different label.
    pub fn set_label(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a different value type.
    pub fn set_value_type(&self, value_type: Option<String>) -> Self {
        Self {
            value_type,
            ..self.clone()
        }
    }

    /// Returns a copy with a different value.
    pub fn set_value(&self, value: Option<Value>) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// Returns a copy with a different validator.
    pub fn set_validator(&self, validator: Option<ValidatorSelector>) -> Self {
        Self {
            validator,
            ..self.clone()
        }
    }
}

/// A named, ordered list of fields plus the errors found in them.
///
/// No two fields share a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FormData", into = "FormData")]
pub struct Form {
    name: FormName,
    fields: Vec<FormField>,
    errors: Vec<ValidationError>,
}

impl Form {
    /// Builds a form, failing if two fields share a reference.
    pub fn new(name: FormName, fields: Vec<FormField>) -> Result<Self, FormError> {
        check_unique(&fields)?;
        Ok(Self {
            name,
            fields,
            errors: Vec::new(),
        })
    }

    /// The form name.
    pub fn name(&self) -> &FormName {
        &self.name
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// The field with `reference`.
    pub fn field(&self, reference: &Reference) -> Option<&FormField> {
        self.fields.iter().find(|field| field.reference() == reference)
    }

    /// Returns true if a field with `reference` is declared.
    pub fn contains(&self, reference: &Reference) -> bool {
        self.field(reference).is_some()
    }

    /// Errors from the last validation.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns true if the last validation found problems.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns a copy with different fields.
    pub fn set_fields(&self, fields: Vec<FormField>) -> Result<Self, FormError> {
        check_unique(&fields)?;
        Ok(Self {
            fields,
            ..self.clone()
        })
    }

    /// Returns a copy in which the field sharing `field`'s reference is
    /// replaced.
    pub fn set_field(&self, field: FormField) -> Result<Self, FormError> {
        if !self.contains(field.reference()) {
            return Err(FormError::unknown_fields([field.reference()]));
        }
        let fields = self
            .fields
            .iter()
            .map(|existing| {
                if existing.reference() == field.reference() {
                    field.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Ok(Self {
            fields,
            ..self.clone()
        })
    }

    /// Returns a copy carrying `errors`.
    pub fn set_errors(&self, errors: Vec<ValidationError>) -> Self {
        Self {
            errors,
            ..self.clone()
        }
    }
}

fn check_unique(fields: &[FormField]) -> Result<(), FormError> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.reference()) {
            return Err(FormError::DuplicateField(field.reference().to_string()));
        }
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct FormData {
    name: FormName,
    fields: Vec<FormField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

impl TryFrom<FormData> for Form {
    type Error = FormError;

    fn try_from(data: FormData) -> Result<Self, Self::Error> {
        Ok(Form::new(data.name, data.fields)?.set_errors(data.errors))
    }
}

impl From<Form> for FormData {
    fn from(form: Form) -> Self {
        FormData {
            name: form.name,
            fields: form.fields,
            errors: form.errors,
        }
    }
}
