use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::{
    BasicValidatorContext, Form, FormError, FormField, Reference, SharedValidatorProvider,
    ValidatorContext,
};

/// Everything a form handler needs from the application: the declared
/// form, where field values live and how validators are resolved.
pub trait FormHandlerContext {
    /// The declared form schema.
    fn form(&self) -> &Form;

    /// Loads the stored value of `field`, `None` if nothing is stored.
    fn load_field_value(&self, field: &FormField) -> Result<Option<Value>, FormError>;

    /// Persists the values of `fields`.
    fn save_field_values(&self, fields: &[FormField]) -> Result<(), FormError>;

    /// The validator context for the field `reference`.
    fn validator_context(&self, reference: &Reference) -> Box<dyn ValidatorContext + '_>;
}

/// A [`FormHandlerContext`] whose field values are kept in memory and never
/// persisted.
#[derive(Clone)]
pub struct MemoryFormContext {
    form: Form,
    validators: SharedValidatorProvider,
    values: Arc<RwLock<HashMap<Reference, Value>>>,
}

impl MemoryFormContext {
    /// Creates a context for `form` with no stored values.
    pub fn new(form: Form, validators: SharedValidatorProvider) -> Self {
        Self {
            form,
            validators,
            values: Arc::default(),
        }
    }

    /// The stored value of `reference`.
    pub fn value(&self, reference: &Reference) -> Result<Option<Value>, FormError> {
        let values = self
            .values
            .read()
            .map_err(|error| FormError::Storage(error.to_string()))?;
        Ok(values.get(reference).cloned())
    }
}

impl FormHandlerContext for MemoryFormContext {
    fn form(&self) -> &Form {
        &self.form
    }

    fn load_field_value(&self, field: &FormField) -> Result<Option<Value>, FormError> {
        self.value(field.reference())
    }

    fn save_field_values(&self, fields: &[FormField]) -> Result<(), FormError> {
        let mut values = self
            .values
            .write()
            .map_err(|error| FormError::Storage(error.to_string()))?;
        for field in fields {
            match field.value() {
                Some(value) => values.insert(field.reference().clone(), value.clone()),
                None => values.remove(field.reference()),
            };
        }
        Ok(())
    }

    fn validator_context(&self, reference: &Reference) -> Box<dyn ValidatorContext + '_> {
        Box::new(BasicValidatorContext::new(
            reference.clone(),
            self.validators.clone(),
        ))
    }
}

impl std::fmt::Debug for MemoryFormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFormContext")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}
