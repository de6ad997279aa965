use std::collections::BTreeMap;

use crate::{
    Form, FormError, FormField, FormHandler, FormHandlerContext, Reference, ValidationError,
};

/// Loads, validates and saves forms through their [`FormHandlerContext`].
///
/// Submission never saves a form with validation errors: the form is handed
/// back carrying the errors instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFormHandler;

impl BasicFormHandler {
    fn validate_field(
        &self,
        field: &FormField,
        context: &dyn FormHandlerContext,
    ) -> Vec<ValidationError> {
        let Some(selector) = field.validator() else {
            return Vec::new();
        };
        let value = field.value();
        let validator_context = context.validator_context(field.reference());

        match validator_context.validator(selector) {
            Ok(validator) => validator
                .validate(value, &*validator_context)
                .into_iter()
                .map(|error| match error.value() {
                    Some(_) => error,
                    None => error.with_value(value.cloned()),
                })
                .collect(),
            Err(error) => {
                tracing::warn!(
                    reference = %field.reference(),
                    %selector,
                    %error,
                    "Could not resolve validator"
                );
                vec![
                    ValidationError::new(
                        field.reference().clone(),
                        format!("Unknown validator {selector}"),
                    )
                    .with_value(value.cloned()),
                ]
            }
        }
    }
}

impl FormHandler for BasicFormHandler {
    fn prepare_form(&self, form: &Form, context: &dyn FormHandlerContext) -> Result<Form, FormError> {
        let mut fields = Vec::with_capacity(form.fields().len());
        for field in form.fields() {
            let loaded = context.load_field_value(field)?;
            match loaded {
                Some(value) if field.value() != Some(&value) => {
                    fields.push(field.set_value(Some(value)))
                }
                _ => fields.push(field.clone()),
            }
        }
        tracing::debug!(form = %form.name(), fields = fields.len(), "Prepared form");
        form.set_fields(fields)
    }

    fn validate_form_fields(
        &self,
        fields: &[FormField],
        context: &dyn FormHandlerContext,
    ) -> Result<Vec<ValidationError>, FormError> {
        let schema = context.form();

        let unknown: Vec<&Reference> = fields
            .iter()
            .map(FormField::reference)
            .filter(|reference| !schema.contains(reference))
            .collect();
        if !unknown.is_empty() {
            return Err(FormError::unknown_fields(unknown));
        }

        let mut supplied: BTreeMap<&Reference, &FormField> = BTreeMap::new();
        for field in fields {
            supplied.entry(field.reference()).or_insert(field);
        }

        let errors: Vec<ValidationError> = schema
            .fields()
            .iter()
            .filter_map(|declared| supplied.get(declared.reference()))
            .flat_map(|field| self.validate_field(field, context))
            .collect();

        tracing::debug!(
            form = %schema.name(),
            fields = supplied.len(),
            errors = errors.len(),
            "Validated form fields"
        );
        Ok(errors)
    }

    fn submit_form(&self, form: &Form, context: &dyn FormHandlerContext) -> Result<Form, FormError> {
        let errors = self.validate_form_fields(form.fields(), context)?;
        if !errors.is_empty() {
            tracing::debug!(
                form = %form.name(),
                errors = errors.len(),
                "Not saving form with validation errors"
            );
            return Ok(form.set_errors(errors));
        }

        context.save_field_values(form.fields())?;
        tracing::debug!(form = %form.name(), "Saved form");
        Ok(form.set_errors(Vec::new()))
    }
}
