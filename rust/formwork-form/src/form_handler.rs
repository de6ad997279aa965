//! The form handler plugin kind.

use std::sync::Arc;

use formwork_plugin::{
    Alias, AliasSet, Info, InfoSet, Name, PluginError, PluginKind, Selector, SharedProvider,
    TableProvider,
};
use url::Url;

use crate::{BasicFormHandler, Form, FormError, FormField, FormHandlerContext, ValidationError};

/// Drives a form through loading, validation and submission.
pub trait FormHandler: Send + Sync {
    /// Returns `form` with every field value loaded from `context`.
    fn prepare_form(&self, form: &Form, context: &dyn FormHandlerContext) -> Result<Form, FormError>;

    /// Validates `fields` against the form declared by `context`.
    ///
    /// Fails if any field is not declared. Validator problems, including
    /// validators that cannot be resolved, are reported as
    /// [`ValidationError`]s.
    fn validate_form_fields(
        &self,
        fields: &[FormField],
        context: &dyn FormHandlerContext,
    ) -> Result<Vec<ValidationError>, FormError>;

    /// Validates and, if there are no problems, saves `form`. The returned
    /// form carries the problems found.
    fn submit_form(&self, form: &Form, context: &dyn FormHandlerContext) -> Result<Form, FormError>;
}

/// A resolved form handler.
pub type FormHandlerPlugin = Arc<dyn FormHandler>;

/// Marker for the form handler plugin kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormHandlerKind;

impl FormHandlerKind {
    /// The [`BasicFormHandler`].
    pub const BASIC: FormHandlerName = Name::constant("basic");
}

impl PluginKind for FormHandlerKind {
    const LABEL: &'static str = "form-handler";
    const CONSTANTS: &'static [&'static str] = &["basic"];
    type Plugin = FormHandlerPlugin;
}

/// The name of a form handler.
pub type FormHandlerName = Name<FormHandlerKind>;
/// A textual reference to a form handler.
pub type FormHandlerSelector = Selector<FormHandlerKind>;
/// Identity of a form handler.
pub type FormHandlerInfo = Info<FormHandlerKind>;
/// Identities of many form handlers.
pub type FormHandlerInfoSet = InfoSet<FormHandlerKind>;
/// An alternate form handler name.
pub type FormHandlerAlias = Alias<FormHandlerKind>;
/// Alternate form handler names.
pub type FormHandlerAliasSet = AliasSet<FormHandlerKind>;
/// Anything that resolves form handlers.
pub type SharedFormHandlerProvider = SharedProvider<FormHandlerKind>;

/// Identity url of the [`BasicFormHandler`].
pub const BASIC_FORM_HANDLER_URL: &str = "urn:formwork:form-handler:basic";

/// A provider offering the [`BasicFormHandler`] as `basic`.
pub fn basic_form_handlers() -> Result<TableProvider<FormHandlerKind>, PluginError> {
    let url = Url::parse(BASIC_FORM_HANDLER_URL).map_err(|error| PluginError::InvalidUrl {
        text: BASIC_FORM_HANDLER_URL.to_owned(),
        reason: error.to_string(),
    })?;
    let handler: FormHandlerPlugin = Arc::new(BasicFormHandler);

    TableProvider::builder()
        .plugin(FormHandlerKind::BASIC, url, move |values| {
            if !values.is_empty() {
                return Err(PluginError::invalid_parameters(
                    FormHandlerKind::BASIC,
                    "takes no parameters",
                ));
            }
            Ok(handler.clone())
        })
        .build()
}
