//! The validator plugin kind.

use std::sync::Arc;

use formwork_plugin::{
    Alias, AliasSet, AliasesProvider, CollectionProvider, Info, InfoSet, Name, PluginError,
    PluginKind, Provider, Selector, SharedProvider,
};
use serde_json::Value;

use crate::{Reference, ValidationError};

/// Checks a field value.
///
/// Closures with the same signature are validators too.
pub trait Validator: Send + Sync {
    /// Returns every problem found with `value`, or nothing if it is valid.
    fn validate(&self, value: Option<&Value>, context: &dyn ValidatorContext) -> Vec<ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(Option<&Value>, &dyn ValidatorContext) -> Vec<ValidationError> + Send + Sync,
{
    fn validate(&self, value: Option<&Value>, context: &dyn ValidatorContext) -> Vec<ValidationError> {
        self(value, context)
    }
}

/// A resolved validator.
pub type ValidatorPlugin = Arc<dyn Validator>;

/// What a validator knows about the field it checks.
pub trait ValidatorContext {
    /// The field being validated.
    fn reference(&self) -> &Reference;

    /// Resolves another validator, for validators that delegate.
    fn validator(&self, selector: &ValidatorSelector) -> Result<ValidatorPlugin, PluginError>;
}

/// Marker for the validator plugin kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorKind;

impl ValidatorKind {
    /// Rejects missing and `null` values.
    pub const NON_NULL: ValidatorName = Name::constant("non-null");
    /// Bounds the length of text values.
    pub const TEXT_LENGTH: ValidatorName = Name::constant("text-length");
    /// Accepts e-mail addresses.
    pub const EMAIL_ADDRESS: ValidatorName = Name::constant("email-address");
    /// Applies validators to every element of a collection.
    pub const COLLECTION: ValidatorName = Name::constant("collection");
    /// Accepts absolute URLs.
    pub const ABSOLUTE_URL: ValidatorName = Name::constant("absolute-url");
}

impl PluginKind for ValidatorKind {
    const LABEL: &'static str = "validator";
    const CONSTANTS: &'static [&'static str] = &[
        "non-null",
        "text-length",
        "email-address",
        "collection",
        "absolute-url",
    ];
    type Plugin = ValidatorPlugin;
}

/// The name of a validator.
pub type ValidatorName = Name<ValidatorKind>;
/// A textual reference to a validator, e.g. `text-length(1, 10)`.
pub type ValidatorSelector = Selector<ValidatorKind>;
/// Identity of a validator.
pub type ValidatorInfo = Info<ValidatorKind>;
/// Identities of many validators.
pub type ValidatorInfoSet = InfoSet<ValidatorKind>;
/// An alternate validator name.
pub type ValidatorAlias = Alias<ValidatorKind>;
/// Alternate validator names.
pub type ValidatorAliasSet = AliasSet<ValidatorKind>;
/// Anything that resolves validators.
pub type SharedValidatorProvider = SharedProvider<ValidatorKind>;
/// Validators gathered from many providers.
pub type ValidatorCollectionProvider = CollectionProvider<ValidatorKind>;
/// Validator aliases applied to an upstream provider.
pub type ValidatorAliasesProvider<P> = AliasesProvider<ValidatorKind, P>;

/// Validator context backed by a shared provider.
#[derive(Clone)]
pub struct BasicValidatorContext {
    reference: Reference,
    provider: SharedValidatorProvider,
}

impl BasicValidatorContext {
    /// Creates a new [`BasicValidatorContext`].
    pub fn new(reference: Reference, provider: SharedValidatorProvider) -> Self {
        Self {
            reference,
            provider,
        }
    }
}

impl ValidatorContext for BasicValidatorContext {
    fn reference(&self) -> &Reference {
        &self.reference
    }

    fn validator(&self, selector: &ValidatorSelector) -> Result<ValidatorPlugin, PluginError> {
        self.provider.plugin_selector(selector)
    }
}

impl std::fmt::Debug for BasicValidatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicValidatorContext")
            .field("reference", &self.reference)
            .field("validators", self.provider.infos())
            .finish()
    }
}
