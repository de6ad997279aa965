#![warn(missing_docs)]

//! Form validation and submission driven by selectable plugins.
//!
//! Validators and form handlers are two plugin kinds of
//! [`formwork_plugin`]: each form field names its validator with a selector
//! such as `text-length(1, 80)`, and a [`FormHandler`] resolves those
//! selectors through a [`FormHandlerContext`] to check and save the form.
//!
//! ```
//! use std::sync::Arc;
//!
//! use formwork_form::{
//!     BasicFormHandler, Form, FormField, FormHandler, MemoryFormContext, ValidationError,
//!     ValidatorContext, ValidatorKind, ValidatorPlugin,
//! };
//! use formwork_plugin::TableProvider;
//! use serde_json::{Value, json};
//!
//! let validators = TableProvider::<ValidatorKind>::builder()
//!     .plugin(ValidatorKind::NON_NULL, "urn:example:non-null".parse()?, |_| {
//!         Ok(Arc::new(|value: Option<&Value>, context: &dyn ValidatorContext| match value {
//!             None | Some(Value::Null) => {
//!                 vec![ValidationError::new(context.reference().clone(), "required")]
//!             }
//!             Some(_) => vec![],
//!         }) as ValidatorPlugin)
//!     })
//!     .build()?;
//!
//! let email = FormField::new("email".parse()?, "E-mail")
//!     .set_validator(Some("non-null".parse()?));
//! let form = Form::new("signup".parse()?, vec![email.clone()])?;
//! let context = MemoryFormContext::new(form.clone(), Arc::new(validators));
//!
//! let rejected = BasicFormHandler.submit_form(&form, &context)?;
//! assert_eq!(rejected.errors()[0].to_string(), "email: required");
//!
//! let filled = form.set_field(email.set_value(Some(json!("a@example.com"))))?;
//! let accepted = BasicFormHandler.submit_form(&filled, &context)?;
//! assert!(!accepted.has_errors());
//! assert_eq!(context.value(&"email".parse()?)?, Some(json!("a@example.com")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub use error::*;

mod reference;
pub use reference::*;

mod validation;
pub use validation::*;

mod validator;
pub use validator::*;

mod form;
pub use form::*;

mod context;
pub use context::*;

mod form_handler;
pub use form_handler::*;

mod basic;
pub use basic::*;
