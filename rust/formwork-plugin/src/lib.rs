#![warn(missing_docs)]

//! Named, selectable plugins assembled from independently authored
//! providers.
//!
//! A plugin kind (see [`PluginKind`]) gets a validated [`Name`], identity
//! records ([`Info`] / [`InfoSet`]), a textual reference language
//! ([`Selector`]) and an alias algebra ([`Alias`] / [`AliasSet`]). A
//! [`Provider`] turns names and selectors into live plugins, and the
//! combinators in this crate restrict, rename, alias and combine providers
//! without losing track of which name means what.
//!
//! Selector text looks like `collection(3, non-null, text-length(1, 10))`:
//! a name optionally followed by parameters that are numbers, strings or
//! other selectors. Nested selectors are resolved before the plugin that
//! receives them.
//!
//! ```
//! use formwork_plugin::{AliasSet, AliasesProvider, PluginError, PluginKind, Provider, TableProvider};
//!
//! #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! struct Shape;
//!
//! impl PluginKind for Shape {
//!     const LABEL: &'static str = "shape";
//!     type Plugin = f64;
//! }
//!
//! let shapes = TableProvider::<Shape>::builder()
//!     .plugin(
//!         "square".parse()?,
//!         "https://example.com/square".parse()?,
//!         |values| match values.first().and_then(|value| value.as_number()) {
//!             Some(side) => Ok(side * side),
//!             None => Err(PluginError::invalid_parameters("square", "expected a side")),
//!         },
//!     )
//!     .build()?;
//!
//! let aliases: AliasSet<Shape> = "unit square(1)".parse()?;
//! let provider = AliasesProvider::new(aliases, shapes)?;
//!
//! assert_eq!(provider.plugin_selector(&"unit".parse()?)?, 1.0);
//! assert_eq!(provider.plugin_selector(&"square(3)".parse()?)?, 9.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod text;

mod error;
pub use error::*;

mod kind;
pub use kind::*;

mod name;
pub use name::*;

mod info;
pub use info::*;

mod selector;
pub use selector::*;

mod parser;
pub use parser::*;

mod evaluator;
pub use evaluator::*;

mod alias;
pub use alias::*;

mod provider;
pub use provider::*;

mod settings;
pub use settings::*;

#[cfg(test)]
mod helpers;
