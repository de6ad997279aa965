use std::fmt::Debug;
use std::hash::Hash;

/// A family of plugins that share one namespace.
///
/// Every type in this crate ([`Name`](crate::Name), [`Selector`](crate::Selector),
/// [`AliasSet`](crate::AliasSet), [`Provider`](crate::Provider), ...) is
/// parameterized by a kind, so that names of one kind can never be handed to
/// a provider of another. Kinds are zero-sized markers:
///
/// ```
/// use formwork_plugin::{Name, PluginKind};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct Widget;
///
/// impl PluginKind for Widget {
///     const LABEL: &'static str = "widget";
///     const CONSTANTS: &'static [&'static str] = &["button"];
///     type Plugin = String;
/// }
///
/// let name: Name<Widget> = "button".parse().unwrap();
/// assert!(name.is_constant());
/// ```
pub trait PluginKind:
    Copy + Debug + Default + Eq + Ord + Hash + Send + Sync + 'static
{
    /// Label used in diagnostics, e.g. `"validator"` in "Unknown validator x".
    const LABEL: &'static str;

    /// Well-known names. Parsing one of these yields the shared constant
    /// rather than a freshly allocated name.
    const CONSTANTS: &'static [&'static str] = &[];

    /// The live component a provider produces for this kind.
    type Plugin: Clone;
}
