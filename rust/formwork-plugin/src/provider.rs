use std::sync::Arc;

use crate::{InfoSet, Name, ParameterValue, PluginError, PluginKind, Selector};

mod aliases;
pub use aliases::*;

mod collection;
pub use collection::*;

mod filtered;
pub use filtered::*;

mod mapped;
pub use mapped::*;

mod table;
pub use table::*;

/// The capability boundary that turns names and selectors into live plugins.
///
/// Providers are composed: the combinators in this module wrap an upstream
/// provider to restrict, rename or alias what it offers, and
/// [`CollectionProvider`] fans out across many.
///
/// # Example
///
/// ```
/// use formwork_plugin::{InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct Greeting;
///
/// impl PluginKind for Greeting {
///     const LABEL: &'static str = "greeting";
///     type Plugin = String;
/// }
///
/// struct Hello(InfoSet<Greeting>);
///
/// impl Provider<Greeting> for Hello {
///     fn plugin(
///         &self,
///         name: &Name<Greeting>,
///         values: &[ParameterValue<String>],
///     ) -> Result<String, PluginError> {
///         match (name.as_str(), values) {
///             ("hello", [ParameterValue::String(who)]) => Ok(format!("hello {who}")),
///             _ => Err(PluginError::unknown::<Greeting>(name)),
///         }
///     }
///
///     fn infos(&self) -> &InfoSet<Greeting> {
///         &self.0
///     }
/// }
///
/// let provider = Hello(InfoSet::empty());
/// let selector = "hello(\"world\")".parse().unwrap();
/// assert_eq!(provider.plugin_selector(&selector).unwrap(), "hello world");
/// ```
pub trait Provider<K: PluginKind> {
    /// Resolves `name` with already evaluated parameter values.
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError>;

    /// Resolves a selector. Nested selectors in its parameters are resolved
    /// through this same provider first.
    fn plugin_selector(&self, selector: &Selector<K>) -> Result<K::Plugin, PluginError> {
        selector.evaluate(self)
    }

    /// Everything this provider can resolve.
    fn infos(&self) -> &InfoSet<K>;
}

/// A provider that can be shared across threads.
pub type SharedProvider<K> = Arc<dyn Provider<K> + Send + Sync>;

impl<K, P> Provider<K> for &P
where
    K: PluginKind,
    P: Provider<K> + ?Sized,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        (**self).plugin(name, values)
    }

    fn plugin_selector(&self, selector: &Selector<K>) -> Result<K::Plugin, PluginError> {
        (**self).plugin_selector(selector)
    }

    fn infos(&self) -> &InfoSet<K> {
        (**self).infos()
    }
}

impl<K, P> Provider<K> for Box<P>
where
    K: PluginKind,
    P: Provider<K> + ?Sized,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        (**self).plugin(name, values)
    }

    fn plugin_selector(&self, selector: &Selector<K>) -> Result<K::Plugin, PluginError> {
        (**self).plugin_selector(selector)
    }

    fn infos(&self) -> &InfoSet<K> {
        (**self).infos()
    }
}

impl<K, P> Provider<K> for Arc<P>
where
    K: PluginKind,
    P: Provider<K> + ?Sized,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        (**self).plugin(name, values)
    }

    fn plugin_selector(&self, selector: &Selector<K>) -> Result<K::Plugin, PluginError> {
        (**self).plugin_selector(selector)
    }

    fn infos(&self) -> &InfoSet<K> {
        (**self).infos()
    }
}
