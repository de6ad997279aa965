//! Declarative provider configuration.

use serde::{Deserialize, Serialize};

use crate::{AliasSet, AliasesProvider, FilteredProvider, Name, PluginError, PluginKind, Provider};

/// How an application exposes the plugins of one upstream provider.
///
/// ```json
/// { "aliases": "required non-null, short text-length(1, 10)", "enabled": ["non-null", "text-length"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProviderSettings<K: PluginKind> {
    /// Aliases applied on top of the enabled plugins
    #[serde(default)]
    pub aliases: AliasSet<K>,

    /// Upstream plugins to expose; everything upstream advertises when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<Name<K>>>,
}

impl<K: PluginKind> ProviderSettings<K> {
    /// Wraps `upstream` according to these settings: first restricted to
    /// the enabled plugins, then aliased.
    pub fn provider<P>(
        &self,
        upstream: P,
    ) -> Result<AliasesProvider<K, FilteredProvider<K, P>>, PluginError>
    where
        P: Provider<K>,
    {
        let filtered = match &self.enabled {
            Some(names) => FilteredProvider::with_names(upstream, names)?,
            None => {
                let infos = upstream.infos().clone();
                FilteredProvider::new(upstream, infos)?
            }
        };
        AliasesProvider::new(self.aliases.clone(), filtered)
    }
}
