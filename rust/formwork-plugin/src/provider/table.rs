use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::{Info, InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider};

/// Builds a plugin from evaluated parameter values.
pub type Factory<K> = Box<
    dyn Fn(
            &[ParameterValue<<K as PluginKind>::Plugin>],
        ) -> Result<<K as PluginKind>::Plugin, PluginError>
        + Send
        + Sync,
>;

/// A provider backed by a fixed table of factories, one per name.
pub struct TableProvider<K: PluginKind> {
    infos: InfoSet<K>,
    factories: BTreeMap<Name<K>, Factory<K>>,
}

impl<K: PluginKind> TableProvider<K> {
    /// Starts an empty table.
    pub fn builder() -> TableProviderBuilder<K> {
        TableProviderBuilder { rows: Vec::new() }
    }
}

impl<K: PluginKind> Provider<K> for TableProvider<K> {
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PluginError::unknown::<K>(name))?;
        factory(values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.infos
    }
}

impl<K: PluginKind> fmt::Debug for TableProvider<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableProvider")
            .field("infos", &self.infos)
            .finish_non_exhaustive()
    }
}

/// Collects the rows of a [`TableProvider`].
pub struct TableProviderBuilder<K: PluginKind> {
    rows: Vec<(Name<K>, Url, Factory<K>)>,
}

impl<K: PluginKind> TableProviderBuilder<K> {
    /// Adds a plugin.
    pub fn plugin<F>(mut self, name: Name<K>, url: Url, factory: F) -> Self
    where
        F: Fn(&[ParameterValue<K::Plugin>]) -> Result<K::Plugin, PluginError>
            + Send
            + Sync
            + 'static,
    {
        self.rows.push((name, url, Box::new(factory)));
        self
    }

    /// Finishes the table, failing if a name was added twice or a url
    /// cannot be listed.
    pub fn build(self) -> Result<TableProvider<K>, PluginError> {
        let mut infos = Vec::with_capacity(self.rows.len());
        let mut factories = BTreeMap::new();
        for (name, url, factory) in self.rows {
            infos.push(Info::new(name.clone(), url)?);
            factories.insert(name, factory);
        }

        Ok(TableProvider {
            infos: InfoSet::new(infos)?,
            factories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{Gadget, Widget, gadgets, name, url};
    use pretty_assertions::assert_eq;

    #[test]
    fn it_resolves_table_rows() {
        let provider = gadgets(&["a", "b"]);
        assert_eq!(
            provider.plugin(&name("a"), &[]).unwrap(),
            Gadget::new("a", vec![])
        );
        assert_eq!(provider.infos().len(), 2);
    }

    #[test]
    fn it_fails_for_unknown_names() {
        let provider = gadgets(&["a"]);
        assert_eq!(
            provider.plugin(&name("z"), &[]),
            Err(PluginError::UnknownPlugin {
                kind: "widget",
                name: "z".into()
            })
        );
    }

    #[test]
    fn it_lets_factories_reject_parameters() {
        let provider = TableProvider::<Widget>::builder()
            .plugin(name("fixed"), url("fixed"), |values| {
                if values.is_empty() {
                    Ok(Gadget::new("fixed", vec![]))
                } else {
                    Err(PluginError::invalid_parameters("fixed", "expected none"))
                }
            })
            .build()
            .unwrap();
        assert!(matches!(
            provider.plugin_selector(&"fixed(1)".parse().unwrap()),
            Err(PluginError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn it_rejects_duplicate_rows() {
        let result = TableProvider::<Widget>::builder()
            .plugin(name("a"), url("a"), |_| Ok(Gadget::new("a", vec![])))
            .plugin(name("a"), url("b"), |_| Ok(Gadget::new("a", vec![])))
            .build();
        assert!(matches!(result, Err(PluginError::AliasCardinality(_))));
    }
}
