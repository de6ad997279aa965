use std::collections::BTreeMap;

use crate::info::duplicate_names;
use crate::{InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider, SharedProvider};

/// Fans out across several providers, each owning a disjoint set of names.
///
/// Ownership is decided once, at construction: two providers advertising the
/// same name is a cardinality error before anything is resolved.
#[derive(Debug, Clone)]
pub struct CollectionProvider<K: PluginKind, P = SharedProvider<K>> {
    providers: Vec<P>,
    owners: BTreeMap<Name<K>, usize>,
    infos: InfoSet<K>,
}

impl<K, P> CollectionProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    /// Collects `providers`, failing if any name is advertised twice.
    pub fn new(providers: impl IntoIterator<Item = P>) -> Result<Self, PluginError> {
        let providers: Vec<P> = providers.into_iter().collect();
        let mut owners = BTreeMap::new();
        let mut duplicates = Vec::new();

        for (index, provider) in providers.iter().enumerate() {
            for name in provider.infos().names() {
                if owners.insert(name.clone(), index).is_some() {
                    duplicates.push(name.clone());
                }
            }
        }

        if !duplicates.is_empty() {
            let error = duplicate_names::<K>(duplicates);
            tracing::warn!(kind = K::LABEL, %error, "Rejected provider collection");
            return Err(error);
        }

        let infos = InfoSet::new(
            providers
                .iter()
                .flat_map(|provider| provider.infos().iter().cloned()),
        )?;
        tracing::debug!(
            kind = K::LABEL,
            providers = providers.len(),
            advertised = infos.len(),
            "Collected providers"
        );

        Ok(Self {
            providers,
            owners,
            infos,
        })
    }

    /// The collected providers, in the order given.
    pub fn providers(&self) -> &[P] {
        &self.providers
    }
}

impl<K, P> Provider<K> for CollectionProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        let provider = self
            .owners
            .get(name)
            .and_then(|index| self.providers.get(*index))
            .ok_or_else(|| PluginError::unknown::<K>(name))?;
        provider.plugin(name, values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.infos
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::helpers::{Gadget, Widget, gadgets, name};
    use pretty_assertions::assert_eq;

    #[test]
    fn it_dispatches_to_the_owning_provider() {
        let collection = CollectionProvider::new([gadgets(&["a", "b"]), gadgets(&["c"])]).unwrap();
        assert_eq!(collection.infos().len(), 3);
        assert_eq!(
            collection.plugin(&name("c"), &[]).unwrap(),
            Gadget::new("c", vec![])
        );
        assert_eq!(
            collection
                .plugin_selector(&"a(b, c)".parse().unwrap())
                .unwrap(),
            Gadget::new(
                "a",
                vec![
                    ParameterValue::Plugin(Gadget::new("b", vec![])),
                    ParameterValue::Plugin(Gadget::new("c", vec![])),
                ]
            )
        );
        assert!(matches!(
            collection.plugin(&name("z"), &[]),
            Err(PluginError::UnknownPlugin { .. })
        ));
    }

    #[test_log::test]
    fn it_rejects_duplicate_names_up_front() {
        let result = CollectionProvider::new([gadgets(&["dup", "a"]), gadgets(&["dup"])]);
        assert_eq!(
            result.err(),
            Some(PluginError::AliasCardinality(
                "Duplicate widget names: dup".into()
            ))
        );
    }

    #[test]
    fn it_collects_shared_providers() {
        let shared: Vec<SharedProvider<Widget>> =
            vec![Arc::new(gadgets(&["a"])), Arc::new(gadgets(&["b"]))];
        let collection: CollectionProvider<Widget> = CollectionProvider::new(shared).unwrap();
        assert_eq!(
            collection.plugin(&name("b"), &[]).unwrap(),
            Gadget::new("b", vec![])
        );
    }
}
