use std::collections::{BTreeMap, BTreeSet};

use crate::info::duplicate_names;
use crate::{InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider};

/// An injective map from external (advertised) names to upstream names.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameMapping<K: PluginKind> {
    external: BTreeMap<Name<K>, Name<K>>,
    internal: BTreeSet<Name<K>>,
    infos: InfoSet<K>,
}

impl<K: PluginKind> NameMapping<K> {
    /// Pairs every declared info with the upstream info carrying the same
    /// url.
    fn by_url(declared: InfoSet<K>, upstream: &InfoSet<K>) -> Result<Self, PluginError> {
        let pairs = declared
            .iter()
            .map(|info| {
                upstream
                    .by_url(info.url())
                    .map(|target| (info.name().clone(), target.name().clone()))
                    .ok_or_else(|| PluginError::unknown::<K>(info.name()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(pairs, declared)
    }

    /// Uses explicit `(external, internal)` pairs, advertising each external
    /// name with the url of its internal plugin.
    fn by_names(
        pairs: impl IntoIterator<Item = (Name<K>, Name<K>)>,
        upstream: &InfoSet<K>,
    ) -> Result<Self, PluginError> {
        let pairs: Vec<_> = pairs.into_iter().collect();
        let infos = pairs
            .iter()
            .map(|(external, internal)| {
                upstream
                    .get(internal)
                    .map(|info| info.set_name(external.clone()))
                    .ok_or_else(|| PluginError::unknown::<K>(internal))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let infos = InfoSet::new(infos)?;
        Self::build(pairs, infos)
    }

    fn build(pairs: Vec<(Name<K>, Name<K>)>, infos: InfoSet<K>) -> Result<Self, PluginError> {
        let mut external = BTreeMap::new();
        let mut internal = BTreeSet::new();
        let mut shared = Vec::new();

        for (from, to) in pairs {
            if !internal.insert(to.clone()) {
                shared.push(to.clone());
            }
            external.insert(from, to);
        }

        if !shared.is_empty() {
            return Err(PluginError::AliasCardinality(format!(
                "{} mapping is not injective: {}",
                K::LABEL,
                shared
                    .iter()
                    .map(Name::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        Ok(Self {
            external,
            internal,
            infos,
        })
    }

    fn internal_name(&self, external: &Name<K>) -> Option<&Name<K>> {
        self.external.get(external)
    }
}

/// Advertises a renamed subset of an upstream provider.
///
/// Every advertised name maps to exactly one upstream name and no two
/// advertised names share an upstream plugin. Anything not mapped is
/// unknown.
#[derive(Debug, Clone)]
pub struct FilteredMappedProvider<K: PluginKind, P> {
    upstream: P,
    mapping: NameMapping<K>,
}

impl<K, P> FilteredMappedProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    /// Maps each of `declared` to the upstream plugin advertised with the
    /// same url.
    pub fn new(declared: InfoSet<K>, upstream: P) -> Result<Self, PluginError> {
        let mapping = NameMapping::by_url(declared, upstream.infos())?;
        Ok(Self { upstream, mapping })
    }

    /// Maps explicit `(external, internal)` name pairs.
    pub fn with_names(
        pairs: impl IntoIterator<Item = (Name<K>, Name<K>)>,
        upstream: P,
    ) -> Result<Self, PluginError> {
        let mapping = NameMapping::by_names(pairs, upstream.infos())?;
        Ok(Self { upstream, mapping })
    }
}

impl<K, P> Provider<K> for FilteredMappedProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        let internal = self
            .mapping
            .internal_name(name)
            .ok_or_else(|| PluginError::unknown::<K>(name))?;
        self.upstream.plugin(internal, values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.mapping.infos
    }
}

/// Like [`FilteredMappedProvider`], but upstream plugins that are not
/// mapped stay reachable under their own names.
///
/// Upstream names that were renamed are hidden; an external name that
/// collides with a passed-through upstream name is a cardinality error.
#[derive(Debug, Clone)]
pub struct MergedMappedProvider<K: PluginKind, P> {
    upstream: P,
    mapping: NameMapping<K>,
    infos: InfoSet<K>,
}

impl<K, P> MergedMappedProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    /// Maps each of `declared` to the upstream plugin advertised with the
    /// same url.
    pub fn new(declared: InfoSet<K>, upstream: P) -> Result<Self, PluginError> {
        let mapping = NameMapping::by_url(declared, upstream.infos())?;
        Self::merge(mapping, upstream)
    }

    /// Maps explicit `(external, internal)` name pairs.
    pub fn with_names(
        pairs: impl IntoIterator<Item = (Name<K>, Name<K>)>,
        upstream: P,
    ) -> Result<Self, PluginError> {
        let mapping = NameMapping::by_names(pairs, upstream.infos())?;
        Self::merge(mapping, upstream)
    }

    fn merge(mapping: NameMapping<K>, upstream: P) -> Result<Self, PluginError> {
        let passed = upstream
            .infos()
            .filter(|info| !mapping.internal.contains(info.name()));

        let collisions: Vec<Name<K>> = mapping
            .infos
            .names()
            .filter(|name| passed.contains(name))
            .cloned()
            .collect();
        if !collisions.is_empty() {
            return Err(duplicate_names::<K>(collisions));
        }

        let infos = InfoSet::new(mapping.infos.iter().chain(passed.iter()).cloned())?;
        tracing::debug!(
            kind = K::LABEL,
            mapped = mapping.external.len(),
            passed = passed.len(),
            "Merged mapped provider"
        );

        Ok(Self {
            upstream,
            mapping,
            infos,
        })
    }
}

impl<K, P> Provider<K> for MergedMappedProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        if let Some(internal) = self.mapping.internal_name(name) {
            return self.upstream.plugin(internal, values);
        }
        if !self.infos.contains(name) {
            return Err(PluginError::unknown::<K>(name));
        }
        self.upstream.plugin(name, values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.infos
    }
}
