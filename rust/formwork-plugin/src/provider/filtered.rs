use crate::{InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider};

/// Restricts an upstream provider to a declared subset of its plugins.
///
/// Names outside the subset are unknown even when upstream could resolve
/// them.
#[derive(Debug, Clone)]
pub struct FilteredProvider<K: PluginKind, P> {
    upstream: P,
    infos: InfoSet<K>,
}

impl<K, P> FilteredProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    /// Restricts `upstream` to `infos`, failing if any declared name is not
    /// advertised upstream.
    pub fn new(upstream: P, infos: InfoSet<K>) -> Result<Self, PluginError> {
        if let Some(missing) = infos
            .names()
            .find(|name| !upstream.infos().contains(name))
        {
            return Err(PluginError::unknown::<K>(missing));
        }
        Ok(Self { upstream, infos })
    }

    /// Restricts `upstream` to the plugins named in `names`, keeping their
    /// upstream infos.
    pub fn with_names<'a>(
        upstream: P,
        names: impl IntoIterator<Item = &'a Name<K>>,
    ) -> Result<Self, PluginError> {
        let infos = names
            .into_iter()
            .map(|name| {
                upstream
                    .infos()
                    .get(name)
                    .cloned()
                    .ok_or_else(|| PluginError::unknown::<K>(name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let infos = InfoSet::new(infos)?;
        Ok(Self { upstream, infos })
    }

    /// The wrapped provider.
    pub fn upstream(&self) -> &P {
        &self.upstream
    }
}

impl<K, P> Provider<K> for FilteredProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        if !self.infos.contains(name) {
            return Err(PluginError::unknown::<K>(name));
        }
        self.upstream.plugin(name, values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{Gadget, gadgets, info, name};
    use pretty_assertions::assert_eq;

    #[test]
    fn it_hides_undeclared_plugins() {
        let declared = InfoSet::new([info("https://example.com/a", "a")]).unwrap();
        let provider = FilteredProvider::new(gadgets(&["a", "b"]), declared.clone()).unwrap();

        assert_eq!(provider.infos(), &declared);
        assert_eq!(
            provider.plugin(&name("a"), &[]).unwrap(),
            Gadget::new("a", vec![])
        );
        assert_eq!(
            provider.plugin(&name("b"), &[]),
            Err(PluginError::UnknownPlugin {
                kind: "widget",
                name: "b".into()
            })
        );
    }

    #[test]
    fn it_hides_nested_selectors_too() {
        let provider = FilteredProvider::with_names(gadgets(&["a", "b"]), [&name("a")]).unwrap();
        assert!(matches!(
            provider.plugin_selector(&"a(b)".parse().unwrap()),
            Err(PluginError::UnknownPlugin { .. })
        ));
    }

    #[test]
    fn it_rejects_names_missing_upstream() {
        let declared = InfoSet::new([info("https://example.com/z", "z")]).unwrap();
        assert_eq!(
            FilteredProvider::new(gadgets(&["a"]), declared).err(),
            Some(PluginError::UnknownPlugin {
                kind: "widget",
                name: "z".into()
            })
        );
    }
}
