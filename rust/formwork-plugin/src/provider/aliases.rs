use crate::evaluator::evaluate_parameters;
use crate::{AliasSet, InfoSet, Name, ParameterValue, PluginError, PluginKind, Provider, Selector};

/// Puts an [`AliasSet`] in front of an upstream provider.
///
/// Consumers see `aliases.merge(upstream.infos())`. Renamed plugins are
/// resolved under their alias, bound macros evaluate their fixed selector
/// upstream, and nested selector parameters are resolved through the
/// aliases as well.
#[derive(Debug, Clone)]
pub struct AliasesProvider<K: PluginKind, P> {
    aliases: AliasSet<K>,
    upstream: P,
    infos: InfoSet<K>,
}

impl<K, P> AliasesProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    /// Applies `aliases` to `upstream`, failing if they refer to plugins
    /// upstream does not advertise or produce colliding names.
    pub fn new(aliases: AliasSet<K>, upstream: P) -> Result<Self, PluginError> {
        let infos = aliases.merge(upstream.infos())?;
        tracing::debug!(
            kind = K::LABEL,
            aliases = aliases.len(),
            advertised = infos.len(),
            "Applied aliases"
        );
        Ok(Self {
            aliases,
            upstream,
            infos,
        })
    }

    /// The applied aliases.
    pub fn aliases(&self) -> &AliasSet<K> {
        &self.aliases
    }

    /// The wrapped provider.
    pub fn upstream(&self) -> &P {
        &self.upstream
    }
}

impl<K, P> Provider<K> for AliasesProvider<K, P>
where
    K: PluginKind,
    P: Provider<K>,
{
    fn plugin(
        &self,
        name: &Name<K>,
        values: &[ParameterValue<K::Plugin>],
    ) -> Result<K::Plugin, PluginError> {
        if let Some(bound) = self.aliases.alias_selector(name) {
            if !values.is_empty() {
                return Err(PluginError::invalid_parameters(
                    name,
                    "an alias bound to a selector takes no parameters",
                ));
            }
            return self.upstream.plugin_selector(bound);
        }

        let target = self
            .aliases
            .alias_or_name(name)
            .ok_or_else(|| PluginError::unknown::<K>(name))?;
        self.upstream.plugin(&target, values)
    }

    fn plugin_selector(&self, selector: &Selector<K>) -> Result<K::Plugin, PluginError> {
        let rewritten = self.aliases.selector(selector)?;
        if self.aliases.alias_selector(selector.name()).is_some() {
            return self.upstream.plugin_selector(&rewritten);
        }

        let values = evaluate_parameters(self, &selector.parse_parameters()?)?;
        self.upstream.plugin(rewritten.name(), &values)
    }

    fn infos(&self) -> &InfoSet<K> {
        &self.infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableProvider;
    use crate::helpers::{Gadget, Widget, gadgets, name};
    use pretty_assertions::assert_eq;

    fn provider(aliases: &str) -> AliasesProvider<Widget, TableProvider<Widget>> {
        AliasesProvider::new(
            aliases.parse().unwrap(),
            gadgets(&["collection", "non-null", "text-length"]),
        )
        .unwrap()
    }

    #[test]
    fn it_advertises_merged_infos() {
        let provider = provider("required non-null");
        assert_eq!(
            provider.infos().names().map(Name::as_str).collect::<Vec<_>>(),
            vec!["collection", "required", "text-length"]
        );
    }

    #[test]
    fn it_resolves_renames_with_the_callers_values() {
        let provider = provider("required non-null");
        let values = vec![ParameterValue::Number(1.0)];
        assert_eq!(
            provider.plugin(&name("required"), &values).unwrap(),
            Gadget::new("non-null", values)
        );
        assert!(matches!(
            provider.plugin(&name("non-null"), &[]),
            Err(PluginError::UnknownPlugin { .. })
        ));
    }

    #[test]
    fn it_evaluates_bound_macros_upstream() {
        let provider = provider("short text-length(1, 10)");
        let expected = Gadget::new(
            "text-length",
            vec![ParameterValue::Number(1.0), ParameterValue::Number(10.0)],
        );
        assert_eq!(provider.plugin(&name("short"), &[]).unwrap(), expected);
        assert_eq!(
            provider.plugin_selector(&"short".parse().unwrap()).unwrap(),
            expected
        );
        assert_eq!(
            provider.plugin_selector(&"short()".parse().unwrap()).unwrap(),
            expected
        );
    }

    #[test]
    fn it_rejects_parameters_for_bound_macros() {
        let provider = provider("short text-length(1, 10)");
        assert!(matches!(
            provider.plugin(&name("short"), &[ParameterValue::Number(2.0)]),
            Err(PluginError::InvalidParameters { .. })
        ));
        assert!(matches!(
            provider.plugin_selector(&"short(2)".parse().unwrap()),
            Err(PluginError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn it_resolves_nested_selectors_through_the_aliases() {
        let provider = provider("required non-null, short text-length(1, 10), all collection");
        let selector: Selector<Widget> = "all(2, required, short)".parse().unwrap();
        assert_eq!(
            provider.plugin_selector(&selector).unwrap(),
            Gadget::new(
                "collection",
                vec![
                    ParameterValue::Number(2.0),
                    ParameterValue::Plugin(Gadget::new("non-null", vec![])),
                    ParameterValue::Plugin(Gadget::new(
                        "text-length",
                        vec![ParameterValue::Number(1.0), ParameterValue::Number(10.0)],
                    )),
                ]
            )
        );
    }

    #[test]
    fn it_fails_on_aliases_for_missing_plugins() {
        let result = AliasesProvider::new(
            "x missing".parse::<AliasSet<Widget>>().unwrap(),
            gadgets(&["a"]),
        );
        assert!(matches!(result, Err(PluginError::UnknownPlugin { .. })));
    }
}
