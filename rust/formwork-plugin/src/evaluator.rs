//! Interpreter for parsed selector expressions.
//!
//! Evaluation is eager and left-to-right: every parameter is evaluated
//! before the plugin that receives it, so nested references reach their
//! parent as live plugins. The first failure aborts the whole evaluation.

use crate::{Expression, Name, PluginError, PluginKind, Provider};

/// An evaluated parameter handed to a plugin factory.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue<P> {
    /// A numeric literal.
    Number(f64),
    /// A string literal.
    String(String),
    /// A nested selector, already resolved to a plugin.
    Plugin(P),
}

impl<P> ParameterValue<P> {
    /// The number, if this is a numeric literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// The text, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// The plugin, if this was a nested selector.
    pub fn as_plugin(&self) -> Option<&P> {
        match self {
            ParameterValue::Plugin(plugin) => Some(plugin),
            _ => None,
        }
    }

    /// A short description of the value's type, for factory diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Number(_) => "number",
            ParameterValue::String(_) => "string",
            ParameterValue::Plugin(_) => "plugin",
        }
    }
}

impl<K: PluginKind> Expression<K> {
    /// Evaluates this expression, resolving plugin references through
    /// `provider`.
    pub fn evaluate<P>(&self, provider: &P) -> Result<ParameterValue<K::Plugin>, PluginError>
    where
        P: Provider<K> + ?Sized,
    {
        match self {
            Expression::Call { name, parameters } => {
                evaluate_call(provider, name, parameters).map(ParameterValue::Plugin)
            }
            Expression::Number(number) => Ok(ParameterValue::Number(*number)),
            Expression::String(text) => Ok(ParameterValue::String(text.clone())),
        }
    }
}

/// Evaluates `parameters` in order, stopping at the first failure.
pub fn evaluate_parameters<K, P>(
    provider: &P,
    parameters: &[Expression<K>],
) -> Result<Vec<ParameterValue<K::Plugin>>, PluginError>
where
    K: PluginKind,
    P: Provider<K> + ?Sized,
{
    parameters
        .iter()
        .map(|parameter| parameter.evaluate(provider))
        .collect()
}

/// Evaluates `parameters` and then asks `provider` for `name` with the
/// resulting values.
pub fn evaluate_call<K, P>(
    provider: &P,
    name: &Name<K>,
    parameters: &[Expression<K>],
) -> Result<K::Plugin, PluginError>
where
    K: PluginKind,
    P: Provider<K> + ?Sized,
{
    let values = evaluate_parameters(provider, parameters)?;
    tracing::trace!(
        kind = K::LABEL,
        name = %name,
        parameters = values.len(),
        "Resolving plugin"
    );
    provider.plugin(name, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{Gadget, Widget, gadgets};
    use crate::{InfoSet, Selector};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn it_resolves_a_bare_name() {
        let provider = gadgets(&["non-null"]);
        let selector: Selector<Widget> = "non-null".parse().unwrap();
        assert_eq!(
            selector.evaluate(&provider).unwrap(),
            Gadget::new("non-null", vec![])
        );
    }

    #[test]
    fn it_resolves_nested_selectors_before_their_parent() {
        let provider = gadgets(&["collection", "non-null"]);
        let selector: Selector<Widget> = "collection(2, non-null, non-null)".parse().unwrap();
        let non_null = Gadget::new("non-null", vec![]);
        assert_eq!(
            selector.evaluate(&provider).unwrap(),
            Gadget::new(
                "collection",
                vec![
                    ParameterValue::Number(2.0),
                    ParameterValue::Plugin(non_null.clone()),
                    ParameterValue::Plugin(non_null),
                ]
            )
        );
    }

    #[test]
    fn it_passes_string_literals_through() {
        let provider = gadgets(&["pattern"]);
        let selector: Selector<Widget> = r#"pattern("a\\b")"#.parse().unwrap();
        assert_eq!(
            selector.evaluate(&provider).unwrap(),
            Gadget::new("pattern", vec![ParameterValue::String("a\\b".into())])
        );
    }

    /// Records every resolution so that ordering and short-circuiting can be
    /// observed.
    struct Recording {
        infos: InfoSet<Widget>,
        calls: Mutex<Vec<String>>,
    }

    impl Provider<Widget> for Recording {
        fn plugin(
            &self,
            name: &Name<Widget>,
            values: &[ParameterValue<Gadget>],
        ) -> Result<Gadget, PluginError> {
            self.calls.lock().unwrap().push(name.to_string());
            if name.as_str() == "broken" {
                return Err(PluginError::unknown::<Widget>(name));
            }
            Ok(Gadget::new(name.as_str(), values.to_vec()))
        }

        fn infos(&self) -> &InfoSet<Widget> {
            &self.infos
        }
    }

    #[test]
    fn it_evaluates_left_to_right_and_stops_at_the_first_failure() {
        let provider = Recording {
            infos: InfoSet::empty(),
            calls: Mutex::new(Vec::new()),
        };
        let selector: Selector<Widget> = "outer(a, inner(b), broken, c)".parse().unwrap();
        assert_eq!(
            selector.evaluate(&provider),
            Err(PluginError::UnknownPlugin {
                kind: "widget",
                name: "broken".into()
            })
        );
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec!["a", "b", "inner", "broken"]
        );
    }

    #[test]
    fn it_does_not_call_the_provider_when_parsing_fails() {
        let provider = Recording {
            infos: InfoSet::empty(),
            calls: Mutex::new(Vec::new()),
        };
        let selector: Selector<Widget> = "outer(a, 1x)".parse().unwrap();
        assert!(matches!(
            selector.evaluate(&provider),
            Err(PluginError::InvalidCharacter { position: 10, .. })
        ));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn it_refuses_runaway_nesting_before_resolving_anything() {
        let provider = Recording {
            infos: InfoSet::empty(),
            calls: Mutex::new(Vec::new()),
        };
        let depth = 5_000;
        let selector: Selector<Widget> = format!("a{}{}", "(a".repeat(depth), ")".repeat(depth))
            .parse()
            .unwrap();
        assert!(matches!(
            selector.evaluate(&provider),
            Err(PluginError::NestingTooDeep { max: crate::SELECTOR_MAX_DEPTH, .. })
        ));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn it_exposes_typed_accessors() {
        let number = ParameterValue::<Gadget>::Number(1.5);
        assert_eq!(number.as_number(), Some(1.5));
        assert_eq!(number.as_str(), None);
        assert_eq!(number.type_name(), "number");
        let plugin = ParameterValue::Plugin(Gadget::new("x", vec![]));
        assert_eq!(plugin.as_plugin().map(|gadget| gadget.name.as_str()), Some("x"));
    }
}
