//! Textual plugin references.

use std::fmt;
use std::str::FromStr;

use crate::evaluator::evaluate_call;
use crate::name::is_name_part;
use crate::parser::parse_parameters;
use crate::text::serde_via_text;
use crate::{Expression, Name, PluginError, PluginKind, Provider};

/// A plugin name plus its verbatim, unparsed parameter text.
///
/// Only the name is validated on construction; the parameter text is kept
/// as written and parsed on demand by [`Selector::evaluate`], so selectors
/// can be stored and serialized before any provider exists.
///
/// ```
/// # use formwork_plugin::{PluginKind, Selector};
/// # #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// # struct Widget;
/// # impl PluginKind for Widget {
/// #     const LABEL: &'static str = "widget";
/// #     type Plugin = ();
/// # }
/// let selector: Selector<Widget> = "collection(3, non-null, text-length(1,10))".parse().unwrap();
/// assert_eq!(selector.name().as_str(), "collection");
/// assert_eq!(selector.value_text(), "(3, non-null, text-length(1,10))");
/// assert_eq!(selector.to_string(), "collection(3, non-null, text-length(1,10))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector<K: PluginKind> {
    name: Name<K>,
    text: String,
}

impl<K: PluginKind> Selector<K> {
    /// A selector with no parameter text.
    pub fn new(name: Name<K>) -> Self {
        Self {
            name,
            text: String::new(),
        }
    }

    /// Builds a selector from a name and parameter text, checking only that
    /// the text is empty or opens a parameter list.
    pub fn with_text(name: Name<K>, text: impl Into<String>) -> Result<Self, PluginError> {
        let text = text.into();
        check_value_text(&name, &text)?;
        Ok(Self { name, text })
    }

    /// Parses `name` or `name(...)`.
    pub fn parse(text: &str) -> Result<Self, PluginError> {
        let end = text
            .char_indices()
            .find(|(_, character)| !is_name_part(*character))
            .map(|(byte, _)| byte)
            .unwrap_or(text.len());

        let name = Name::parse(&text[..end])?;
        let value_text = &text[end..];
        check_value_text(&name, value_text)?;

        Ok(Self {
            name,
            text: value_text.to_owned(),
        })
    }

    /// The selected plugin.
    pub fn name(&self) -> &Name<K> {
        &self.name
    }

    /// The verbatim parameter text, including parentheses.
    pub fn value_text(&self) -> &str {
        &self.text
    }

    /// Returns true if the parameter text holds anything but whitespace.
    pub fn has_parameters(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Returns a copy selecting a different plugin with the same parameters.
    pub fn set_name(&self, name: Name<K>) -> Self {
        Self {
            name,
            text: self.text.clone(),
        }
    }

    /// Returns a copy with different parameter text.
    pub fn set_text(&self, text: impl Into<String>) -> Result<Self, PluginError> {
        Self::with_text(self.name.clone(), text)
    }

    /// Parses the parameter text into expressions without evaluating them.
    pub fn parse_parameters(&self) -> Result<Vec<Expression<K>>, PluginError> {
        parse_parameters(&self.to_string(), self.name.char_len())
    }

    /// Parses the whole selector into a single call expression.
    pub fn expression(&self) -> Result<Expression<K>, PluginError> {
        Ok(Expression::Call {
            name: self.name.clone(),
            parameters: self.parse_parameters()?,
        })
    }

    /// Parses the parameter text and resolves the selector through
    /// `provider`, resolving nested selectors first.
    pub fn evaluate<P>(&self, provider: &P) -> Result<K::Plugin, PluginError>
    where
        P: Provider<K> + ?Sized,
    {
        let parameters = self.parse_parameters()?;
        evaluate_call(provider, &self.name, &parameters)
    }
}

fn check_value_text<K: PluginKind>(name: &Name<K>, text: &str) -> Result<(), PluginError> {
    let skipped = text.chars().take_while(|character| character.is_whitespace());
    let offset = skipped.count();
    match text.chars().nth(offset) {
        None | Some('(') => Ok(()),
        Some(character) => Err(PluginError::InvalidCharacter {
            text: format!("{name}{text}"),
            character,
            position: name.char_len() + offset,
        }),
    }
}

impl<K: PluginKind> From<Name<K>> for Selector<K> {
    fn from(name: Name<K>) -> Self {
        Self::new(name)
    }
}

impl<K: PluginKind> fmt::Display for Selector<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.text)
    }
}

impl<K: PluginKind> FromStr for Selector<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

serde_via_text!(Selector);
