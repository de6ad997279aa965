//! Test fixtures: a `Widget` plugin kind whose plugins record how they were
//! built.

use url::Url;

use crate::{Info, Name, ParameterValue, PluginKind, TableProvider};

/// A plugin kind used by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Widget;

impl Widget {
    /// A well-known widget name.
    pub const BUTTON: Name<Widget> = Name::constant("button");
}

impl PluginKind for Widget {
    const LABEL: &'static str = "widget";
    const CONSTANTS: &'static [&'static str] = &["button"];
    type Plugin = Gadget;
}

/// A widget plugin: the name it was resolved under and the values its
/// factory received.
#[derive(Debug, Clone, PartialEq)]
pub struct Gadget {
    /// The resolved name.
    pub name: String,
    /// The parameter values passed to the factory.
    pub values: Vec<ParameterValue<Gadget>>,
}

impl Gadget {
    /// Creates a new [`Gadget`].
    pub fn new(name: &str, values: Vec<ParameterValue<Gadget>>) -> Self {
        Self {
            name: name.to_owned(),
            values,
        }
    }
}

/// Parses a widget name.
#[allow(clippy::unwrap_used)]
pub fn name(text: &str) -> Name<Widget> {
    Name::parse(text).unwrap()
}

/// `https://example.com/<path>`.
#[allow(clippy::unwrap_used)]
pub fn url(path: &str) -> Url {
    Url::parse(&format!("https://example.com/{path}")).unwrap()
}

/// Builds a widget info from a url and a name.
#[allow(clippy::unwrap_used)]
pub fn info(url: &str, name: &str) -> Info<Widget> {
    Info::new(self::name(name), Url::parse(url).unwrap()).unwrap()
}

/// A table provider with one recording factory per name, advertised at
/// `https://example.com/<name>`.
#[allow(clippy::unwrap_used)]
pub fn gadgets(names: &[&str]) -> TableProvider<Widget> {
    names
        .iter()
        .fold(TableProvider::builder(), |builder, text| {
            let resolved = text.to_string();
            builder.plugin(name(text), url(text), move |values| {
                Ok(Gadget::new(&resolved, values.to_vec()))
            })
        })
        .build()
        .unwrap()
}
