//! Alternate names for plugins and the algebra that applies them.
//!
//! An [`AliasSet`] is written as comma separated entries:
//!
//! ```text
//! non-null                                        plain: keep the name visible
//! required non-null                               rename
//! required non-null https://example.com/required  rename with its own url
//! short text-length(1, 10) https://example.com/s  bound macro
//! ```
//!
//! A rename hides its target: once `required` aliases `non-null`, only
//! `required` is advertised, unless `non-null` is also listed as a plain
//! entry. A bound macro names a fixed selector and takes no parameters of
//! its own.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::info::{duplicate_names, listable_url, parse_url};
use crate::name::is_name_part;
use crate::text::{serde_via_text, split_entries};
use crate::{Info, InfoSet, Name, PluginError, PluginKind, Selector};

/// One entry of an [`AliasSet`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias<K: PluginKind> {
    name: Name<K>,
    selector: Option<Selector<K>>,
    url: Option<Url>,
}

impl<K: PluginKind> Alias<K> {
    /// A plain entry: `name` stays visible as itself.
    pub fn plain(name: Name<K>) -> Self {
        Self {
            name,
            selector: None,
            url: None,
        }
    }

    /// An alias for `selector`. A selector without parameter text makes a
    /// rename, anything else (including `()`) a bound macro.
    ///
    /// Fails if `url` has a comma that cannot be percent-encoded.
    pub fn new(
        name: Name<K>,
        selector: Selector<K>,
        url: Option<Url>,
    ) -> Result<Self, PluginError> {
        Ok(Self {
            name,
            selector: Some(selector),
            url: url.map(listable_url).transpose()?,
        })
    }

    /// The declared name.
    pub fn name(&self) -> &Name<K> {
        &self.name
    }

    /// The aliased selector, absent for plain entries.
    pub fn selector(&self) -> Option<&Selector<K>> {
        self.selector.as_ref()
    }

    /// The documentation url, if declared.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Returns true for entries that only keep a name visible.
    pub fn is_plain(&self) -> bool {
        self.selector.is_none()
    }

    /// The renamed plugin, if this is a rename.
    pub fn rename_target(&self) -> Option<&Name<K>> {
        self.selector
            .as_ref()
            .filter(|selector| !selector.has_parameters())
            .map(Selector::name)
    }

    /// The fixed selector, if this is a bound macro.
    pub fn bound_selector(&self) -> Option<&Selector<K>> {
        self.selector
            .as_ref()
            .filter(|selector| selector.has_parameters())
    }
}

impl<K: PluginKind> fmt::Display for Alias<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(selector) = &self.selector {
            write!(f, " {selector}")?;
        }
        if let Some(url) = &self.url {
            write!(f, " {url}")?;
        }
        Ok(())
    }
}

impl<K: PluginKind> FromStr for Alias<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AliasScanner::new(s).alias()
    }
}

serde_via_text!(Alias);

/// Character level reader for a single alias entry.
struct AliasScanner<'a> {
    text: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> AliasScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn invalid_character(&self) -> PluginError {
        match self.peek() {
            Some(character) => PluginError::InvalidCharacter {
                text: self.text.to_owned(),
                character,
                position: self.position,
            },
            None => PluginError::EndOfText {
                text: self.text.to_owned(),
                expected: "alias",
            },
        }
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.position].iter().collect()
    }

    fn name<K: PluginKind>(&mut self) -> Result<Name<K>, PluginError> {
        let start = self.position;
        while self.peek().is_some_and(is_name_part) {
            self.position += 1;
        }
        if start == self.position {
            return Err(self.invalid_character());
        }
        Name::parse(&self.slice(start)).map_err(|error| error.within(self.text, start))
    }

    fn selector<K: PluginKind>(&mut self) -> Result<Selector<K>, PluginError> {
        let start = self.position;
        self.name::<K>()?;

        let after_name = self.position;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.skip_parameter_list()?;
        } else {
            self.position = after_name;
        }

        Selector::parse(&self.slice(start)).map_err(|error| error.within(self.text, start))
    }

    /// Skips a balanced `( ... )`, ignoring parentheses inside string
    /// literals. The contents are parsed later, when the selector is
    /// evaluated.
    fn skip_parameter_list(&mut self) -> Result<(), PluginError> {
        let mut depth = 0usize;
        let mut quoted = false;
        let mut escaped = false;

        while let Some(character) = self.peek() {
            self.position += 1;
            if quoted {
                match character {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => quoted = false,
                    _ => {}
                }
                continue;
            }
            match character {
                '"' => quoted = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(PluginError::EndOfText {
            text: self.text.to_owned(),
            expected: "')'",
        })
    }

    fn url(&mut self) -> Result<Url, PluginError> {
        let start = self.position;
        while self.peek().is_some_and(|character| !character.is_whitespace()) {
            self.position += 1;
        }
        parse_url(&self.slice(start))
    }

    fn alias<K: PluginKind>(mut self) -> Result<Alias<K>, PluginError> {
        self.skip_whitespace();
        let name = self.name()?;
        if self.peek().is_some_and(|character| !character.is_whitespace()) {
            return Err(self.invalid_character());
        }

        self.skip_whitespace();
        if self.peek().is_none() {
            return Ok(Alias::plain(name));
        }

        let selector = self.selector()?;
        if self.peek().is_some_and(|character| !character.is_whitespace()) {
            return Err(self.invalid_character());
        }
        self.skip_whitespace();
        let url = match self.peek() {
            Some(_) => Some(self.url()?),
            None => None,
        };

        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.invalid_character());
        }

        Alias::new(name, selector, url)
    }
}

/// A name-sorted set of [`Alias`] entries for plugins of kind `K`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AliasSet<K: PluginKind> {
    aliases: BTreeMap<Name<K>, Alias<K>>,
    targets: BTreeSet<Name<K>>,
}

impl<K: PluginKind> AliasSet<K> {
    /// Builds a set, failing with [`PluginError::AliasCardinality`] when a
    /// name is declared twice, a rename targets itself, or an alias name is
    /// also the target of a rename.
    pub fn new(aliases: impl IntoIterator<Item = Alias<K>>) -> Result<Self, PluginError> {
        let mut set = BTreeMap::new();
        let mut duplicates = Vec::new();

        for alias in aliases {
            if alias.rename_target() == Some(&alias.name) {
                return Err(PluginError::AliasCardinality(format!(
                    "Alias {} must not rename itself",
                    alias.name
                )));
            }
            if let Some(previous) = set.insert(alias.name.clone(), alias) {
                duplicates.push(previous.name);
            }
        }

        if !duplicates.is_empty() {
            return Err(duplicate_names::<K>(duplicates));
        }

        let targets: BTreeSet<Name<K>> = set
            .values()
            .filter_map(Alias::rename_target)
            .cloned()
            .collect();

        let clashes: Vec<String> = set
            .values()
            .filter(|alias| !alias.is_plain() && targets.contains(&alias.name))
            .map(|alias| alias.name.to_string())
            .collect();
        if !clashes.is_empty() {
            return Err(PluginError::AliasCardinality(format!(
                "Alias names also renamed by another alias: {}",
                clashes.join(", ")
            )));
        }

        Ok(Self {
            aliases: set,
            targets,
        })
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// The entry declared under `name`.
    pub fn get(&self, name: &Name<K>) -> Option<&Alias<K>> {
        self.aliases.get(name)
    }

    /// Returns true if `name` is declared.
    pub fn contains(&self, name: &Name<K>) -> bool {
        self.aliases.contains_key(name)
    }

    /// Iterates the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Alias<K>> {
        self.aliases.values()
    }

    /// Iterates the declared names in order.
    pub fn names(&self) -> impl Iterator<Item = &Name<K>> {
        self.aliases.keys()
    }

    /// The fixed selector `name` stands for, if it is a bound macro.
    pub fn alias_selector(&self, name: &Name<K>) -> Option<&Selector<K>> {
        self.aliases.get(name).and_then(Alias::bound_selector)
    }

    /// Translates a consumer facing name to the upstream name.
    ///
    /// Returns the target of a rename, `None` for a name hidden by a rename
    /// (and not also declared plain) or bound to a macro, and the name
    /// itself otherwise.
    pub fn alias_or_name(&self, name: &Name<K>) -> Option<Name<K>> {
        match self.aliases.get(name) {
            Some(alias) if alias.is_plain() => Some(name.clone()),
            Some(alias) => alias.rename_target().cloned(),
            None if self.targets.contains(name) => None,
            None => Some(name.clone()),
        }
    }

    /// Rewrites `selector` into the upstream namespace.
    ///
    /// A bound macro is replaced by its fixed selector and must not be given
    /// parameters; an empty `()` is accepted. Any other selector keeps its
    /// parameter text and has its name translated through
    /// [`AliasSet::alias_or_name`].
    pub fn selector(&self, selector: &Selector<K>) -> Result<Selector<K>, PluginError> {
        let name = selector.name();
        if let Some(bound) = self.alias_selector(name) {
            if !selector.parse_parameters()?.is_empty() {
                return Err(PluginError::invalid_parameters(
                    name,
                    "an alias bound to a selector takes no parameters",
                ));
            }
            return Ok(bound.clone());
        }

        self.alias_or_name(name)
            .map(|target| selector.set_name(target))
            .ok_or_else(|| PluginError::unknown::<K>(name))
    }

    /// Applies the aliases to `infos`, producing what a consumer sees.
    ///
    /// Renamed infos are advertised under their alias (with the alias url
    /// when one is declared), plain entries keep their name visible next to
    /// any alias, and bound macros are added with their url or the url of
    /// the plugin they select. Every alias must refer to an advertised
    /// plugin, and no two results may share a name.
    pub fn merge(&self, infos: &InfoSet<K>) -> Result<InfoSet<K>, PluginError> {
        if self.is_empty() {
            return Ok(infos.clone());
        }

        for alias in self.aliases.values() {
            let referenced = match alias.selector() {
                Some(selector) => selector.name(),
                None => alias.name(),
            };
            if !infos.contains(referenced) {
                return Err(PluginError::unknown::<K>(referenced));
            }
        }

        let mut merged = Vec::new();
        for info in infos {
            let renames: Vec<&Alias<K>> = self
                .aliases
                .values()
                .filter(|alias| alias.rename_target() == Some(info.name()))
                .collect();

            let declared_plain = self.get(info.name()).is_some_and(Alias::is_plain);
            if renames.is_empty() || declared_plain {
                merged.push(info.clone());
            }
            for alias in renames {
                merged.push(Info::new(
                    alias.name.clone(),
                    alias.url.clone().unwrap_or_else(|| info.url().clone()),
                )?);
            }
        }

        for alias in self.aliases.values() {
            if let Some(bound) = alias.bound_selector() {
                let url = match &alias.url {
                    Some(url) => url.clone(),
                    None => infos
                        .get(bound.name())
                        .map(|info| info.url().clone())
                        .ok_or_else(|| PluginError::unknown::<K>(bound.name()))?,
                };
                merged.push(Info::new(alias.name.clone(), url)?);
            }
        }

        InfoSet::new(merged)
    }
}

impl<'a, K: PluginKind> IntoIterator for &'a AliasSet<K> {
    type Item = &'a Alias<K>;
    type IntoIter = std::collections::btree_map::Values<'a, Name<K>, Alias<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.aliases.values()
    }
}

impl<K: PluginKind> fmt::Display for AliasSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, alias) in self.aliases.values().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{alias}")?;
        }
        Ok(())
    }
}

impl<K: PluginKind> FromStr for AliasSet<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        let aliases = split_entries(s)
            .into_iter()
            .map(|(start, entry)| {
                entry
                    .parse::<Alias<K>>()
                    .map_err(|error| error.within(s, start))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(aliases)
    }
}

serde_via_text!(AliasSet);
