//! Identity records advertised by providers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::text::{serde_via_text, split_entries};
use crate::{Name, PluginError, PluginKind};

/// The `(name, url)` pair a provider advertises for one plugin.
///
/// The url documents the plugin and identifies it across providers; the name
/// is how consumers select it. Text form is `"<url> <name>"`.
///
/// Infos are written into comma separated lists, so commas in the url are
/// stored percent-encoded as `%2C`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Info<K: PluginKind> {
    name: Name<K>,
    url: Url,
}

impl<K: PluginKind> Info<K> {
    /// Creates a new [`Info`], failing if `url` has a comma that cannot be
    /// percent-encoded.
    pub fn new(name: Name<K>, url: Url) -> Result<Self, PluginError> {
        Ok(Self {
            name,
            url: listable_url(url)?,
        })
    }

    /// The advertised name.
    pub fn name(&self) -> &Name<K> {
        &self.name
    }

    /// The documentation / identity url.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns a copy carrying a different name.
    pub fn set_name(&self, name: Name<K>) -> Self {
        Self {
            name,
            url: self.url.clone(),
        }
    }
}

impl<K: PluginKind> fmt::Display for Info<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.name)
    }
}

impl<K: PluginKind> FromStr for Info<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start();
        let leading = s.chars().count() - trimmed.chars().count();
        let trimmed = trimmed.trim_end();

        let Some((url, name)) = trimmed.split_once(char::is_whitespace) else {
            return Err(PluginError::EndOfText {
                text: s.to_owned(),
                expected: "name after url",
            });
        };
        let url = parse_url(url)?;

        let name_text = name.trim_start();
        let name_start = leading + trimmed.chars().count() - name_text.chars().count();
        let name = Name::parse(name_text).map_err(|error| error.within(s, name_start))?;

        Ok(Self { name, url })
    }
}

serde_via_text!(Info);

pub(crate) fn parse_url(text: &str) -> Result<Url, PluginError> {
    let url = Url::parse(text).map_err(|error| PluginError::InvalidUrl {
        text: text.to_owned(),
        reason: error.to_string(),
    })?;
    listable_url(url)
}

/// Percent-encodes every `,` in `url`. Commas that the url parser decodes
/// again, as in hosts, are rejected.
pub(crate) fn listable_url(url: Url) -> Result<Url, PluginError> {
    if !url.as_str().contains(',') {
        return Ok(url);
    }
    match Url::parse(&url.as_str().replace(',', "%2C")) {
        Ok(encoded) if !encoded.as_str().contains(',') => Ok(encoded),
        _ => Err(PluginError::InvalidUrl {
            text: url.to_string(),
            reason: "',' is only allowed where it can be percent-encoded".into(),
        }),
    }
}

/// A name-sorted set of [`Info`] in which every name appears once.
///
/// Urls need not be unique; identity within the set is by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InfoSet<K: PluginKind> {
    infos: BTreeMap<Name<K>, Info<K>>,
}

impl<K: PluginKind> InfoSet<K> {
    /// Builds a set, failing with [`PluginError::AliasCardinality`] if any
    /// name appears more than once.
    pub fn new(infos: impl IntoIterator<Item = Info<K>>) -> Result<Self, PluginError> {
        let mut set = BTreeMap::new();
        let mut duplicates = Vec::new();

        for info in infos {
            if let Some(previous) = set.insert(info.name.clone(), info) {
                duplicates.push(previous.name);
            }
        }

        if !duplicates.is_empty() {
            return Err(duplicate_names::<K>(duplicates));
        }

        Ok(Self { infos: set })
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of infos.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if the set holds no infos.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Looks up the info advertised under `name`.
    pub fn get(&self, name: &Name<K>) -> Option<&Info<K>> {
        self.infos.get(name)
    }

    /// Returns true if `name` is advertised.
    pub fn contains(&self, name: &Name<K>) -> bool {
        self.infos.contains_key(name)
    }

    /// The first info (in name order) carrying `url`.
    pub fn by_url(&self, url: &Url) -> Option<&Info<K>> {
        let url = listable_url(url.clone()).ok()?;
        self.infos.values().find(|info| info.url == url)
    }

    /// Iterates the infos in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Info<K>> {
        self.infos.values()
    }

    /// Iterates the names in order.
    pub fn names(&self) -> impl Iterator<Item = &Name<K>> {
        self.infos.keys()
    }

    /// Combines two sets. Infos present in both with the same url collapse
    /// into one; the same name with different urls is a cardinality error.
    pub fn union(&self, other: &Self) -> Result<Self, PluginError> {
        let mut infos = self.infos.clone();
        let mut conflicts = Vec::new();

        for (name, info) in &other.infos {
            match infos.get(name) {
                Some(existing) if existing.url != info.url => conflicts.push(name.clone()),
                Some(_) => {}
                None => {
                    infos.insert(name.clone(), info.clone());
                }
            }
        }

        if !conflicts.is_empty() {
            return Err(duplicate_names::<K>(conflicts));
        }

        Ok(Self { infos })
    }

    /// Keeps only the infos matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&Info<K>) -> bool) -> Self {
        Self {
            infos: self
                .infos
                .iter()
                .filter(|(_, info)| predicate(info))
                .map(|(name, info)| (name.clone(), info.clone()))
                .collect(),
        }
    }

    /// Renames every info through `rename`, failing if two infos end up with
    /// the same name.
    pub fn rename(&self, rename: impl Fn(&Name<K>) -> Name<K>) -> Result<Self, PluginError> {
        Self::new(self.iter().map(|info| info.set_name(rename(&info.name))))
    }

    /// Returns a copy without `name`.
    pub fn delete(&self, name: &Name<K>) -> Self {
        let mut infos = self.infos.clone();
        infos.remove(name);
        Self { infos }
    }
}

impl<'a, K: PluginKind> IntoIterator for &'a InfoSet<K> {
    type Item = &'a Info<K>;
    type IntoIter = std::collections::btree_map::Values<'a, Name<K>, Info<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.infos.values()
    }
}

impl<K: PluginKind> fmt::Display for InfoSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, info) in self.infos.values().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{info}")?;
        }
        Ok(())
    }
}

impl<K: PluginKind> FromStr for InfoSet<K> {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        let infos = split_entries(s)
            .into_iter()
            .map(|(start, entry)| {
                entry
                    .parse::<Info<K>>()
                    .map_err(|error| error.within(s, start))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(infos)
    }
}

serde_via_text!(InfoSet);

pub(crate) fn duplicate_names<K: PluginKind>(names: Vec<Name<K>>) -> PluginError {
    let mut names: Vec<String> = names.into_iter().map(String::from).collect();
    names.sort();
    names.dedup();
    PluginError::AliasCardinality(format!(
        "Duplicate {} names: {}",
        K::LABEL,
        names.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{Widget, info, name};
    use pretty_assertions::assert_eq;

    #[test]
    fn it_formats_url_then_name() {
        let info = info("https://example.com/button", "button");
        assert_eq!(info.to_string(), "https://example.com/button button");
        assert_eq!(info.to_string().parse::<Info<Widget>>().unwrap(), info);
    }

    #[test]
    fn it_rejects_info_without_name() {
        assert!(matches!(
            "https://example.com/button".parse::<Info<Widget>>(),
            Err(PluginError::EndOfText { .. })
        ));
    }

    #[test]
    fn it_reports_name_errors_relative_to_the_info_text() {
        assert_eq!(
            "https://example.com/x bu$".parse::<Info<Widget>>(),
            Err(PluginError::InvalidCharacter {
                text: "https://example.com/x bu$".into(),
                character: '$',
                position: 24,
            })
        );
    }

    #[test]
    fn it_rejects_relative_urls() {
        assert!(matches!(
            "button button".parse::<Info<Widget>>(),
            Err(PluginError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn it_sorts_by_name_and_round_trips() {
        let set = InfoSet::new([
            info("https://example.com/z", "zebra"),
            info("https://example.com/a", "apple"),
        ])
        .unwrap();
        assert_eq!(
            set.to_string(),
            "https://example.com/a apple, https://example.com/z zebra"
        );
        assert_eq!(set.to_string().parse::<InfoSet<Widget>>().unwrap(), set);
        assert_eq!("".parse::<InfoSet<Widget>>().unwrap(), InfoSet::empty());
    }

    #[test]
    fn it_rejects_duplicate_names() {
        let error = InfoSet::new([
            info("https://example.com/1", "dup"),
            info("https://example.com/2", "dup"),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            PluginError::AliasCardinality("Duplicate widget names: dup".into())
        );
    }

    #[test]
    fn it_unions_sets() {
        let left = InfoSet::new([info("https://example.com/a", "a")]).unwrap();
        let right = InfoSet::new([
            info("https://example.com/a", "a"),
            info("https://example.com/b", "b"),
        ])
        .unwrap();
        let union = left.union(&right).unwrap();
        assert_eq!(union.names().cloned().collect::<Vec<_>>(), vec![name("a"), name("b")]);

        let conflicting = InfoSet::new([info("https://example.com/other", "a")]).unwrap();
        assert!(matches!(
            left.union(&conflicting),
            Err(PluginError::AliasCardinality(_))
        ));
    }

    #[test]
    fn it_filters_renames_and_deletes() {
        let set = InfoSet::new([
            info("https://example.com/a", "a"),
            info("https://example.com/b", "b"),
        ])
        .unwrap();

        let filtered = set.filter(|info| info.name().as_str() == "b");
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains(&name("b")));

        let renamed = set
            .rename(|n| if n.as_str() == "a" { name("c") } else { n.clone() })
            .unwrap();
        assert_eq!(
            renamed.get(&name("c")).map(|info| info.url().as_str()),
            Some("https://example.com/a")
        );
        assert!(!renamed.contains(&name("a")));

        assert!(matches!(
            set.rename(|_| name("same")),
            Err(PluginError::AliasCardinality(_))
        ));

        let deleted = set.delete(&name("a"));
        assert_eq!(deleted.names().cloned().collect::<Vec<_>>(), vec![name("b")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn it_finds_infos_by_url() {
        let set = InfoSet::new([info("https://example.com/a", "a")]).unwrap();
        let url = Url::parse("https://example.com/a").unwrap();
        assert_eq!(set.by_url(&url).map(|info| info.name().clone()), Some(name("a")));
    }

    #[test]
    fn it_serializes_as_a_json_string() {
        let set = InfoSet::new([info("https://example.com/a", "a")]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "\"https://example.com/a a\"");
        assert_eq!(serde_json::from_str::<InfoSet<Widget>>(&json).unwrap(), set);
    }

    #[test]
    fn it_encodes_commas_in_urls_so_sets_round_trip() {
        let info = info("https://example.com/a,b?q=1,2", "x");
        assert_eq!(info.url().as_str(), "https://example.com/a%2Cb?q=1%2C2");

        let set = InfoSet::new([info.clone(), self::info("https://example.com/c", "y")]).unwrap();
        assert_eq!(
            set.to_string(),
            "https://example.com/a%2Cb?q=1%2C2 x, https://example.com/c y"
        );
        assert_eq!(set.to_string().parse::<InfoSet<Widget>>().unwrap(), set);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(serde_json::from_str::<InfoSet<Widget>>(&json).unwrap(), set);

        let url = Url::parse("https://example.com/a,b?q=1,2").unwrap();
        assert_eq!(set.by_url(&url), Some(&info));
    }

    #[test]
    fn it_reads_unencoded_commas_inside_urls() {
        let set: InfoSet<Widget> = "https://example.com/a,b x, https://example.com/(c y"
            .parse()
            .unwrap();
        assert_eq!(
            set.get(&name("x")).map(|info| info.url().as_str()),
            Some("https://example.com/a%2Cb")
        );
        assert_eq!(
            set.get(&name("y")).map(|info| info.url().as_str()),
            Some("https://example.com/(c")
        );
    }
}
