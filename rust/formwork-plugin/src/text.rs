//! Canonical text encoding shared by every kind-parameterized type.
//!
//! Each type serializes to a single string equal to its [`Display`] form and
//! deserializes by parsing that string back through [`FromStr`].
//!
//! [`Display`]: std::fmt::Display
//! [`FromStr`]: std::str::FromStr

macro_rules! serde_via_text {
    ($type:ident) => {
        impl<K: $crate::PluginKind> ::serde::Serialize for $type<K> {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de, K: $crate::PluginKind> ::serde::Deserialize<'de> for $type<K> {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use serde_via_text;

/// Splits list text on top level commas, skipping commas that appear inside
/// parentheses, string literals or urls. Yields `(start, entry)` pairs where
/// `start` is the character offset of the entry within `text`.
///
/// A url is a whitespace delimited token holding a `:` outside parentheses.
/// Within it parentheses and quotes carry no meaning, and a comma ends the
/// entry only when followed by whitespace or the end of the text.
pub(crate) fn split_entries(text: &str) -> Vec<(usize, &str)> {
    let characters: Vec<(usize, char)> = text.char_indices().collect();
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    let mut in_url = false;
    let mut entry_byte = 0;
    let mut entry_char = 0;

    for (position, &(byte, character)) in characters.iter().enumerate() {
        if quoted {
            match character {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
            continue;
        }
        if in_url {
            let ends_entry = character == ','
                && characters
                    .get(position + 1)
                    .is_none_or(|(_, next)| next.is_whitespace());
            if character.is_whitespace() {
                in_url = false;
            } else if !ends_entry {
                continue;
            }
        }
        match character {
            '"' => quoted = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => in_url = true,
            ',' if depth == 0 => {
                entries.push((entry_char, &text[entry_byte..byte]));
                entry_byte = byte + 1;
                entry_char = position + 1;
                in_url = false;
            }
            _ => {}
        }
    }
    entries.push((entry_char, &text[entry_byte..]));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_splits_on_top_level_commas_only() {
        assert_eq!(
            split_entries("a b(1, \"x,y\"), c"),
            vec![(0, "a b(1, \"x,y\")"), (14, " c")]
        );
    }

    #[test]
    fn it_keeps_commas_and_parentheses_inside_urls() {
        assert_eq!(
            split_entries("a b https://x.org/p,q(r, c d urn:e,f"),
            vec![(0, "a b https://x.org/p,q(r"), (24, " c d urn:e,f")]
        );
        assert_eq!(
            split_entries("https://x.org/a, b"),
            vec![(0, "https://x.org/a"), (16, " b")]
        );
    }

    #[test]
    fn it_keeps_a_single_entry_without_commas() {
        assert_eq!(split_entries("solo"), vec![(0, "solo")]);
    }
}
