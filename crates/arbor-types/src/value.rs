use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single persisted property value.
///
/// Property sets are heterogeneous: a title is localized per language, a
/// virtual-host list is multi-valued, a counter is an integer. The variants
/// here cover the value shapes the repository persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// A plain string.
    Str(String),
    /// A signed integer.
    Int(i64),
    /// A boolean flag.
    Flag(bool),
    /// A multi-valued list of tokens (e.g. virtual host names).
    Tokens(Vec<String>),
    /// Per-language text, keyed by language code.
    Localized(BTreeMap<String, String>),
}

impl PropertyValue {
    /// The string content, if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The token list, if this is a `Tokens` value.
    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            PropertyValue::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// Localized text for `language`, if this is a `Localized` value.
    ///
    /// Falls back to any available language when the requested one is
    /// missing, matching how titles degrade on partially translated sites.
    pub fn localized(&self, language: &str) -> Option<&str> {
        match self {
            PropertyValue::Localized(map) => map
                .get(language)
                .or_else(|| map.values().next())
                .map(String::as_str),
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Int(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Flag(b)
    }
}
