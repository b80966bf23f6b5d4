use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

/// A loosely-typed legacy JSON object.
pub type LegacyMap = Map<String, Value>;

/// Kind of legacy profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyProfileKind {
    /// `Hosts/<uuid>.json`
    Host,
    /// `Providers/<name>.json`
    Provider,
}

impl LegacyProfileKind {
    /// Name used in keychain contexts and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for LegacyProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reads on a [`LegacyMap`].
///
/// A value of the wrong JSON type reads as absent. Lists and maps are all-or-nothing: a single
/// mistyped element makes the whole value absent.
pub trait LegacyMapExt {
    /// A string value.
    fn string(&self, key: &str) -> Option<&str>;

    /// A boolean value.
    fn bool(&self, key: &str) -> Option<bool>;

    /// A nested object.
    fn map(&self, key: &str) -> Option<&LegacyMap>;

    /// A list made only of strings.
    fn string_list(&self, key: &str) -> Option<Vec<String>>;

    /// An object whose values are all booleans.
    fn bool_map(&self, key: &str) -> Option<BTreeMap<String, bool>>;

    /// An integer that fits into 16 bits unsigned.
    fn u16(&self, key: &str) -> Option<u16>;

    /// An integer.
    fn int(&self, key: &str) -> Option<i64>;
}

impl LegacyMapExt for LegacyMap {
    fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn map(&self, key: &str) -> Option<&LegacyMap> {
        self.get(key).and_then(Value::as_object)
    }

    fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)?
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(ToString::to_string))
            .collect()
    }

    fn bool_map(&self, key: &str) -> Option<BTreeMap<String, bool>> {
        self.get(key)?
            .as_object()?
            .iter()
            .map(|(name, value)| value.as_bool().map(|flag| (name.clone(), flag)))
            .collect()
    }

    fn u16(&self, key: &str) -> Option<u16> {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|value| u16::try_from(value).ok())
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }
}

/// The legacy connection service index, `ConnectionService.json`.
#[derive(Debug, Clone, Default)]
pub struct LegacyIndex {
    document: LegacyMap,
}

impl LegacyIndex {
    /// Wraps the parsed index document.
    #[must_use]
    pub const fn new(document: LegacyMap) -> Self {
        Self { document }
    }

    /// Display title of a host, keyed by its legacy identifier.
    #[must_use]
    pub fn host_title(&self, legacy_id: &str) -> Option<&str> {
        self.document
            .map("hostTitles")
            .and_then(|titles| titles.string(legacy_id))
    }
}
