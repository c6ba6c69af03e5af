//! Translation sets and their on-repository encoding.

use crate::error::{Result, TranspubError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Translation keys mapped to translated strings.
///
/// Keys keep the order in which they were inserted, so a published file
/// reads the same way the contributor wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TranslationSet {
    entries: Map<String, Value>,
}

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object whose values are all strings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(TranspubError::invalid_translations(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Inserts or replaces a translation, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(key.into(), Value::String(value.into()))
            .and_then(|previous| previous.as_str().map(str::to_string))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, translation)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.as_str(), v)))
    }

    /// Pretty-printed JSON with two-space indentation, as stored in the repository.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Base64 of [`Self::to_pretty_json`], the form the contents API expects.
    pub fn encode_file_content(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_pretty_json()?))
    }
}

impl TryFrom<Map<String, Value>> for TranslationSet {
    type Error = TranspubError;

    fn try_from(entries: Map<String, Value>) -> Result<Self> {
        if let Some((key, value)) = entries.iter().find(|(_, v)| !v.is_string()) {
            return Err(TranspubError::invalid_translations(format!(
                "value for key '{}' must be a string, found {}",
                key,
                json_kind(value)
            )));
        }
        Ok(Self { entries })
    }
}

impl From<TranslationSet> for Map<String, Value> {
    fn from(set: TranslationSet) -> Self {
        set.entries
    }
}

impl<K, V> FromIterator<(K, V)> for TranslationSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
