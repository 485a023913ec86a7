use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single extracted field: either one text value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
}

impl RawValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }
}

/// Unvalidated field mapping for one result item, straight from the markup.
/// Fields may be missing, empty, or untrimmed; validation happens later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .insert(name.to_string(), RawValue::Text(value.into()));
    }

    pub fn set_list(&mut self, name: &str, values: Vec<String>) {
        self.fields.insert(name.to_string(), RawValue::List(values));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(RawValue::as_text)
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).and_then(RawValue::as_list)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
