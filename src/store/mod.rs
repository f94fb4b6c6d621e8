//! Ordered flat key/value store persisted as a properties file.
//!
//! Keys are dotted strings. A value is either a single string or an ordered
//! list of strings; lists are written as one `key = element` line per element
//! and repeated keys are read back as a list. Typed accessors parse the stored
//! text on demand.

mod layout;
mod text;

pub use layout::{DEFAULT_COMMENT_LEADER, DEFAULT_SEPARATOR, Layout};

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result, StoreError};
use crate::schema::ScalarType;
use crate::value::Value;

/// A stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Single(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// First element for lists, the value itself otherwise.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::Single(s) => Some(s),
            PropertyValue::List(items) => items.first().map(String::as_str),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        match self {
            PropertyValue::Single(s) => vec![s.clone()],
            PropertyValue::List(items) => items.clone(),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Single(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        PropertyValue::List(values)
    }
}

/// Ordered properties with a formatting layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesStore {
    entries: Vec<(String, PropertyValue)>,
    index: HashMap<String, usize>,
    layout: Layout,
}

impl PropertiesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Set a value, replacing an existing one in place.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Add a value, turning an existing key into a list.
    pub fn add_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => {
                let slot = &mut self.entries[i].1;
                match slot {
                    PropertyValue::List(items) => items.push(value),
                    PropertyValue::Single(existing) => {
                        *slot = PropertyValue::List(vec![std::mem::take(existing), value]);
                    }
                }
            }
            None => self.set_property(key, PropertyValue::Single(value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        self.layout.forget(key);
        Some(value)
    }

    /// Append every entry of `other`; existing keys are overwritten in place.
    pub fn append(&mut self, other: PropertiesStore) {
        let PropertiesStore {
            entries, layout, ..
        } = other;
        for (key, value) in entries {
            self.set_property(key, value);
        }
        self.layout.absorb(layout);
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_string)
    }

    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(PropertyValue::to_vec)
    }

    /// Read `key` as `scalar`, failing when absent or unparsable.
    pub fn get_scalar(&self, key: &str, scalar: ScalarType) -> Result<Value> {
        let text = self
            .get_string(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))?;
        let parsed = match scalar {
            ScalarType::Bool => parse_lenient_bool(text).map(Value::Bool),
            other => other.parse(text),
        };
        parsed.ok_or_else(|| Error::invalid_value(key, text, scalar))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get_scalar(key, ScalarType::Bool)? {
            Value::Bool(v) => Ok(v),
            _ => unreachable!("bool accessor"),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i32> {
        match self.get_scalar(key, ScalarType::Int)? {
            Value::Int(v) => Ok(v),
            _ => unreachable!("int accessor"),
        }
    }

    pub fn get_long(&self, key: &str) -> Result<i64> {
        match self.get_scalar(key, ScalarType::Long)? {
            Value::Long(v) => Ok(v),
            _ => unreachable!("long accessor"),
        }
    }

    pub fn get_double(&self, key: &str) -> Result<f64> {
        match self.get_scalar(key, ScalarType::Double)? {
            Value::Double(v) => Ok(v),
            _ => unreachable!("double accessor"),
        }
    }

    /// Render in the properties text format.
    pub fn to_text(&self) -> String {
        text::write(self)
    }

    /// Parse the properties text format.
    pub fn from_text(input: &str) -> std::result::Result<Self, StoreError> {
        text::read(input)
    }

    pub fn write_to(&self, path: &Path) -> std::result::Result<(), StoreError> {
        std::fs::write(path, self.to_text()).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn read_from(path: &Path) -> std::result::Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_text(&content)
    }
}

/// Stored booleans also accept `yes`/`no` and `on`/`off`.
fn parse_lenient_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_order_and_replaces_in_place() {
        let mut store = PropertiesStore::new();
        store.set_property("a", "1");
        store.set_property("b", "2");
        store.set_property("a", "3");
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.get_string("a"), Some("3"));
    }

    #[test]
    fn test_add_property_builds_list() {
        let mut store = PropertiesStore::new();
        store.add_property("list", "x");
        assert_eq!(store.get("list"), Some(&PropertyValue::Single("x".into())));
        store.add_property("list", "y");
        store.add_property("list", "z");
        assert_eq!(
            store.get_string_array("list").unwrap(),
            vec!["x".to_string(), "y".to_string(), "z".to_string()]
        );
        assert_eq!(store.get_string("list"), Some("x"));
    }

    #[test]
    fn test_remove_reindexes() {
        let mut store = PropertiesStore::new();
        store.set_property("a", "1");
        store.set_property("b", "2");
        store.set_property("c", "3");
        store.layout_mut().set_comment("a", "gone");
        assert_eq!(store.remove("a"), Some(PropertyValue::Single("1".into())));
        assert_eq!(store.get_string("c"), Some("3"));
        assert_eq!(store.layout().comment("a"), None);
        store.set_property("c", "4");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_typed_accessors() {
        let mut store = PropertiesStore::new();
        store.set_property("flag", "on");
        store.set_property("count", " 42 ");
        store.set_property("ratio", "0.5");
        store.set_property("bad", "forty");
        assert!(store.get_bool("flag").unwrap());
        assert_eq!(store.get_int("count").unwrap(), 42);
        assert_eq!(store.get_long("count").unwrap(), 42);
        assert_eq!(store.get_double("ratio").unwrap(), 0.5);
        assert!(matches!(
            store.get_int("bad"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(store.get_int("none"), Err(Error::MissingKey(k)) if k == "none"));
    }

    #[test]
    fn test_append_merges_layout() {
        let mut store = PropertiesStore::new();
        store.set_property("a", "1");
        let mut other = PropertiesStore::new();
        other.set_property("b", "2");
        other.layout_mut().set_blank_lines_before("b", 1);
        store.append(other);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.layout().blank_lines_before("b"), 1);
    }
}
