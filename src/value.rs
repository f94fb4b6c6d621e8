//! Runtime values and configuration instances.

use serde_json::{Value as JsonValue, json};
use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::parser::Opaque;

/// One field's value inside a [`ConfigInstance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Produced by a parser plugin.
    Parsed(Opaque),
    List(Vec<Value>),
}

impl Value {
    /// Wrap a plugin-typed value.
    pub fn parsed<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Send + Sync,
    {
        Value::Parsed(Opaque::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Parsed(_) => "parsed",
            Value::List(_) => "list",
        }
    }

    /// JSON view of the value. Parsed values are shown through their `Debug` form.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Bool(v) => json!(v),
            Value::Byte(v) => json!(v),
            Value::Short(v) => json!(v),
            Value::Int(v) => json!(v),
            Value::Long(v) => json!(v),
            Value::Float(v) => json!(v),
            Value::Double(v) => json!(v),
            Value::String(v) => json!(v),
            Value::Parsed(v) => json!(format!("{:?}", v)),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Opaque => Parsed,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Conversion out of a [`Value`] for the typed accessors on [`ConfigInstance`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Opaque => Parsed,
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// A populated configuration object: one value per resolved field, plus one
/// nested instance per included schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigInstance {
    values: Vec<(String, Value)>,
    included: Vec<(String, ConfigInstance)>,
}

impl ConfigInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(identifier, value);
        self
    }

    /// Builder-style insert of a nested instance.
    pub fn with_included(mut self, identifier: impl Into<String>, instance: ConfigInstance) -> Self {
        self.set_included(identifier, instance);
        self
    }

    /// Insert or replace a field value, keeping the original position on replace.
    pub fn set(&mut self, identifier: impl Into<String>, value: impl Into<Value>) {
        let identifier = identifier.into();
        let value = value.into();
        match self.values.iter_mut().find(|(id, _)| *id == identifier) {
            Some(slot) => slot.1 = value,
            None => self.values.push((identifier, value)),
        }
    }

    pub fn set_included(&mut self, identifier: impl Into<String>, instance: ConfigInstance) {
        let identifier = identifier.into();
        match self.included.iter_mut().find(|(id, _)| *id == identifier) {
            Some(slot) => slot.1 = instance,
            None => self.included.push((identifier, instance)),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, v)| v)
    }

    pub fn included(&self, identifier: &str) -> Option<&ConfigInstance> {
        self.included
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, v)| v)
    }

    /// Typed read of a field.
    pub fn value<T: FromValue>(&self, identifier: &str) -> Result<T> {
        let value = self
            .get(identifier)
            .ok_or_else(|| Error::UnknownField(identifier.to_string()))?;
        T::from_value(value).ok_or_else(|| Error::mismatch(identifier, std::any::type_name::<T>()))
    }

    /// Typed read of a plugin-produced field.
    pub fn parsed<T: Any + Clone>(&self, identifier: &str) -> Result<T> {
        let opaque: Opaque = self.value(identifier)?;
        opaque
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::mismatch(identifier, std::any::type_name::<T>()))
    }

    /// Typed read of a list of plugin-produced elements.
    pub fn parsed_list<T: Any + Clone>(&self, identifier: &str) -> Result<Vec<T>> {
        let items: Vec<Opaque> = self.value(identifier)?;
        items
            .iter()
            .map(|item| item.downcast_ref::<T>().cloned())
            .collect::<Option<Vec<T>>>()
            .ok_or_else(|| Error::mismatch(identifier, std::any::type_name::<T>()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(id, v)| (id.as_str(), v))
    }

    /// Number of field values plus included instances.
    pub fn len(&self) -> usize {
        self.values.len() + self.included.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.included.is_empty()
    }

    /// JSON object view, nested instances included, in field order.
    pub fn to_json(&self) -> JsonValue {
        let mut map = serde_json::Map::new();
        for (id, value) in &self.values {
            map.insert(id.clone(), value.to_json());
        }
        for (id, nested) in &self.included {
            map.insert(id.clone(), nested.to_json());
        }
        JsonValue::Object(map)
    }
}
