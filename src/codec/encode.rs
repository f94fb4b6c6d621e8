//! Instances written to a new properties store.

use super::format_element;
use crate::error::{Error, Result};
use crate::schema::{FieldSpec, Schema, ValueKind};
use crate::store::{Layout, PropertiesStore, PropertyValue};
use crate::value::{ConfigInstance, Value};

/// Encode `instance` as a fresh store that takes ownership of `layout`.
///
/// One blank line is requested before the first key, and every field with a
/// non-empty comment gets it attached to its key. Entries of included schemas
/// follow the schema's own fields.
pub fn encode(schema: &Schema, instance: &ConfigInstance, layout: Layout) -> Result<PropertiesStore> {
    let mut store = PropertiesStore::with_layout(layout);
    for (index, field) in schema.fields().iter().enumerate() {
        let key = schema.effective_key(field);
        let value = instance
            .get(&field.identifier)
            .ok_or_else(|| Error::MissingValue(field.identifier.clone()))?;
        let stored = encode_value(field, value)?;
        if index == 0 {
            store.layout_mut().set_blank_lines_before(key.clone(), 1);
        }
        if !field.comment.is_empty() {
            store.layout_mut().set_comment(key.clone(), field.comment.clone());
        }
        store.set_property(key, stored);
    }

    for include in schema.includes() {
        let nested = instance
            .included(&include.identifier)
            .ok_or_else(|| Error::MissingValue(include.identifier.clone()))?;
        let mut nested_store = encode(&include.schema, nested, Layout::new())?;
        if !include.comment.is_empty() {
            let first = nested_store.keys().next().map(str::to_string);
            if let Some(first) = first {
                if nested_store.layout().comment(&first).is_none() {
                    nested_store
                        .layout_mut()
                        .set_comment(first, include.comment.clone());
                }
            }
        }
        store.append(nested_store);
    }
    Ok(store)
}

/// Stored form of one value of `field`.
pub(crate) fn encode_value(field: &FieldSpec, value: &Value) -> Result<PropertyValue> {
    let mismatch = || Error::mismatch(&field.identifier, &field.kind);
    match (&field.kind, value) {
        (ValueKind::Scalar(scalar), value) => scalar
            .format(value)
            .map(PropertyValue::Single)
            .ok_or_else(mismatch),
        (ValueKind::Parsed(parser), Value::Parsed(opaque)) => {
            Ok(PropertyValue::Single(parser.format(opaque)?))
        }
        (ValueKind::List(element), Value::List(items)) => items
            .iter()
            .map(|item| format_element(element, item, mismatch))
            .collect::<Result<Vec<_>>>()
            .map(PropertyValue::List),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDecl, IncludeDecl, Level, resolve};
    use std::sync::Arc;

    fn schema() -> Schema {
        resolve(
            "Demo",
            &[Level::new("Demo")
                .prefix("prefix")
                .field(
                    FieldDecl::new("count", "int")
                        .default_value("1")
                        .comment("how many"),
                )
                .field(FieldDecl::new("ratios", "List<double>").default_value("1 2"))],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_writes_comments_and_layout() {
        let instance = ConfigInstance::new()
            .with("count", 3)
            .with("ratios", vec![0.0, 5.34, 17.0]);
        let store = encode(&schema(), &instance, Layout::new()).unwrap();
        assert_eq!(store.get_string("prefix.count"), Some("3"));
        assert_eq!(
            store.get_string_array("prefix.ratios").unwrap(),
            vec!["0.0", "5.34", "17.0"]
        );
        assert_eq!(store.layout().comment("prefix.count"), Some("how many"));
        assert_eq!(store.layout().comment("prefix.ratios"), None);
        assert_eq!(store.layout().blank_lines_before("prefix.count"), 1);
    }

    #[test]
    fn test_encode_rejects_mismatched_value() {
        let instance = ConfigInstance::new()
            .with("count", "three")
            .with("ratios", vec![1.0]);
        let err = encode(&schema(), &instance, Layout::new()).unwrap_err();
        assert!(matches!(err, Error::ValueMismatch { ref field, .. } if field == "count"));
    }

    #[test]
    fn test_encode_requires_every_field() {
        let instance = ConfigInstance::new().with("count", 3);
        let err = encode(&schema(), &instance, Layout::new()).unwrap_err();
        assert!(matches!(err, Error::MissingValue(ref id) if id == "ratios"));
    }

    #[test]
    fn test_include_comment_lands_on_first_nested_key() {
        let bare = Arc::new(
            resolve(
                "Bare",
                &[Level::new("Bare")
                    .prefix("bare")
                    .field(FieldDecl::new("size", "long").default_value("4"))],
            )
            .unwrap(),
        );
        let outer = resolve(
            "Outer",
            &[Level::new("Outer")
                .prefix("outer")
                .field(FieldDecl::new("flag", "boolean").default_value("true"))
                .include(IncludeDecl::new("bare", bare).comment("bare block"))
                .include(IncludeDecl::new("demo", Arc::new(schema())).comment("demo block"))],
        )
        .unwrap();
        let instance = ConfigInstance::new()
            .with("flag", true)
            .with_included("bare", ConfigInstance::new().with("size", 9i64))
            .with_included(
                "demo",
                ConfigInstance::new().with("count", 2).with("ratios", vec![1.0]),
            );
        let store = encode(&outer, &instance, Layout::new()).unwrap();
        assert_eq!(store.get_string("bare.size"), Some("9"));
        assert_eq!(store.layout().comment("bare.size"), Some("bare block"));
        assert_eq!(store.layout().comment("prefix.count"), Some("how many"));
        assert_eq!(store.layout().comment("outer.flag"), None);
    }
}
