//! Instances read from a properties store.
//!
//! Stored values and defaults are separate paths: every field's key must be
//! present, whatever its default.

use super::parse_element;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::schema::{Schema, ValueKind};
use crate::store::PropertiesStore;
use crate::value::{ConfigInstance, Value};

/// Decode `schema` from `store`. The first missing key aborts the call.
pub fn decode(schema: &Schema, store: &PropertiesStore, logger: &Logger) -> Result<ConfigInstance> {
    logger.debug(&format!(
        "decoding {} with prefix {:?}",
        schema.name(),
        schema.prefix()
    ));
    let mut instance = ConfigInstance::new();
    for field in schema.fields() {
        let key = schema.effective_key(field);
        if !store.contains_key(&key) {
            logger.debug(&format!("missing key {}", key));
            return Err(Error::MissingKey(key));
        }
        let value = match &field.kind {
            ValueKind::List(element) => store
                .get_string_array(&key)
                .unwrap_or_default()
                .iter()
                .filter(|part| !part.trim().is_empty())
                .map(|part| {
                    parse_element(element, part, || Error::invalid_value(&key, part, element))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::List)?,
            ValueKind::Parsed(parser) => {
                Value::Parsed(parser.parse(store.get_string(&key).unwrap_or_default())?)
            }
            ValueKind::Scalar(scalar) => store.get_scalar(&key, *scalar)?,
        };
        instance.set(field.identifier.clone(), value);
    }
    for include in schema.includes() {
        instance.set_included(
            include.identifier.clone(),
            decode(&include.schema, store, logger)?,
        );
    }
    Ok(instance)
}
