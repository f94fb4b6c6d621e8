//! The factory: one resolved schema and the operations over it.

use std::sync::Arc;

use crate::codec::decode::decode;
use crate::codec::encode::{encode, encode_value};
use crate::codec::template::{build_template, parse_literal};
use crate::error::{Error, Result, SchemaErrors};
use crate::logging::Logger;
use crate::schema::{FieldSpec, Level, Schema, resolve_with_logger};
use crate::store::{Layout, PropertiesStore};
use crate::value::{ConfigInstance, Value};

/// Template, decode and encode operations over a shared [`Schema`].
#[derive(Debug, Clone)]
pub struct ConfigFactory {
    schema: Arc<Schema>,
    logger: Logger,
}

impl ConfigFactory {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            logger: Logger::new().with_name("schemacfg"),
        }
    }

    /// Resolve `levels` (root first) and wrap the result.
    pub fn from_levels(name: &str, levels: &[Level]) -> std::result::Result<Self, SchemaErrors> {
        let logger = Logger::new().with_name("schemacfg");
        let schema = resolve_with_logger(name, levels, &logger)?;
        Ok(Self {
            schema: Arc::new(schema),
            logger,
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Same schema read and written under another prefix.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            schema: Arc::new(self.schema.with_prefix(prefix)),
            logger: self.logger.clone(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn prefix(&self) -> &str {
        self.schema.prefix()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Instance built from every field's default value.
    pub fn get_template(&self) -> Result<ConfigInstance> {
        build_template(&self.schema, &self.logger)
    }

    /// Instance read from `store`. Every field's key must be present.
    pub fn from_store(&self, store: &PropertiesStore) -> Result<ConfigInstance> {
        decode(&self.schema, store, &self.logger)
    }

    pub fn to_store(&self, instance: &ConfigInstance) -> Result<PropertiesStore> {
        self.to_store_with_layout(instance, Layout::new())
    }

    /// Encode into a new store bound to `layout`; comments and blank lines
    /// are recorded there. Take it back with [`PropertiesStore::into_layout`].
    pub fn to_store_with_layout(
        &self,
        instance: &ConfigInstance,
        layout: Layout,
    ) -> Result<PropertiesStore> {
        let store = encode(&self.schema, instance, layout)?;
        let duplicates = self.schema.duplicate_keys();
        if !duplicates.is_empty() {
            self.logger.warn(&format!(
                "{} shares keys between fields: {}",
                self.schema.name(),
                duplicates.join(", ")
            ));
        }
        Ok(store)
    }

    /// Encode `instance` with the field `identifier` replaced by `value`.
    pub fn with_field(
        &self,
        instance: &ConfigInstance,
        identifier: &str,
        value: impl Into<Value>,
    ) -> Result<PropertiesStore> {
        let field = self.field(identifier)?;
        let value = value.into();
        encode_value(field, &value)?;
        let mut updated = instance.clone();
        updated.set(identifier, value);
        self.to_store(&updated)
    }

    /// Copy of `store` with the key of field `identifier` re-encoded from
    /// `value`. Every other key, comment and blank line is left untouched.
    pub fn with_field_in_store(
        &self,
        store: &PropertiesStore,
        identifier: &str,
        value: impl Into<Value>,
    ) -> Result<PropertiesStore> {
        let field = self.field(identifier)?;
        let stored = encode_value(field, &value.into())?;
        let key = self.schema.effective_key(field);
        self.logger.debug(&format!("replacing {}", key));
        let mut updated = store.clone();
        updated.set_property(key, stored);
        Ok(updated)
    }

    /// Parse `text` as a value of field `identifier`, the way its default is parsed.
    pub fn parse_field_text(&self, identifier: &str, text: &str) -> Result<Value> {
        parse_literal(self.field(identifier)?, text)
    }

    fn field(&self, identifier: &str) -> Result<&FieldSpec> {
        self.schema
            .field(identifier)
            .ok_or_else(|| Error::UnknownField(identifier.to_string()))
    }
}
