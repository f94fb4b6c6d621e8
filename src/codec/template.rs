//! Instances built from default literals.

use super::parse_element;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::schema::{FieldSpec, Schema, ValueKind};
use crate::value::{ConfigInstance, Value};

/// Build the default instance of `schema`. Included schemas get their own
/// default instances.
pub fn build_template(schema: &Schema, logger: &Logger) -> Result<ConfigInstance> {
    logger.debug(&format!("building template for {}", schema.name()));
    let mut instance = ConfigInstance::new();
    for field in schema.fields() {
        instance.set(field.identifier.clone(), parse_literal(field, &field.default_literal)?);
    }
    for include in schema.includes() {
        instance.set_included(
            include.identifier.clone(),
            build_template(&include.schema, logger)?,
        );
    }
    Ok(instance)
}

/// Parse `literal` the way a default value of `field` is parsed.
///
/// Lists split on runs of whitespace, newlines included, and drop empty tokens.
pub fn parse_literal(field: &FieldSpec, literal: &str) -> Result<Value> {
    let invalid = || Error::template(&field.identifier, literal, &field.kind);
    match &field.kind {
        ValueKind::Scalar(scalar) => scalar.parse(literal).ok_or_else(invalid),
        ValueKind::Parsed(parser) => Ok(Value::Parsed(parser.parse(literal)?)),
        ValueKind::List(element) => literal
            .split_whitespace()
            .map(|token| {
                parse_element(element, token, || {
                    Error::template(&field.identifier, token, element)
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
    }
}
