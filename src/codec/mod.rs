//! The three codecs over a resolved schema.
//!
//! Each one walks the schema's fields in order and dispatches on the field's
//! [`ValueKind`](crate::schema::ValueKind):
//!
//! - [`template`] builds an instance from default literals only
//! - [`decode`] reads an instance out of a [`PropertiesStore`](crate::store::PropertiesStore)
//! - [`encode`] writes an instance into a new store, with comments and layout
//!
//! Every operation either returns a complete result or an error.

pub mod decode;
pub mod encode;
pub mod template;

use crate::error::{Error, Result};
use crate::schema::ElementKind;
use crate::value::Value;

/// Parse one list element. `invalid` builds the error for text that is not a
/// valid scalar; plugin errors pass through unchanged.
pub(crate) fn parse_element(
    element: &ElementKind,
    text: &str,
    invalid: impl FnOnce() -> Error,
) -> Result<Value> {
    match element {
        ElementKind::Scalar(scalar) => scalar.parse(text).ok_or_else(invalid),
        ElementKind::Parsed(parser) => Ok(Value::Parsed(parser.parse(text)?)),
    }
}

/// Text form of one list element.
pub(crate) fn format_element(
    element: &ElementKind,
    value: &Value,
    mismatch: impl FnOnce() -> Error,
) -> Result<String> {
    match (element, value) {
        (ElementKind::Scalar(scalar), value) => scalar.format(value).ok_or_else(mismatch),
        (ElementKind::Parsed(parser), Value::Parsed(opaque)) => Ok(parser.format(opaque)?),
        (ElementKind::Parsed(_), _) => Err(mismatch()),
    }
}
