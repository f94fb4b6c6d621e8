//! Parser plugins for opaque field types.
//!
//! A field whose type is not a scalar is marshalled through a [`ParserPlugin`]:
//! a pure pair of functions turning text into a value and back. Values produced
//! by plugins travel through the codecs as [`Opaque`] handles.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error raised inside a parser plugin. Codecs propagate it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parser `{parser}`: {message}")]
pub struct ParserError {
    pub parser: String,
    pub message: String,
}

impl ParserError {
    pub fn new(parser: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parser: parser.into(),
            message: message.into(),
        }
    }
}

/// Object-safe view of a value produced by a parser plugin.
pub trait OpaqueValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_dyn(&self, other: &dyn OpaqueValue) -> bool;
}

impl<T> OpaqueValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn OpaqueValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Shared handle to a plugin-produced value.
#[derive(Clone)]
pub struct Opaque(Arc<dyn OpaqueValue>);

impl Opaque {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Send + Sync,
    {
        Self(Arc::new(value))
    }

    /// Borrow the inner value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let inner: &dyn OpaqueValue = &*self.0;
        inner.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        let lhs: &dyn OpaqueValue = &*self.0;
        let rhs: &dyn OpaqueValue = &*other.0;
        lhs.eq_dyn(rhs)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner: &dyn OpaqueValue = &*self.0;
        fmt::Debug::fmt(inner, f)
    }
}

/// Bidirectional string converter for an opaque type.
///
/// Implementations must be pure, and `parse(format(v))` must equal `v` for any
/// `v` the plugin produced.
pub trait ParserPlugin: Send + Sync {
    /// Name used in diagnostics and declaration documents.
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> Result<Opaque, ParserError>;

    fn format(&self, value: &Opaque) -> Result<String, ParserError>;
}

/// Shared reference to a plugin, carried by the field kinds that need it.
#[derive(Clone)]
pub struct ParserRef(Arc<dyn ParserPlugin>);

impl ParserRef {
    pub fn new(plugin: impl ParserPlugin + 'static) -> Self {
        Self(Arc::new(plugin))
    }

    pub fn from_arc(plugin: Arc<dyn ParserPlugin>) -> Self {
        Self(plugin)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn parse(&self, text: &str) -> Result<Opaque, ParserError> {
        self.0.parse(text)
    }

    pub fn format(&self, value: &Opaque) -> Result<String, ParserError> {
        self.0.format(value)
    }
}

impl fmt::Debug for ParserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParserRef({})", self.name())
    }
}

/// Two handles are equal only when they share one plugin instance.
impl PartialEq for ParserRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Statically typed parser; wrap it in [`TypedParser`] to use it as a plugin.
pub trait TextParser: Send + Sync + 'static {
    type Value: Any + fmt::Debug + PartialEq + Send + Sync;

    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> Result<Self::Value, ParserError>;

    fn format(&self, value: &Self::Value) -> String;
}

/// Adapts a [`TextParser`] into an object-safe [`ParserPlugin`].
pub struct TypedParser<P>(pub P);

impl<P: TextParser> ParserPlugin for TypedParser<P> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn parse(&self, text: &str) -> Result<Opaque, ParserError> {
        self.0.parse(text).map(Opaque::new)
    }

    fn format(&self, value: &Opaque) -> Result<String, ParserError> {
        match value.downcast_ref::<P::Value>() {
            Some(value) => Ok(self.0.format(value)),
            None => Err(ParserError::new(
                self.0.name(),
                format!(
                    "expected a {} value, got {:?}",
                    std::any::type_name::<P::Value>(),
                    value
                ),
            )),
        }
    }
}

impl<P: TextParser> From<P> for ParserRef {
    fn from(parser: P) -> Self {
        ParserRef::new(TypedParser(parser))
    }
}
