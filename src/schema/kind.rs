//! Type classification.
//!
//! Maps a field's declared type (and optional parser) onto the closed set of
//! marshalling strategies that every codec matches on.

use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::SchemaError;
use crate::parser::ParserRef;
use crate::value::Value;

/// Natively supported scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ScalarType {
    /// Recognize primitive, boxed and Rust spellings of a scalar type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "bool" | "boolean" | "Boolean" => ScalarType::Bool,
            "byte" | "Byte" | "i8" => ScalarType::Byte,
            "short" | "Short" | "i16" => ScalarType::Short,
            "int" | "Integer" | "i32" => ScalarType::Int,
            "long" | "Long" | "i64" => ScalarType::Long,
            "float" | "Float" | "f32" => ScalarType::Float,
            "double" | "Double" | "f64" => ScalarType::Double,
            "String" | "string" | "str" => ScalarType::String,
            _ => return None,
        };
        Some(scalar)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Byte => "byte",
            ScalarType::Short => "short",
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
        }
    }

    /// Native parse of a textual value. Strings are taken verbatim; every
    /// other type ignores surrounding whitespace.
    pub fn parse(&self, text: &str) -> Option<Value> {
        if *self == ScalarType::String {
            return Some(Value::String(text.to_string()));
        }
        let text = text.trim();
        let value = match self {
            ScalarType::Bool => Value::Bool(parse_bool(text)?),
            ScalarType::Byte => Value::Byte(i8::try_from(parse_integer(text)?).ok()?),
            ScalarType::Short => Value::Short(i16::try_from(parse_integer(text)?).ok()?),
            ScalarType::Int => Value::Int(i32::try_from(parse_integer(text)?).ok()?),
            ScalarType::Long => Value::Long(parse_integer(text)?),
            ScalarType::Float => Value::Float(text.parse().ok()?),
            ScalarType::Double => Value::Double(text.parse().ok()?),
            ScalarType::String => unreachable!("handled above"),
        };
        Some(value)
    }

    /// Native text form of a value of this type, or `None` on a type mismatch.
    pub fn format(&self, value: &Value) -> Option<String> {
        let text = match (self, value) {
            (ScalarType::Bool, Value::Bool(v)) => v.to_string(),
            (ScalarType::Byte, Value::Byte(v)) => v.to_string(),
            (ScalarType::Short, Value::Short(v)) => v.to_string(),
            (ScalarType::Int, Value::Int(v)) => v.to_string(),
            (ScalarType::Long, Value::Long(v)) => v.to_string(),
            // Debug keeps a decimal point on whole numbers and round-trips exactly
            (ScalarType::Float, Value::Float(v)) => format!("{:?}", v),
            (ScalarType::Double, Value::Double(v)) => format!("{:?}", v),
            (ScalarType::String, Value::String(v)) => v.clone(),
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Decimal or `0x`-prefixed hexadecimal integer with an optional sign.
fn parse_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, body) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if body.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(body, radix).ok()?;
    let signed = if negative {
        magnitude.checked_neg()?
    } else {
        magnitude
    };
    i64::try_from(signed).ok()
}

/// Element kind of a list field.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Scalar(ScalarType),
    Parsed(ParserRef),
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Scalar(scalar) => write!(f, "{}", scalar),
            ElementKind::Parsed(parser) => write!(f, "parsed({})", parser.name()),
        }
    }
}

/// How a field's value is marshalled to and from text.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Scalar(ScalarType),
    List(ElementKind),
    Parsed(ParserRef),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(scalar) => write!(f, "{}", scalar),
            ValueKind::List(element) => write!(f, "list<{}>", element),
            ValueKind::Parsed(parser) => write!(f, "parsed({})", parser.name()),
        }
    }
}

/// A parsed type expression such as `int`, `List<Double>` or `Vec<f64>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(String),
    Generic { name: String, args: Vec<TypeExpr> },
}

fn type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.:]*)\s*(?:<(.*)>)?\s*$").expect("valid type regex")
    })
}

impl TypeExpr {
    pub fn parse(text: &str) -> Option<TypeExpr> {
        let caps = type_pattern().captures(text)?;
        let path = caps.get(1)?.as_str();
        let name = simple_name(path).to_string();
        match caps.get(2) {
            None => Some(TypeExpr::Named(name)),
            Some(inner) => {
                let args = split_type_args(inner.as_str())?
                    .into_iter()
                    .map(TypeExpr::parse)
                    .collect::<Option<Vec<_>>>()?;
                Some(TypeExpr::Generic { name, args })
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeExpr::Named(name) | TypeExpr::Generic { name, .. } => name,
        }
    }
}

/// Last segment of a `java.util.List` or `std::vec::Vec` style path.
fn simple_name(path: &str) -> &str {
    path.rsplit(['.', ':']).next().unwrap_or(path)
}

/// Split generic arguments on top-level commas.
fn split_type_args(inner: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(&inner[start..]);
    if args.iter().any(|a| a.trim().is_empty()) {
        return None;
    }
    Some(args)
}

fn is_list_container(name: &str) -> bool {
    matches!(name, "List" | "ArrayList" | "Vec")
}

/// Classify a declared type.
///
/// A parser reference wins over scalar classification. On a list container
/// the parser applies to the elements instead.
pub fn classify(
    level: &str,
    field: &str,
    declared: &str,
    parser: Option<&ParserRef>,
) -> Result<ValueKind, SchemaError> {
    let unsupported = || SchemaError::UnsupportedType {
        level: level.to_string(),
        field: field.to_string(),
        declared: declared.to_string(),
    };
    let missing_element = || SchemaError::MissingElementType {
        level: level.to_string(),
        field: field.to_string(),
        declared: declared.to_string(),
    };

    let expr = TypeExpr::parse(declared).ok_or_else(unsupported)?;

    if is_list_container(expr.name()) {
        let element = match &expr {
            TypeExpr::Named(_) => return Err(missing_element()),
            TypeExpr::Generic { args, .. } if args.len() == 1 => &args[0],
            TypeExpr::Generic { .. } => return Err(unsupported()),
        };
        if let Some(parser) = parser {
            return Ok(ValueKind::List(ElementKind::Parsed(parser.clone())));
        }
        return match element {
            TypeExpr::Named(name) => ScalarType::from_type_name(name)
                .map(|scalar| ValueKind::List(ElementKind::Scalar(scalar)))
                .ok_or_else(unsupported),
            TypeExpr::Generic { .. } => Err(unsupported()),
        };
    }

    if let Some(parser) = parser {
        return Ok(ValueKind::Parsed(parser.clone()));
    }

    match expr {
        TypeExpr::Named(name) => ScalarType::from_type_name(&name)
            .map(ValueKind::Scalar)
            .ok_or_else(unsupported),
        TypeExpr::Generic { .. } => Err(unsupported()),
    }
}
