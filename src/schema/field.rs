//! Field declarations, resolved field specs and the resolved schema.

use std::collections::HashMap;
use std::sync::Arc;

use super::kind::ValueKind;
use super::prefix::{effective_key, normalize_prefix};
use crate::parser::ParserRef;

/// A field as written at one inheritance level, before resolution.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub identifier: String,
    pub declared_type: String,
    pub key: Option<String>,
    pub comment: Option<String>,
    pub default_value: Option<String>,
    pub parser: Option<ParserRef>,
}

impl FieldDecl {
    pub fn new(identifier: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            declared_type: declared_type.into(),
            key: None,
            comment: None,
            default_value: None,
            parser: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    pub fn parser(mut self, parser: impl Into<ParserRef>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Only declarations with a non-empty default literal are configuration fields.
    pub fn is_config_field(&self) -> bool {
        self.default_value.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Another schema pulled in under an identifier.
#[derive(Debug, Clone)]
pub struct IncludeDecl {
    pub identifier: String,
    pub comment: Option<String>,
    pub schema: Arc<Schema>,
}

impl IncludeDecl {
    pub fn new(identifier: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            identifier: identifier.into(),
            comment: None,
            schema,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One level of an inheritance chain.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub name: String,
    pub prefix: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub includes: Vec<IncludeDecl>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn include(mut self, include: IncludeDecl) -> Self {
        self.includes.push(include);
        self
    }
}

/// A resolved configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub identifier: String,
    pub key: String,
    pub comment: String,
    pub default_literal: String,
    pub kind: ValueKind,
}

impl FieldSpec {
    pub fn parser(&self) -> Option<&ParserRef> {
        match &self.kind {
            ValueKind::Parsed(parser) => Some(parser),
            ValueKind::List(super::kind::ElementKind::Parsed(parser)) => Some(parser),
            _ => None,
        }
    }
}

/// A resolved include.
#[derive(Debug, Clone)]
pub struct IncludeSpec {
    pub identifier: String,
    pub comment: String,
    pub schema: Arc<Schema>,
}

/// The resolved, immutable schema of one root type.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) prefix: String,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) includes: Vec<IncludeSpec>,
}

impl Schema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective prefix; empty or ending with `.`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn includes(&self) -> &[IncludeSpec] {
        &self.includes
    }

    pub fn field(&self, identifier: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }

    /// Store key for a field under this schema's prefix.
    pub fn effective_key(&self, field: &FieldSpec) -> String {
        effective_key(&self.prefix, &field.key)
    }

    /// Same fields under another prefix.
    pub fn with_prefix(&self, prefix: &str) -> Schema {
        Schema {
            prefix: normalize_prefix(prefix),
            ..self.clone()
        }
    }

    /// Effective keys claimed by more than one field, in first-seen order.
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order = Vec::new();
        for field in &self.fields {
            let key = self.effective_key(field);
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }
        order.into_iter().filter(|k| counts[k] > 1).collect()
    }
}
