//! YAML declaration documents.
//!
//! A document names one or more schemas. Each schema is an ordered list of
//! levels, root first, and a level may include another schema of the same
//! document:
//!
//! ```yaml
//! root: Service
//! schemas:
//!   - name: Limits
//!     levels:
//!       - name: Limits
//!         prefix: limits
//!         fields:
//!           - { name: timeout, type: Duration, parser: duration, default: 30s }
//!   - name: Service
//!     levels:
//!       - name: Service
//!         prefix: service
//!         fields:
//!           - { name: port, type: int, default: 8080, comment: Listen port }
//!         includes:
//!           - { name: limits, schema: Limits }
//! ```
//!
//! Parser names are looked up in a [`ParserRegistry`] while the document is
//! turned into levels; the resolved schemas carry the plugins themselves.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::error::SchemaErrors;
use crate::factory::ConfigFactory;
use crate::logging::Logger;
use crate::parser::ParserRef;
use crate::parsers::{DurationParser, PathParser};
use crate::schema::{FieldDecl, IncludeDecl, Level, Schema, resolve_with_logger};

#[derive(Debug, Error)]
pub enum DeclarationError {
    #[error("invalid declaration document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema `{schema}`: field `{field}` names unknown parser `{parser}`")]
    UnknownParser {
        schema: String,
        field: String,
        parser: String,
    },

    #[error("unknown schema `{0}`")]
    UnknownSchema(String),

    #[error("schema `{0}` is declared more than once")]
    DuplicateSchema(String),

    #[error("include cycle through schema `{0}`")]
    IncludeCycle(String),

    #[error("document declares no root schema")]
    NoRoot,

    #[error(transparent)]
    Schema(#[from] SchemaErrors),
}

/// Parser plugins by name.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, ParserRef>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `duration` and `path`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DurationParser);
        registry.register(PathParser);
        registry
    }

    /// Register under the plugin's own name, replacing any previous entry.
    pub fn register(&mut self, parser: impl Into<ParserRef>) {
        let parser = parser.into();
        self.parsers.insert(parser.name().to_string(), parser);
    }

    pub fn get(&self, name: &str) -> Option<&ParserRef> {
        self.parsers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationDocument {
    /// Schema used when a caller does not name one.
    #[serde(default)]
    pub root: Option<String>,
    pub schemas: Vec<SchemaDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
    pub name: String,
    pub levels: Vec<LevelDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDoc {
    pub name: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
    #[serde(default)]
    pub includes: Vec<IncludeDoc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Scalars and sequences are accepted and turned into the literal text.
    #[serde(default, deserialize_with = "literal")]
    pub default: Option<String>,
    #[serde(default)]
    pub parser: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeDoc {
    pub name: String,
    pub schema: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// YAML scalar as literal text; a sequence becomes one element per line.
fn literal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde::de::Error;
    fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
        match value {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
    let value = serde_yaml::Value::deserialize(deserializer)?;
    match &value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| D::Error::custom("list defaults must hold scalars"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| Some(parts.join("\n"))),
        other => scalar_text(other)
            .map(Some)
            .ok_or_else(|| D::Error::custom("default must be a scalar or a list of scalars")),
    }
}

/// A parsed document bound to a parser registry, resolving schemas on demand.
#[derive(Debug)]
pub struct Declarations {
    document: DeclarationDocument,
    registry: ParserRegistry,
    logger: Logger,
    resolved: HashMap<String, Arc<Schema>>,
}

impl Declarations {
    pub fn new(document: DeclarationDocument, registry: ParserRegistry) -> Result<Self, DeclarationError> {
        let mut seen = HashSet::new();
        for schema in &document.schemas {
            if !seen.insert(schema.name.as_str()) {
                return Err(DeclarationError::DuplicateSchema(schema.name.clone()));
            }
        }
        Ok(Self {
            document,
            registry,
            logger: Logger::new().with_name("schemacfg::declare"),
            resolved: HashMap::new(),
        })
    }

    pub fn from_yaml(text: &str, registry: ParserRegistry) -> Result<Self, DeclarationError> {
        Self::new(serde_yaml::from_str(text)?, registry)
    }

    pub fn load(path: &Path, registry: ParserRegistry) -> Result<Self, DeclarationError> {
        let text = std::fs::read_to_string(path).map_err(|source| DeclarationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text, registry)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.document.schemas.iter().map(|s| s.name.as_str())
    }

    /// `requested`, else the document's `root`, else its only schema.
    pub fn root_name<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, DeclarationError> {
        if let Some(name) = requested.or(self.document.root.as_deref()) {
            return Ok(name);
        }
        match self.document.schemas.as_slice() {
            [only] => Ok(&only.name),
            _ => Err(DeclarationError::NoRoot),
        }
    }

    /// Resolve the named schema and every schema it includes.
    pub fn schema(&mut self, name: &str) -> Result<Arc<Schema>, DeclarationError> {
        let mut active = Vec::new();
        self.resolve(name, &mut active)
    }

    pub fn factory(&mut self, name: &str) -> Result<ConfigFactory, DeclarationError> {
        let schema = self.schema(name)?;
        Ok(ConfigFactory::new(schema).with_logger(self.logger.clone()))
    }

    fn resolve(&mut self, name: &str, active: &mut Vec<String>) -> Result<Arc<Schema>, DeclarationError> {
        if let Some(schema) = self.resolved.get(name) {
            return Ok(Arc::clone(schema));
        }
        if active.iter().any(|n| n == name) {
            return Err(DeclarationError::IncludeCycle(name.to_string()));
        }
        let doc = self
            .document
            .schemas
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| DeclarationError::UnknownSchema(name.to_string()))?;

        active.push(name.to_string());
        let mut levels = Vec::with_capacity(doc.levels.len());
        for level_doc in &doc.levels {
            levels.push(self.build_level(&doc.name, level_doc, active)?);
        }
        active.pop();

        let schema = Arc::new(resolve_with_logger(&doc.name, &levels, &self.logger)?);
        self.logger.debug(&format!(
            "resolved {} with {} field(s)",
            doc.name,
            schema.fields().len()
        ));
        self.resolved.insert(doc.name.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    fn build_level(
        &mut self,
        schema: &str,
        doc: &LevelDoc,
        active: &mut Vec<String>,
    ) -> Result<Level, DeclarationError> {
        let mut level = Level::new(&doc.name);
        if let Some(prefix) = &doc.prefix {
            level = level.prefix(prefix);
        }
        for field in &doc.fields {
            let mut decl = FieldDecl::new(&field.name, &field.declared_type);
            if let Some(key) = &field.key {
                decl = decl.key(key);
            }
            if let Some(comment) = &field.comment {
                decl = decl.comment(comment);
            }
            if let Some(default) = &field.default {
                decl = decl.default_value(default);
            }
            if let Some(name) = &field.parser {
                let parser = self.registry.get(name).cloned().ok_or_else(|| {
                    DeclarationError::UnknownParser {
                        schema: schema.to_string(),
                        field: field.name.clone(),
                        parser: name.clone(),
                    }
                })?;
                decl = decl.parser(parser);
            }
            level = level.field(decl);
        }
        for include in &doc.includes {
            let nested = self.resolve(&include.schema, active)?;
            let mut decl = IncludeDecl::new(&include.name, nested);
            if let Some(comment) = &include.comment {
                decl = decl.comment(comment);
            }
            level = level.include(decl);
        }
        Ok(level)
    }
}
