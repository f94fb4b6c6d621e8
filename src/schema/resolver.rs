//! Merging inheritance levels into one resolved schema.
//!
//! Levels are applied from the most ancestral to the most derived. A field
//! redeclared at a descendant level replaces the earlier declaration in place:
//! the comment, default and parser come from the descendant only, and the key
//! is carried over when the descendant does not name one.

use std::collections::HashMap;

use super::field::{FieldDecl, FieldSpec, IncludeDecl, IncludeSpec, Level, Schema};
use super::kind::classify;
use super::prefix::normalize_prefix;
use crate::error::SchemaErrors;
use crate::logging::Logger;

/// A winning declaration and the level it came from.
struct Entry<'a> {
    level: &'a str,
    key: String,
    decl: &'a FieldDecl,
}

/// Ordered identifier table where a later insert replaces in place.
struct OrderedTable<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> OrderedTable<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get(&self, identifier: &str) -> Option<&T> {
        self.index.get(identifier).map(|&i| &self.entries[i].1)
    }

    /// Returns true when an existing entry was replaced.
    fn upsert(&mut self, identifier: &str, value: T) -> bool {
        match self.index.get(identifier) {
            Some(&i) => {
                self.entries[i].1 = value;
                true
            }
            None => {
                self.index.insert(identifier.to_string(), self.entries.len());
                self.entries.push((identifier.to_string(), value));
                false
            }
        }
    }

    fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_iter().map(|(_, v)| v)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolve `levels` (root first) into a schema named `name`.
pub fn resolve(name: &str, levels: &[Level]) -> Result<Schema, SchemaErrors> {
    resolve_with_logger(name, levels, &Logger::new())
}

/// Resolve, reporting dropped and overridden declarations to `logger`.
pub fn resolve_with_logger(
    name: &str,
    levels: &[Level],
    logger: &Logger,
) -> Result<Schema, SchemaErrors> {
    let mut fields: OrderedTable<Entry<'_>> = OrderedTable::new();
    let mut includes: OrderedTable<&IncludeDecl> = OrderedTable::new();

    for level in levels {
        for decl in &level.fields {
            if !decl.is_config_field() {
                logger.debug(&format!(
                    "{}.{} has no default value, not a configuration field",
                    level.name, decl.identifier
                ));
                continue;
            }
            let key = match (non_empty(&decl.key), fields.get(&decl.identifier)) {
                (Some(key), _) => key.to_string(),
                (None, Some(previous)) => previous.key.clone(),
                (None, None) => decl.identifier.clone(),
            };
            let entry = Entry {
                level: &level.name,
                key,
                decl,
            };
            if fields.upsert(&decl.identifier, entry) {
                logger.debug(&format!(
                    "{}.{} overrides an inherited declaration",
                    level.name, decl.identifier
                ));
            }
        }
        for include in &level.includes {
            includes.upsert(&include.identifier, include);
        }
    }

    let mut errors = Vec::new();
    let mut specs = Vec::new();
    for entry in fields.into_values() {
        let decl = entry.decl;
        match classify(
            entry.level,
            &decl.identifier,
            &decl.declared_type,
            decl.parser.as_ref(),
        ) {
            Ok(kind) => specs.push(FieldSpec {
                identifier: decl.identifier.clone(),
                key: entry.key,
                comment: decl.comment.clone().unwrap_or_default(),
                default_literal: decl.default_value.clone().unwrap_or_default(),
                kind,
            }),
            Err(err) => {
                logger.error(&err.to_string());
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        return Err(SchemaErrors {
            schema: name.to_string(),
            errors,
        });
    }

    let prefix = levels
        .last()
        .and_then(|level| level.prefix.as_deref())
        .map(normalize_prefix)
        .unwrap_or_default();

    let includes = includes
        .into_values()
        .map(|include| IncludeSpec {
            identifier: include.identifier.clone(),
            comment: include.comment.clone().unwrap_or_default(),
            schema: include.schema.clone(),
        })
        .collect();

    logger.debug(&format!(
        "resolved schema {} with {} field(s), prefix {:?}",
        name,
        specs.len(),
        prefix
    ));

    Ok(Schema {
        name: name.to_string(),
        prefix,
        fields: specs,
        includes,
    })
}
