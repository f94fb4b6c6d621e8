//! Schema declarations and resolution.
//!
//! A schema is declared as an ordered chain of [`Level`]s, root first. Each
//! level contributes [`FieldDecl`]s and an optional key prefix. Resolution
//! collapses the chain into one immutable [`Schema`]:
//!
//! - a field redeclared at a descendant level replaces the ancestor's
//!   declaration (comment, default and parser are not inherited; the key is)
//! - declarations without a default value are not configuration fields
//! - only the most derived level's prefix is used
//! - every declared type is classified into a [`ValueKind`]; all
//!   classification errors are collected and reported together

mod field;
mod kind;
mod prefix;
mod resolver;

pub use field::{FieldDecl, FieldSpec, IncludeDecl, IncludeSpec, Level, Schema};
pub use kind::{ElementKind, ScalarType, TypeExpr, ValueKind, classify};
pub use prefix::{effective_key, normalize_prefix};
pub use resolver::{resolve, resolve_with_logger};
