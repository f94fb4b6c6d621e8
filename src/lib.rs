//! Declarative configuration schemas over properties files.
//!
//! A schema is declared as a chain of [`Level`]s, resolved once into an
//! immutable [`Schema`], and then drives three codecs through a
//! [`ConfigFactory`]:
//!
//! - `get_template` builds the default instance from default literals
//! - `from_store` decodes an instance from a [`PropertiesStore`]
//! - `to_store` encodes an instance into a new store, with comments and layout
//!
//! ```
//! use schemacfg::{ConfigFactory, FieldDecl, Level};
//!
//! let factory = ConfigFactory::from_levels(
//!     "Server",
//!     &[Level::new("Server")
//!         .prefix("server")
//!         .field(FieldDecl::new("port", "int").default_value("8080").comment("Listen port"))],
//! )
//! .unwrap();
//! let store = factory.to_store(&factory.get_template().unwrap()).unwrap();
//! assert_eq!(store.get_string("server.port"), Some("8080"));
//! assert_eq!(factory.from_store(&store).unwrap(), factory.get_template().unwrap());
//! ```

pub mod cli;
pub mod codec;
pub mod declare;
pub mod error;
pub mod factory;
pub mod logging;
pub mod parser;
pub mod parsers;
pub mod record;
pub mod schema;
pub mod settings;
pub mod store;
pub mod value;

pub use error::{Error, Result, SchemaError, SchemaErrors, StoreError};
pub use factory::ConfigFactory;
pub use parser::{Opaque, ParserError, ParserPlugin, ParserRef, TextParser, TypedParser};
pub use record::{ConfigRecord, RecordFactory};
pub use schema::{FieldDecl, FieldSpec, IncludeDecl, Level, Schema, ValueKind};
pub use store::{Layout, PropertiesStore, PropertyValue};
pub use value::{ConfigInstance, FromValue, Value};
