//! Typed records over a [`ConfigFactory`].
//!
//! A record type declares its levels once and converts to and from the
//! untyped [`ConfigInstance`]; [`RecordFactory`] then offers the factory
//! operations in terms of the record type.

use std::marker::PhantomData;

use crate::error::{Result, SchemaErrors};
use crate::factory::ConfigFactory;
use crate::schema::Level;
use crate::store::{Layout, PropertiesStore};
use crate::value::{ConfigInstance, Value};

pub trait ConfigRecord: Sized {
    /// Schema name used in diagnostics.
    const NAME: &'static str;

    /// Declaration levels, root first.
    fn levels() -> Vec<Level>;

    fn from_instance(instance: &ConfigInstance) -> Result<Self>;

    fn to_instance(&self) -> ConfigInstance;
}

#[derive(Debug, Clone)]
pub struct RecordFactory<T> {
    inner: ConfigFactory,
    _record: PhantomData<fn() -> T>,
}

impl<T: ConfigRecord> RecordFactory<T> {
    pub fn new() -> std::result::Result<Self, SchemaErrors> {
        Ok(Self::from_factory(ConfigFactory::from_levels(
            T::NAME,
            &T::levels(),
        )?))
    }

    pub fn from_factory(inner: ConfigFactory) -> Self {
        Self {
            inner,
            _record: PhantomData,
        }
    }

    pub fn factory(&self) -> &ConfigFactory {
        &self.inner
    }

    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self::from_factory(self.inner.with_prefix(prefix))
    }

    pub fn get_template(&self) -> Result<T> {
        T::from_instance(&self.inner.get_template()?)
    }

    pub fn from_store(&self, store: &PropertiesStore) -> Result<T> {
        T::from_instance(&self.inner.from_store(store)?)
    }

    pub fn to_store(&self, record: &T) -> Result<PropertiesStore> {
        self.inner.to_store(&record.to_instance())
    }

    pub fn to_store_with_layout(&self, record: &T, layout: Layout) -> Result<PropertiesStore> {
        self.inner.to_store_with_layout(&record.to_instance(), layout)
    }

    pub fn with_field(
        &self,
        record: &T,
        identifier: &str,
        value: impl Into<Value>,
    ) -> Result<PropertiesStore> {
        self.inner.with_field(&record.to_instance(), identifier, value)
    }

    pub fn with_field_in_store(
        &self,
        store: &PropertiesStore,
        identifier: &str,
        value: impl Into<Value>,
    ) -> Result<PropertiesStore> {
        self.inner.with_field_in_store(store, identifier, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDecl;

    #[derive(Debug, PartialEq)]
    struct Server {
        host: String,
        port: i32,
    }

    impl ConfigRecord for Server {
        const NAME: &'static str = "Server";

        fn levels() -> Vec<Level> {
            vec![
                Level::new("Server")
                    .prefix("server")
                    .field(FieldDecl::new("host", "String").default_value("localhost"))
                    .field(FieldDecl::new("port", "int").default_value("80")),
            ]
        }

        fn from_instance(instance: &ConfigInstance) -> Result<Self> {
            Ok(Server {
                host: instance.value("host")?,
                port: instance.value("port")?,
            })
        }

        fn to_instance(&self) -> ConfigInstance {
            ConfigInstance::new()
                .with("host", self.host.clone())
                .with("port", self.port)
        }
    }

    #[test]
    fn test_typed_round_trip() {
        let factory = RecordFactory::<Server>::new().unwrap();
        let template = factory.get_template().unwrap();
        assert_eq!(
            template,
            Server {
                host: "localhost".into(),
                port: 80
            }
        );

        let store = factory.with_field(&template, "port", 8080).unwrap();
        assert_eq!(store.get_string("server.port"), Some("8080"));
        let back = factory.from_store(&store).unwrap();
        assert_eq!(back.port, 8080);
        assert_eq!(back.host, "localhost");
    }
}
