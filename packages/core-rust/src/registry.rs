//! Content type → serializer factory mapping.
//!
//! The registry is assembled once at startup and only read afterwards, so it
//! can be shared behind an `Arc` by every request without locking. It stores
//! factories rather than serializer instances: each resolution builds a fresh
//! [`Serializer`] that belongs to exactly one response.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::{JsonSerializer, MsgPackSerializer, Serializer};
use crate::media::{APPLICATION_JSON, APPLICATION_MSGPACK};

/// Builds a new serializer for a single response.
pub type SerializerFactory = Arc<dyn Fn() -> Box<dyn Serializer> + Send + Sync>;

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("serializer registry has no default entry (empty content type key)")]
    MissingDefault,
}

/// Maps normalized media types to serializer factories, with a default.
#[derive(Clone)]
pub struct SerializerRegistry {
    default: SerializerFactory,
    by_media_type: HashMap<String, SerializerFactory>,
}

impl SerializerRegistry {
    /// Key that addresses the default entry.
    pub const DEFAULT_KEY: &'static str = "";

    /// Creates a registry whose only entry is the default.
    #[must_use]
    pub fn new<F>(default: F) -> Self
    where
        F: Fn() -> Box<dyn Serializer> + Send + Sync + 'static,
    {
        Self {
            default: Arc::new(default),
            by_media_type: HashMap::new(),
        }
    }

    /// Adds or replaces the entry for `media_type`.
    ///
    /// Registering under [`Self::DEFAULT_KEY`] replaces the default.
    #[must_use]
    pub fn register<F>(mut self, media_type: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Serializer> + Send + Sync + 'static,
    {
        self.insert(media_type.into(), Arc::new(factory));
        self
    }

    fn insert(&mut self, media_type: String, factory: SerializerFactory) {
        if media_type == Self::DEFAULT_KEY {
            self.default = factory;
        } else {
            self.by_media_type.insert(media_type, factory);
        }
    }

    /// Returns the factory registered for exactly `media_type`, if any.
    #[must_use]
    pub fn get(&self, media_type: &str) -> Option<&SerializerFactory> {
        if media_type == Self::DEFAULT_KEY {
            Some(&self.default)
        } else {
            self.by_media_type.get(media_type)
        }
    }

    /// The factory used when nothing else matches.
    #[must_use]
    pub fn default_factory(&self) -> &SerializerFactory {
        &self.default
    }

    /// Whether a non-default entry exists for `media_type`.
    #[must_use]
    pub fn contains(&self, media_type: &str) -> bool {
        self.by_media_type.contains_key(media_type)
    }

    /// Registered media types, excluding the default key, in sorted order.
    #[must_use]
    pub fn media_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_media_type.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Builds the JSON/`MsgPack` registry without the `MsgPack` entry.
    #[must_use]
    pub fn json_only() -> Self {
        Self::new(json_factory).register(APPLICATION_JSON, json_factory)
    }
}

/// JSON as default and under `application/json`, `MsgPack` under
/// `application/msgpack`.
impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::json_only().register(APPLICATION_MSGPACK, msgpack_factory)
    }
}

impl TryFrom<HashMap<String, SerializerFactory>> for SerializerRegistry {
    type Error = RegistryError;

    fn try_from(mut entries: HashMap<String, SerializerFactory>) -> Result<Self, Self::Error> {
        let default = entries
            .remove(Self::DEFAULT_KEY)
            .ok_or(RegistryError::MissingDefault)?;
        Ok(Self {
            default,
            by_media_type: entries,
        })
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("media_types", &self.media_types())
            .finish_non_exhaustive()
    }
}

fn json_factory() -> Box<dyn Serializer> {
    Box::new(JsonSerializer::new())
}

fn msgpack_factory() -> Box<dyn Serializer> {
    Box::new(MsgPackSerializer::new())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::codec::Payload;
    use crate::error::SerializationFailure;

    /// Serializer that only reports a fixed content type.
    struct Tagged(&'static str);

    impl Serializer for Tagged {
        fn content_type(&self) -> &str {
            self.0
        }

        fn serialize(
            &mut self,
            _writer: &mut dyn Write,
            _value: &dyn Payload,
        ) -> Result<(), SerializationFailure> {
            Ok(())
        }
    }

    fn content_type_of(factory: &SerializerFactory) -> String {
        factory().content_type().to_string()
    }

    #[test]
    fn default_registry_entries() {
        let registry = SerializerRegistry::default();

        assert_eq!(registry.media_types(), vec!["application/json", "application/msgpack"]);
        assert_eq!(
            content_type_of(registry.default_factory()),
            "application/json; charset=utf-8"
        );
        assert_eq!(
            content_type_of(registry.get("application/msgpack").unwrap()),
            "application/msgpack"
        );
    }

    #[test]
    fn json_only_has_no_msgpack() {
        let registry = SerializerRegistry::json_only();
        assert!(registry.contains("application/json"));
        assert!(!registry.contains("application/msgpack"));
    }

    #[test]
    fn get_empty_key_returns_default() {
        let registry = SerializerRegistry::new(|| Box::new(Tagged("text/default")));
        assert_eq!(content_type_of(registry.get("").unwrap()), "text/default");
    }

    #[test]
    fn register_empty_key_replaces_default() {
        let registry = SerializerRegistry::new(|| Box::new(Tagged("first")))
            .register("", || Box::new(Tagged("second")));

        assert_eq!(content_type_of(registry.default_factory()), "second");
        assert!(registry.media_types().is_empty());
    }

    #[test]
    fn try_from_map_requires_default() {
        let mut entries: HashMap<String, SerializerFactory> = HashMap::new();
        entries.insert(
            "application/xml".into(),
            Arc::new(|| Box::new(Tagged("application/xml")) as Box<dyn Serializer>),
        );

        let err = SerializerRegistry::try_from(entries).unwrap_err();
        assert_eq!(err, RegistryError::MissingDefault);
    }

    #[test]
    fn try_from_map_splits_default() {
        let mut entries: HashMap<String, SerializerFactory> = HashMap::new();
        entries.insert(
            String::new(),
            Arc::new(|| Box::new(Tagged("default")) as Box<dyn Serializer>),
        );
        entries.insert(
            "application/xml".into(),
            Arc::new(|| Box::new(Tagged("application/xml")) as Box<dyn Serializer>),
        );

        let registry = SerializerRegistry::try_from(entries).unwrap();
        assert_eq!(registry.media_types(), vec!["application/xml"]);
        assert_eq!(content_type_of(registry.default_factory()), "default");
    }

    #[test]
    fn every_resolution_builds_a_new_instance() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let registry = SerializerRegistry::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Tagged("counted"))
        });

        let factory = registry.default_factory();
        let _a = factory();
        let _b = factory();

        assert_eq!(built.load(Ordering::SeqCst), 2);
    }
}
