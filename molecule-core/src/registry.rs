//! Codecs looked up by schema name

use std::collections::BTreeMap;

use crate::codec::{AnyCodec, Codec};

#[cfg(feature = "logging")]
use tracing::warn;

/// Name → codec map
///
/// Names iterate in lexical order. Registering a second codec under a taken
/// name keeps the first one.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    codecs: BTreeMap<String, AnyCodec>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a codec under its own name
    ///
    /// Returns `false` if the name was already taken.
    pub fn register(&mut self, codec: impl Into<AnyCodec>) -> bool {
        let codec = codec.into();
        if let Some(existing) = self.codecs.get(codec.name()) {
            if existing.schema() != codec.schema() {
                #[cfg(feature = "logging")]
                warn!(
                    "Codec {} is already registered with a different schema",
                    codec.name()
                );
            }
            return false;
        }
        self.codecs.insert(codec.name().to_string(), codec);
        true
    }

    /// Codec registered under `name`
    pub fn get(&self, name: &str) -> Option<&AnyCodec> {
        self.codecs.get(name)
    }

    /// Registered names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Registered codecs, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &AnyCodec> {
        self.codecs.values()
    }

    /// Number of registered codecs
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
