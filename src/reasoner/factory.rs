//! Reasoner plugin table: string keys mapped to constructors.
//!
//! The table starts with the built-in engines and can be extended with
//! [`ReasonerFactory::register`] before references are created.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Reasoner, ReasonerError, ReasonerResult, saturation, structural};
use super::{SaturationReasoner, StructuralReasoner};

/// Builds a reasoner; the flag selects buffering (lazy) re-classification.
pub type ReasonerConstructor = Arc<dyn Fn(bool) -> Box<dyn Reasoner> + Send + Sync>;

/// Key used when a configuration does not name a reasoner.
pub const DEFAULT_REASONER: &str = saturation::NAME;

#[derive(Clone)]
pub struct ReasonerFactory {
    constructors: BTreeMap<String, ReasonerConstructor>,
}

impl ReasonerFactory {
    /// A table holding the built-in engines.
    pub fn new() -> Self {
        let mut factory = Self {
            constructors: BTreeMap::new(),
        };
        factory.register(saturation::NAME, |buffering| {
            Box::new(SaturationReasoner::new(buffering))
        });
        factory.register("default", |buffering| {
            Box::new(SaturationReasoner::new(buffering))
        });
        factory.register(structural::NAME, |buffering| {
            Box::new(StructuralReasoner::new(buffering))
        });
        factory
    }

    /// Register a constructor. An existing key is replaced.
    pub fn register<F>(&mut self, key: impl Into<String>, constructor: F)
    where
        F: Fn(bool) -> Box<dyn Reasoner> + Send + Sync + 'static,
    {
        self.constructors
            .insert(key.into().to_ascii_lowercase(), Arc::new(constructor));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(&key.to_ascii_lowercase())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(|k| k.as_str())
    }

    /// Instantiate the reasoner registered under `key` (case-insensitive).
    pub fn create(&self, key: &str, buffering: bool) -> ReasonerResult<Box<dyn Reasoner>> {
        let constructor = self
            .constructors
            .get(&key.to_ascii_lowercase())
            .ok_or_else(|| ReasonerError::UnknownReasoner {
                key: key.into(),
                available: self.keys().collect::<Vec<_>>().join(", "),
            })?;
        Ok(constructor(buffering))
    }
}

impl Default for ReasonerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReasonerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonerFactory")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
