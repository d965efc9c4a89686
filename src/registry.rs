//! Reference registry: a name-keyed table of live references.
//!
//! The registry is an ordinary value owned by the application and passed
//! around by reference; there is no process-wide instance. A reference is
//! built before the map is touched, so loading a document never holds a
//! shard lock. Registration then uses the `DashMap` entry API: checking for a
//! name and inserting it happen under the same shard lock, and two threads
//! can never both register one name. References are handed out as
//! `Arc<Reference>`: disposing removes the entry and tears the state down,
//! while clones already handed out stay valid and answer empty from then on.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::config::ReferenceConfig;
use crate::error::{AmorResult, RegistryError};
use crate::reasoner::ReasonerFactory;
use crate::reference::Reference;

/// Live references by name, plus the reasoner table used to build them.
pub struct ReferenceRegistry {
    references: DashMap<String, Arc<Reference>>,
    factory: ReasonerFactory,
}

impl ReferenceRegistry {
    /// An empty registry using the built-in reasoners.
    pub fn new() -> Self {
        Self::with_factory(ReasonerFactory::new())
    }

    /// An empty registry using a custom reasoner table.
    pub fn with_factory(factory: ReasonerFactory) -> Self {
        Self {
            references: DashMap::new(),
            factory,
        }
    }

    pub fn factory(&self) -> &ReasonerFactory {
        &self.factory
    }

    /// Build and register a reference. Fails if the name is taken.
    ///
    /// A failed load or reasoner attach leaves nothing registered. When two
    /// callers race for one name, the loser's reference is dropped unused.
    pub fn create(&self, name: &str, config: ReferenceConfig) -> AmorResult<Arc<Reference>> {
        if self.references.contains_key(name) {
            return Err(duplicate(name));
        }
        let reference = Arc::new(Reference::open(name, config, &self.factory)?);
        match self.references.entry(name.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(reference = name, "lost registration race");
                Err(duplicate(name))
            }
            Entry::Vacant(slot) => {
                slot.insert(reference.clone());
                Ok(reference)
            }
        }
    }

    /// Return the reference registered under `name`, creating it if absent.
    pub fn get_or_create(&self, name: &str, config: ReferenceConfig) -> AmorResult<Arc<Reference>> {
        if let Some(existing) = self.lookup(name) {
            return Ok(existing);
        }
        let reference = Arc::new(Reference::open(name, config, &self.factory)?);
        Ok(self
            .references
            .entry(name.to_string())
            .or_insert(reference)
            .value()
            .clone())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Reference>> {
        self.references.get(name).map(|r| r.value().clone())
    }

    /// Unregister `name` and tear its reference down.
    ///
    /// Waits for an in-flight call on the reference to complete first.
    pub fn dispose(&self, name: &str) -> AmorResult<()> {
        let (_, reference) =
            self.references
                .remove(name)
                .ok_or_else(|| RegistryError::NotFound {
                    name: name.to_string(),
                })?;
        reference.dispose();
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.references.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.references.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

fn duplicate(name: &str) -> crate::error::AmorError {
    RegistryError::DuplicateReferenceName {
        name: name.to_string(),
    }
    .into()
}

impl Default for ReferenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReferenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceRegistry")
            .field("references", &self.names())
            .field("factory", &self.factory)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::error::AmorError;
    use crate::reasoner::{Reasoner, SaturationReasoner};

    fn cfg() -> ReferenceConfig {
        ReferenceConfig::new("http://ex.org/reg")
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let reg = ReferenceRegistry::new();
        reg.create("X", cfg()).unwrap();
        let err = reg.create("X", cfg()).unwrap_err();
        assert!(matches!(
            err,
            AmorError::Registry(RegistryError::DuplicateReferenceName { .. })
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn dispose_then_recreate() {
        let reg = ReferenceRegistry::new();
        let first = reg.create("X", cfg()).unwrap();
        reg.dispose("X").unwrap();
        assert!(reg.lookup("X").is_none());
        assert!(first.is_disposed());
        assert!(reg.create("X", cfg()).is_ok());
        assert!(matches!(
            reg.dispose("Y"),
            Err(AmorError::Registry(RegistryError::NotFound { .. }))
        ));
    }

    #[test]
    fn failed_attach_registers_nothing() {
        let reg = ReferenceRegistry::new();
        assert!(reg.create("X", cfg().with_reasoner("fact++")).is_err());
        assert!(!reg.contains("X"));
        assert!(reg.is_empty());
    }

    #[test]
    fn slow_creation_does_not_block_the_registry() {
        let mut factory = ReasonerFactory::new();
        factory.register("slow", |buffering| {
            std::thread::sleep(Duration::from_millis(600));
            Box::new(SaturationReasoner::new(buffering)) as Box<dyn Reasoner>
        });
        let reg = Arc::new(ReferenceRegistry::with_factory(factory));
        for name in ["a", "b", "c", "d"] {
            reg.create(name, cfg()).unwrap();
        }

        let loader = {
            let reg = reg.clone();
            std::thread::spawn(move || reg.create("slow", cfg().with_reasoner("slow")))
        };
        std::thread::sleep(Duration::from_millis(100));

        let start = Instant::now();
        assert_eq!(reg.len(), 4);
        assert!(reg.lookup("a").is_some());
        reg.create("e", cfg()).unwrap();
        assert!(start.elapsed() < Duration::from_millis(300));

        assert!(loader.join().unwrap().is_ok());
        assert!(reg.contains("slow"));
    }

    #[test]
    fn get_or_create_reuses_live_reference() {
        let reg = ReferenceRegistry::new();
        let a = reg.get_or_create("kb", cfg()).unwrap();
        let b = reg.get_or_create("kb", cfg()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        reg.create("alpha", cfg()).unwrap();
        assert_eq!(reg.names(), vec!["alpha".to_string(), "kb".to_string()]);
    }
}
