//! Default engine: saturates the ontology and checks it for contradictions.
//!
//! Classification builds the class and property taxonomies, merges
//! individuals that must be the same, propagates types and property values
//! to a fixpoint, and then looks for clashes. Any clash makes the engine
//! report [`ReasonerError::InconsistentOntology`] from every query until a
//! later classification finds none.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::entity::{Class, DataProperty, Individual, Literal, ObjectProperty};
use crate::ontology::Ontology;

use super::model::{Materialized, Model, delegate_model_queries};
use super::{Completeness, Conflict, Reasoner, ReasonerError, ReasonerResult};

/// Factory key of this engine.
pub const NAME: &str = "saturation";

pub struct SaturationReasoner {
    inner: Materialized,
}

impl SaturationReasoner {
    pub fn new(buffering: bool) -> Self {
        Self {
            inner: Materialized::new(Model::saturate, buffering),
        }
    }

    /// Whether changes arrived since the last classification.
    pub fn is_stale(&self) -> bool {
        self.inner.is_stale()
    }
}

impl Reasoner for SaturationReasoner {
    fn name(&self) -> &str {
        NAME
    }

    fn is_buffering(&self) -> bool {
        self.inner.is_buffering()
    }

    fn ontology_changed(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        self.inner.changed(ontology)
    }

    fn classify(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        let start = Instant::now();
        let result = self.inner.rebuild(ontology);
        tracing::debug!(
            reasoner = NAME,
            axioms = ontology.len(),
            conflicts = self.inner.conflicts().len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "classified ontology"
        );
        if let Err(ReasonerError::InconsistentOntology) = &result {
            for conflict in self.inner.conflicts() {
                tracing::debug!(reasoner = NAME, %conflict, "clash");
            }
        }
        result
    }

    delegate_model_queries!();
}
