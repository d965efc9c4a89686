//! Told-structure engine.
//!
//! Answers from the asserted hierarchies only: sub-class and sub-property
//! edges are closed transitively and told types are lifted along them, but no
//! individual-level rules run and the engine never reports an inconsistency.

use std::collections::BTreeSet;

use crate::entity::{Class, DataProperty, Individual, Literal, ObjectProperty};
use crate::ontology::Ontology;

use super::model::{Materialized, Model, delegate_model_queries};
use super::{Completeness, Conflict, Reasoner, ReasonerResult};

/// Factory key of this engine.
pub const NAME: &str = "structural";

pub struct StructuralReasoner {
    inner: Materialized,
}

impl StructuralReasoner {
    pub fn new(buffering: bool) -> Self {
        Self {
            inner: Materialized::new(Model::told, buffering),
        }
    }
}

impl Reasoner for StructuralReasoner {
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
        tracing::debug!(reasoner = NAME, axioms = ontology.len(), "classifying told structure");
        self.inner.rebuild(ontology)
    }

    delegate_model_queries!();
}
