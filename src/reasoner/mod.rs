//! Reasoner boundary: the [`Reasoner`] trait and its engines.
//!
//! A reasoner is attached to exactly one ontology. It is told about changes
//! through [`Reasoner::ontology_changed`] and recomputes its entailments in
//! [`Reasoner::classify`]. Every query returns a [`ReasonerResult`]; the
//! `Err(ReasonerError::InconsistentOntology)` variant is the inconsistency
//! signal the coordinator turns into a state transition.
//!
//! Engines are chosen by string key through [`factory::ReasonerFactory`].

pub mod factory;
pub(crate) mod model;
pub mod saturation;
pub mod structural;
pub(crate) mod taxonomy;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Class, DataProperty, Entity, Individual, Literal, ObjectProperty};
use crate::ontology::Ontology;

pub use crate::error::ReasonerError;
pub use factory::ReasonerFactory;
pub use saturation::SaturationReasoner;
pub use structural::StructuralReasoner;

/// Result type for reasoner calls.
pub type ReasonerResult<T> = std::result::Result<T, ReasonerError>;

/// How far hierarchy and membership answers reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Only the first level: direct sub/super classes, most specific types.
    Direct,
    /// Full closure up to the roots or down to the leaves.
    #[default]
    Transitive,
}

impl Completeness {
    pub fn is_direct(self) -> bool {
        matches!(self, Completeness::Direct)
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completeness::Direct => write!(f, "direct"),
            Completeness::Transitive => write!(f, "transitive"),
        }
    }
}

/// A contradiction found while checking consistency.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Conflict {
    DisjointMembership {
        individual: Individual,
        first: Class,
        second: Class,
    },
    MemberOfNothing {
        individual: Individual,
    },
    SameAndDifferent {
        first: Individual,
        second: Individual,
    },
    FunctionalDataProperty {
        individual: Individual,
        property: DataProperty,
        values: BTreeSet<Literal>,
    },
    IrreflexiveSelfLoop {
        individual: Individual,
        property: ObjectProperty,
    },
    AsymmetricPair {
        property: ObjectProperty,
        first: Individual,
        second: Individual,
    },
}

impl Conflict {
    /// Entities taking part in the contradiction.
    pub fn entities(&self) -> Vec<Entity> {
        match self {
            Conflict::DisjointMembership {
                individual,
                first,
                second,
            } => vec![
                individual.clone().into(),
                first.clone().into(),
                second.clone().into(),
            ],
            Conflict::MemberOfNothing { individual } => vec![individual.clone().into()],
            Conflict::SameAndDifferent { first, second } => {
                vec![first.clone().into(), second.clone().into()]
            }
            Conflict::FunctionalDataProperty {
                individual,
                property,
                ..
            } => vec![individual.clone().into(), property.clone().into()],
            Conflict::IrreflexiveSelfLoop {
                individual,
                property,
            } => vec![individual.clone().into(), property.clone().into()],
            Conflict::AsymmetricPair {
                property,
                first,
                second,
            } => vec![
                property.clone().into(),
                first.clone().into(),
                second.clone().into(),
            ],
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::DisjointMembership {
                individual,
                first,
                second,
            } => write!(
                f,
                "{individual} is an instance of both {first} and {second}, which are disjoint"
            ),
            Conflict::MemberOfNothing { individual } => {
                write!(f, "{individual} is an instance of an unsatisfiable class")
            }
            Conflict::SameAndDifferent { first, second } => write!(
                f,
                "{first} and {second} are declared different but inferred to be the same"
            ),
            Conflict::FunctionalDataProperty {
                individual,
                property,
                values,
            } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "{individual} has {} values for functional property {property}: {}",
                    values.len(),
                    values.join(", ")
                )
            }
            Conflict::IrreflexiveSelfLoop {
                individual,
                property,
            } => write!(
                f,
                "{individual} is related to itself by irreflexive property {property}"
            ),
            Conflict::AsymmetricPair {
                property,
                first,
                second,
            } => write!(
                f,
                "{first} and {second} are related both ways by asymmetric property {property}"
            ),
        }
    }
}

/// An inference engine attached to one ontology.
///
/// Queries answer from the engine's current view of the ontology. A buffering
/// engine keeps answering from its last [`classify`](Reasoner::classify) until
/// classified again; a non-buffering engine refreshes on every
/// [`ontology_changed`](Reasoner::ontology_changed).
pub trait Reasoner: Send {
    /// Factory key of the engine.
    fn name(&self) -> &str;

    fn is_buffering(&self) -> bool;

    /// Called after changes were applied to the ontology.
    fn ontology_changed(&mut self, ontology: &Ontology) -> ReasonerResult<()>;

    /// Recompute all entailments of the ontology.
    fn classify(&mut self, ontology: &Ontology) -> ReasonerResult<()>;

    fn is_consistent(&self) -> bool;

    fn instances_of(
        &self,
        class: &Class,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<Individual>>;

    fn types_of(&self, individual: &Individual, mode: Completeness)
    -> ReasonerResult<BTreeSet<Class>>;

    fn object_property_values(
        &self,
        individual: &Individual,
        property: &ObjectProperty,
    ) -> ReasonerResult<BTreeSet<Individual>>;

    fn data_property_values(
        &self,
        individual: &Individual,
        property: &DataProperty,
    ) -> ReasonerResult<BTreeSet<Literal>>;

    fn sub_classes(&self, class: &Class, mode: Completeness) -> ReasonerResult<BTreeSet<Class>>;

    fn super_classes(&self, class: &Class, mode: Completeness)
    -> ReasonerResult<BTreeSet<Class>>;

    fn equivalent_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>>;

    fn disjoint_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>>;

    fn sub_object_properties(
        &self,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>>;

    fn super_object_properties(
        &self,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>>;

    fn sub_data_properties(
        &self,
        property: &DataProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<DataProperty>>;

    fn super_data_properties(
        &self,
        property: &DataProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<DataProperty>>;

    fn inverse_properties(
        &self,
        property: &ObjectProperty,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>>;

    fn same_individuals(&self, individual: &Individual) -> ReasonerResult<BTreeSet<Individual>>;

    fn different_individuals(
        &self,
        individual: &Individual,
    ) -> ReasonerResult<BTreeSet<Individual>>;

    /// Contradictions found by the last classification.
    fn conflicts(&self) -> Vec<Conflict>;
}
