//! Enquirer: read-only questions about the knowledge base.
//!
//! Every answer is the union of what the ontology asserts and what the
//! reasoner derives. With inferences disabled the reasoner is never asked.
//! A reasoner inconsistency aborts the whole read: the error is returned
//! instead of a partial answer, and the coordinator turns it into an empty
//! result plus a consistency transition.
//!
//! `owl:Thing` and `owl:Nothing` never appear in class-valued answers.

use std::collections::{BTreeMap, BTreeSet};

use crate::entity::{Class, DataProperty, Individual, Literal, ObjectProperty};
use crate::ontology::Ontology;
use crate::reasoner::{Completeness, Reasoner, ReasonerResult};

/// Read operations over one ontology and its reasoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enquirer {
    completeness: Completeness,
    include_inferences: bool,
}

impl Default for Enquirer {
    fn default() -> Self {
        Self::new(true, Completeness::default())
    }
}

fn strip_bounds(classes: BTreeSet<Class>) -> BTreeSet<Class> {
    classes
        .into_iter()
        .filter(|c| !c.is_thing() && !c.is_nothing())
        .collect()
}

fn first<T: Clone>(set: &BTreeSet<T>) -> Option<T> {
    set.iter().next().cloned()
}

impl Enquirer {
    pub fn new(include_inferences: bool, completeness: Completeness) -> Self {
        Self {
            completeness,
            include_inferences,
        }
    }

    /// Mode used by reads that are not given one explicitly.
    pub fn completeness(&self) -> Completeness {
        self.completeness
    }

    pub fn set_completeness(&mut self, completeness: Completeness) {
        self.completeness = completeness;
    }

    pub fn includes_inferences(&self) -> bool {
        self.include_inferences
    }

    pub fn set_include_inferences(&mut self, include: bool) {
        self.include_inferences = include;
    }

    /// Union the told answer with the reasoner's, if inferences are on.
    fn merge<T: Ord>(
        &self,
        mut told: BTreeSet<T>,
        inferred: impl FnOnce() -> ReasonerResult<BTreeSet<T>>,
    ) -> ReasonerResult<BTreeSet<T>> {
        if self.include_inferences {
            told.extend(inferred()?);
        }
        Ok(told)
    }

    // -----------------------------------------------------------------------
    // Individuals and types
    // -----------------------------------------------------------------------

    pub fn individuals_of_thing(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
    ) -> ReasonerResult<BTreeSet<Individual>> {
        self.individuals_of(ontology, reasoner, &Class::thing(), Completeness::Transitive)
    }

    pub fn individuals_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<Individual>> {
        self.merge(ontology.told_instances(class), || {
            reasoner.instances_of(class, mode)
        })
    }

    pub fn types_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<Class>> {
        self.merge(ontology.told_types(individual), || {
            reasoner.types_of(individual, mode)
        })
        .map(strip_bounds)
    }

    /// Types of the individual that have no sub-class among its other types.
    pub fn bottom_types_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<BTreeSet<Class>> {
        let types = self.types_of(ontology, reasoner, individual, Completeness::Transitive)?;
        let mut bottom = BTreeSet::new();
        for class in &types {
            let subs = self.sub_classes_of(ontology, reasoner, class, Completeness::Transitive)?;
            if subs.is_disjoint(&types) {
                bottom.insert(class.clone());
            }
        }
        Ok(bottom)
    }

    pub fn equivalent_individuals_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<BTreeSet<Individual>> {
        self.merge(ontology.told_same_individuals(individual), || {
            reasoner.same_individuals(individual)
        })
    }

    pub fn disjoint_individuals_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<BTreeSet<Individual>> {
        self.merge(ontology.told_different_individuals(individual), || {
            reasoner.different_individuals(individual)
        })
    }

    // -----------------------------------------------------------------------
    // Property values
    // -----------------------------------------------------------------------

    pub fn object_property_values(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        property: &ObjectProperty,
    ) -> ReasonerResult<BTreeSet<Individual>> {
        self.merge(ontology.told_object_values(individual, property), || {
            reasoner.object_property_values(individual, property)
        })
    }

    pub fn data_property_values(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        property: &DataProperty,
    ) -> ReasonerResult<BTreeSet<Literal>> {
        self.merge(ontology.told_data_values(individual, property), || {
            reasoner.data_property_values(individual, property)
        })
    }

    /// Every object property relation of the individual, keyed by property.
    pub fn object_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<BTreeMap<ObjectProperty, BTreeSet<Individual>>> {
        let mut relations = BTreeMap::new();
        for property in ontology.object_properties() {
            let values = self.object_property_values(ontology, reasoner, individual, &property)?;
            if !values.is_empty() {
                relations.insert(property, values);
            }
        }
        Ok(relations)
    }

    /// Every data property relation of the individual, keyed by property.
    pub fn data_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<BTreeMap<DataProperty, BTreeSet<Literal>>> {
        let mut relations = BTreeMap::new();
        for property in ontology.data_properties() {
            let values = self.data_property_values(ontology, reasoner, individual, &property)?;
            if !values.is_empty() {
                relations.insert(property, values);
            }
        }
        Ok(relations)
    }

    // -----------------------------------------------------------------------
    // Class hierarchy
    // -----------------------------------------------------------------------

    pub fn sub_classes_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<Class>> {
        self.merge(ontology.told_sub_classes(class), || {
            reasoner.sub_classes(class, mode)
        })
        .map(strip_bounds)
    }

    pub fn super_classes_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<Class>> {
        self.merge(ontology.told_super_classes(class), || {
            reasoner.super_classes(class, mode)
        })
        .map(strip_bounds)
    }

    pub fn equivalent_classes_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
    ) -> ReasonerResult<BTreeSet<Class>> {
        self.merge(ontology.told_equivalent_classes(class), || {
            reasoner.equivalent_classes(class)
        })
        .map(strip_bounds)
    }

    pub fn disjoint_classes_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
    ) -> ReasonerResult<BTreeSet<Class>> {
        self.merge(ontology.told_disjoint_classes(class), || {
            reasoner.disjoint_classes(class)
        })
        .map(strip_bounds)
    }

    // -----------------------------------------------------------------------
    // Property hierarchy
    // -----------------------------------------------------------------------

    pub fn sub_object_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
        self.merge(ontology.told_sub_object_properties(property), || {
            reasoner.sub_object_properties(property, mode)
        })
    }

    pub fn super_object_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
        self.merge(ontology.told_super_object_properties(property), || {
            reasoner.super_object_properties(property, mode)
        })
    }

    pub fn sub_data_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        property: &DataProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<DataProperty>> {
        self.merge(ontology.told_sub_data_properties(property), || {
            reasoner.sub_data_properties(property, mode)
        })
    }

    pub fn super_data_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        property: &DataProperty,
        mode: Completeness,
    ) -> ReasonerResult<BTreeSet<DataProperty>> {
        self.merge(ontology.told_super_data_properties(property), || {
            reasoner.super_data_properties(property, mode)
        })
    }

    pub fn inverse_properties_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        property: &ObjectProperty,
    ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
        self.merge(ontology.told_inverses(property), || {
            reasoner.inverse_properties(property)
        })
    }

    // -----------------------------------------------------------------------
    // Single-answer helpers
    // -----------------------------------------------------------------------

    pub fn only_individual_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        class: &Class,
        mode: Completeness,
    ) -> ReasonerResult<Option<Individual>> {
        Ok(first(&self.individuals_of(ontology, reasoner, class, mode)?))
    }

    pub fn only_type_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        mode: Completeness,
    ) -> ReasonerResult<Option<Class>> {
        Ok(first(&self.types_of(ontology, reasoner, individual, mode)?))
    }

    pub fn only_bottom_type_of(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
    ) -> ReasonerResult<Option<Class>> {
        Ok(first(&self.bottom_types_of(ontology, reasoner, individual)?))
    }

    pub fn only_object_property_value(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        property: &ObjectProperty,
    ) -> ReasonerResult<Option<Individual>> {
        Ok(first(&self.object_property_values(
            ontology, reasoner, individual, property,
        )?))
    }

    pub fn only_data_property_value(
        &self,
        ontology: &Ontology,
        reasoner: &dyn Reasoner,
        individual: &Individual,
        property: &DataProperty,
    ) -> ReasonerResult<Option<Literal>> {
        Ok(first(&self.data_property_values(
            ontology, reasoner, individual, property,
        )?))
    }
}
