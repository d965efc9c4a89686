//! Change builders: each write operation as an ordered list of descriptors.
//!
//! Builders never touch the store. Those that need to know what is currently
//! asserted (removing or renaming an entity, replacing values) take the
//! ontology by shared reference and read it at build time.

use std::collections::BTreeSet;

use crate::entity::{Class, DataProperty, Entity, Individual, Iri, Literal, ObjectProperty};
use crate::ontology::{Axiom, ChangeDescriptor, Ontology, PropertyCharacteristic};

fn add(axiom: Axiom) -> Vec<ChangeDescriptor> {
    vec![ChangeDescriptor::AddAxiom(axiom)]
}

fn remove(axiom: Axiom) -> Vec<ChangeDescriptor> {
    vec![ChangeDescriptor::RemoveAxiom(axiom)]
}

// ---------------------------------------------------------------------------
// Raw axioms
// ---------------------------------------------------------------------------

pub fn add_axiom(axiom: Axiom) -> Vec<ChangeDescriptor> {
    add(axiom)
}

pub fn remove_axiom(axiom: Axiom) -> Vec<ChangeDescriptor> {
    remove(axiom)
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Declare an entity.
pub fn add_entity(entity: Entity) -> Vec<ChangeDescriptor> {
    add(Axiom::Declaration(entity))
}

/// Remove every asserted axiom that references the entity.
pub fn remove_entity(ontology: &Ontology, entity: &Entity) -> Vec<ChangeDescriptor> {
    ontology
        .axioms_referencing(entity)
        .cloned()
        .map(ChangeDescriptor::RemoveAxiom)
        .collect()
}

pub fn add_individual(individual: Individual) -> Vec<ChangeDescriptor> {
    add_entity(individual.into())
}

pub fn remove_individual(ontology: &Ontology, individual: &Individual) -> Vec<ChangeDescriptor> {
    remove_entity(ontology, &individual.clone().into())
}

pub fn add_class(class: Class) -> Vec<ChangeDescriptor> {
    add_entity(class.into())
}

pub fn remove_class(ontology: &Ontology, class: &Class) -> Vec<ChangeDescriptor> {
    remove_entity(ontology, &class.clone().into())
}

/// Move every axiom mentioning `entity` over to the same kind of entity at
/// `to`. Removals come first so the old name never coexists with the new one.
pub fn rename_entity(ontology: &Ontology, entity: &Entity, to: &Iri) -> Vec<ChangeDescriptor> {
    if entity.iri() == to {
        return Vec::new();
    }
    let axioms: Vec<Axiom> = ontology.axioms_referencing(entity).cloned().collect();
    let mut changes: Vec<ChangeDescriptor> = axioms
        .iter()
        .cloned()
        .map(ChangeDescriptor::RemoveAxiom)
        .collect();
    changes.extend(
        axioms
            .iter()
            .map(|a| ChangeDescriptor::AddAxiom(a.renamed(entity, to))),
    );
    changes
}

// ---------------------------------------------------------------------------
// Class hierarchy and membership
// ---------------------------------------------------------------------------

pub fn add_sub_class(sub: Class, sup: Class) -> Vec<ChangeDescriptor> {
    add(Axiom::SubClassOf { sub, sup })
}

pub fn remove_sub_class(sub: Class, sup: Class) -> Vec<ChangeDescriptor> {
    remove(Axiom::SubClassOf { sub, sup })
}

pub fn add_class_assertion(individual: Individual, class: Class) -> Vec<ChangeDescriptor> {
    add(Axiom::ClassAssertion { class, individual })
}

pub fn remove_class_assertion(individual: Individual, class: Class) -> Vec<ChangeDescriptor> {
    remove(Axiom::ClassAssertion { class, individual })
}

/// Move an individual from `old` to `new`. Without `old`, every asserted
/// type of the individual is dropped.
pub fn replace_individual_class(
    ontology: &Ontology,
    individual: &Individual,
    old: Option<&Class>,
    new: Class,
) -> Vec<ChangeDescriptor> {
    let olds: BTreeSet<Class> = match old {
        Some(c) => BTreeSet::from([c.clone()]),
        None => ontology.told_types(individual),
    };
    let mut changes: Vec<ChangeDescriptor> = olds
        .into_iter()
        .filter(|c| *c != new)
        .flat_map(|c| remove_class_assertion(individual.clone(), c))
        .collect();
    changes.extend(add_class_assertion(individual.clone(), new));
    changes
}

// ---------------------------------------------------------------------------
// Property assertions
// ---------------------------------------------------------------------------

pub fn add_object_property_value(
    subject: Individual,
    property: ObjectProperty,
    object: Individual,
) -> Vec<ChangeDescriptor> {
    add(Axiom::ObjectPropertyAssertion {
        property,
        subject,
        object,
    })
}

pub fn remove_object_property_value(
    subject: Individual,
    property: ObjectProperty,
    object: Individual,
) -> Vec<ChangeDescriptor> {
    remove(Axiom::ObjectPropertyAssertion {
        property,
        subject,
        object,
    })
}

pub fn add_data_property_value(
    subject: Individual,
    property: DataProperty,
    value: Literal,
) -> Vec<ChangeDescriptor> {
    add(Axiom::DataPropertyAssertion {
        property,
        subject,
        value,
    })
}

pub fn remove_data_property_value(
    subject: Individual,
    property: DataProperty,
    value: Literal,
) -> Vec<ChangeDescriptor> {
    remove(Axiom::DataPropertyAssertion {
        property,
        subject,
        value,
    })
}

/// Swap an object property value. Without `old`, every asserted value of the
/// property on the subject is removed first.
pub fn replace_object_property_value(
    ontology: &Ontology,
    subject: &Individual,
    property: &ObjectProperty,
    old: Option<&Individual>,
    new: Individual,
) -> Vec<ChangeDescriptor> {
    let olds: BTreeSet<Individual> = match old {
        Some(i) => BTreeSet::from([i.clone()]),
        None => ontology.told_object_values(subject, property),
    };
    let mut changes: Vec<ChangeDescriptor> = olds
        .into_iter()
        .filter(|o| *o != new)
        .flat_map(|o| remove_object_property_value(subject.clone(), property.clone(), o))
        .collect();
    changes.extend(add_object_property_value(
        subject.clone(),
        property.clone(),
        new,
    ));
    changes
}

/// Swap a data property value. Without `old`, every asserted value of the
/// property on the subject is removed first.
pub fn replace_data_property_value(
    ontology: &Ontology,
    subject: &Individual,
    property: &DataProperty,
    old: Option<&Literal>,
    new: Literal,
) -> Vec<ChangeDescriptor> {
    let olds: BTreeSet<Literal> = match old {
        Some(l) => BTreeSet::from([l.clone()]),
        None => ontology.told_data_values(subject, property),
    };
    let mut changes: Vec<ChangeDescriptor> = olds
        .into_iter()
        .filter(|l| *l != new)
        .flat_map(|l| remove_data_property_value(subject.clone(), property.clone(), l))
        .collect();
    changes.extend(add_data_property_value(
        subject.clone(),
        property.clone(),
        new,
    ));
    changes
}

// ---------------------------------------------------------------------------
// Property hierarchy and characteristics
// ---------------------------------------------------------------------------

pub fn add_sub_object_property(sub: ObjectProperty, sup: ObjectProperty) -> Vec<ChangeDescriptor> {
    add(Axiom::SubObjectPropertyOf { sub, sup })
}

pub fn remove_sub_object_property(
    sub: ObjectProperty,
    sup: ObjectProperty,
) -> Vec<ChangeDescriptor> {
    remove(Axiom::SubObjectPropertyOf { sub, sup })
}

pub fn add_sub_data_property(sub: DataProperty, sup: DataProperty) -> Vec<ChangeDescriptor> {
    add(Axiom::SubDataPropertyOf { sub, sup })
}

pub fn remove_sub_data_property(sub: DataProperty, sup: DataProperty) -> Vec<ChangeDescriptor> {
    remove(Axiom::SubDataPropertyOf { sub, sup })
}

pub fn add_inverse_properties(a: ObjectProperty, b: ObjectProperty) -> Vec<ChangeDescriptor> {
    add(Axiom::inverse_properties(a, b))
}

pub fn remove_inverse_properties(a: ObjectProperty, b: ObjectProperty) -> Vec<ChangeDescriptor> {
    remove(Axiom::inverse_properties(a, b))
}

pub fn add_object_property_characteristic(
    property: ObjectProperty,
    characteristic: PropertyCharacteristic,
) -> Vec<ChangeDescriptor> {
    add(Axiom::ObjectPropertyCharacteristic {
        property,
        characteristic,
    })
}

pub fn remove_object_property_characteristic(
    property: ObjectProperty,
    characteristic: PropertyCharacteristic,
) -> Vec<ChangeDescriptor> {
    remove(Axiom::ObjectPropertyCharacteristic {
        property,
        characteristic,
    })
}

pub fn add_functional_data_property(property: DataProperty) -> Vec<ChangeDescriptor> {
    add(Axiom::FunctionalDataProperty(property))
}

pub fn remove_functional_data_property(property: DataProperty) -> Vec<ChangeDescriptor> {
    remove(Axiom::FunctionalDataProperty(property))
}

// ---------------------------------------------------------------------------
// Disjointness and equivalence
// ---------------------------------------------------------------------------

/// N-ary axioms over fewer than two members say nothing and are skipped.
fn nary<T>(members: BTreeSet<T>, build: impl FnOnce(BTreeSet<T>) -> Axiom) -> Option<Axiom> {
    (members.len() >= 2).then(|| build(members))
}

pub fn make_disjoint_classes(classes: BTreeSet<Class>) -> Vec<ChangeDescriptor> {
    nary(classes, Axiom::DisjointClasses).map(add).unwrap_or_default()
}

pub fn remove_disjoint_classes(classes: BTreeSet<Class>) -> Vec<ChangeDescriptor> {
    nary(classes, Axiom::DisjointClasses)
        .map(remove)
        .unwrap_or_default()
}

pub fn make_disjoint_individuals(individuals: BTreeSet<Individual>) -> Vec<ChangeDescriptor> {
    nary(individuals, Axiom::DifferentIndividuals)
        .map(add)
        .unwrap_or_default()
}

pub fn remove_disjoint_individuals(individuals: BTreeSet<Individual>) -> Vec<ChangeDescriptor> {
    nary(individuals, Axiom::DifferentIndividuals)
        .map(remove)
        .unwrap_or_default()
}

pub fn make_equivalent_classes(classes: BTreeSet<Class>) -> Vec<ChangeDescriptor> {
    nary(classes, Axiom::EquivalentClasses)
        .map(add)
        .unwrap_or_default()
}

pub fn remove_equivalent_classes(classes: BTreeSet<Class>) -> Vec<ChangeDescriptor> {
    nary(classes, Axiom::EquivalentClasses)
        .map(remove)
        .unwrap_or_default()
}

pub fn make_equivalent_individuals(individuals: BTreeSet<Individual>) -> Vec<ChangeDescriptor> {
    nary(individuals, Axiom::SameIndividual)
        .map(add)
        .unwrap_or_default()
}

pub fn remove_equivalent_individuals(individuals: BTreeSet<Individual>) -> Vec<ChangeDescriptor> {
    nary(individuals, Axiom::SameIndividual)
        .map(remove)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EntityNamer;

    fn setup() -> (EntityNamer, Ontology) {
        let n = EntityNamer::new("http://ex.org/c");
        let mut o = Ontology::new(Iri::new("http://ex.org/c"));
        o.apply(&add_class_assertion(n.individual("rex"), n.class("Dog")));
        o.apply(&add_class_assertion(n.individual("rex"), n.class("Pet")));
        o.apply(&add_object_property_value(
            n.individual("rex"),
            n.object_property("owner"),
            n.individual("ann"),
        ));
        o.apply(&add_data_property_value(
            n.individual("rex"),
            n.data_property("age"),
            Literal::from(3),
        ));
        (n, o)
    }

    #[test]
    fn replace_removes_before_adding() {
        let (n, o) = setup();
        let changes = replace_object_property_value(
            &o,
            &n.individual("rex"),
            &n.object_property("owner"),
            Some(&n.individual("ann")),
            n.individual("bob"),
        );
        assert_eq!(changes.len(), 2);
        assert!(!changes[0].is_addition());
        assert!(changes[1].is_addition());
    }

    #[test]
    fn replace_without_old_drops_every_told_value() {
        let (n, o) = setup();
        let changes =
            replace_individual_class(&o, &n.individual("rex"), None, n.class("Wolf"));
        let removed = changes.iter().filter(|c| !c.is_addition()).count();
        assert_eq!(removed, 2);

        let changes = replace_data_property_value(
            &o,
            &n.individual("rex"),
            &n.data_property("age"),
            None,
            Literal::from(3),
        );
        assert_eq!(changes.len(), 1, "same value is not removed then re-added");
    }

    #[test]
    fn remove_entity_covers_every_referencing_axiom() {
        let (n, o) = setup();
        let changes = remove_individual(&o, &n.individual("rex"));
        assert_eq!(changes.len(), 4);
        assert!(changes.iter().all(|c| !c.is_addition()));
        assert!(remove_class(&o, &n.class("Unknown")).is_empty());
    }

    #[test]
    fn rename_moves_axioms() {
        let (n, mut o) = setup();
        let changes = rename_entity(&o, &n.individual("rex").into(), &n.iri("max"));
        assert_eq!(changes.len(), 8);
        o.apply(&changes);
        assert!(o.told_types(&n.individual("rex")).is_empty());
        assert_eq!(
            o.told_types(&n.individual("max")),
            n.classes(["Dog", "Pet"])
        );
        assert!(rename_entity(&o, &n.individual("max").into(), &n.iri("max")).is_empty());
    }

    #[test]
    fn nary_axioms_need_two_members() {
        let n = EntityNamer::new("http://ex.org/c");
        assert!(make_disjoint_classes(n.classes(["A"])).is_empty());
        assert_eq!(make_disjoint_individuals(n.individuals(["a", "b"])).len(), 1);
        assert_eq!(remove_equivalent_classes(n.classes(["A", "B"])).len(), 1);
    }
}
