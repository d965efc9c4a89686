//! Ontology store: asserted axioms with a per-entity index.
//!
//! The store holds a set of [`Axiom`]s. Mutations arrive as ordered
//! [`ChangeDescriptor`]s and are applied in order by [`Ontology::apply`].
//! An entity is part of the signature while at least one axiom references it,
//! so writing an axiom that names a new entity creates that entity.
//!
//! Document I/O lives in [`rdf`].

pub mod rdf;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::entity::{Class, DataProperty, Entity, EntityKind, Individual, Iri, Literal, ObjectProperty};
use crate::error::OntologyError;

/// Result type for ontology store operations.
pub type OntologyResult<T> = std::result::Result<T, OntologyError>;

/// Characteristics an object property can be declared to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyCharacteristic {
    Functional,
    InverseFunctional,
    Transitive,
    Symmetric,
    Asymmetric,
    Reflexive,
    Irreflexive,
}

impl PropertyCharacteristic {
    pub const ALL: [PropertyCharacteristic; 7] = [
        PropertyCharacteristic::Functional,
        PropertyCharacteristic::InverseFunctional,
        PropertyCharacteristic::Transitive,
        PropertyCharacteristic::Symmetric,
        PropertyCharacteristic::Asymmetric,
        PropertyCharacteristic::Reflexive,
        PropertyCharacteristic::Irreflexive,
    ];
}

impl fmt::Display for PropertyCharacteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyCharacteristic::Functional => "Functional",
            PropertyCharacteristic::InverseFunctional => "InverseFunctional",
            PropertyCharacteristic::Transitive => "Transitive",
            PropertyCharacteristic::Symmetric => "Symmetric",
            PropertyCharacteristic::Asymmetric => "Asymmetric",
            PropertyCharacteristic::Reflexive => "Reflexive",
            PropertyCharacteristic::Irreflexive => "Irreflexive",
        };
        f.write_str(s)
    }
}

/// A single logical statement in the ontology.
///
/// N-ary axioms hold ordered sets, so `DisjointClasses({A, B})` and
/// `DisjointClasses({B, A})` are the same axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axiom {
    Declaration(Entity),
    SubClassOf { sub: Class, sup: Class },
    EquivalentClasses(BTreeSet<Class>),
    DisjointClasses(BTreeSet<Class>),
    ClassAssertion { class: Class, individual: Individual },
    ObjectPropertyAssertion {
        property: ObjectProperty,
        subject: Individual,
        object: Individual,
    },
    DataPropertyAssertion {
        property: DataProperty,
        subject: Individual,
        value: Literal,
    },
    SubObjectPropertyOf { sub: ObjectProperty, sup: ObjectProperty },
    SubDataPropertyOf { sub: DataProperty, sup: DataProperty },
    /// Built through [`Axiom::inverse_properties`], which orders the pair.
    InverseObjectProperties(ObjectProperty, ObjectProperty),
    ObjectPropertyCharacteristic {
        property: ObjectProperty,
        characteristic: PropertyCharacteristic,
    },
    FunctionalDataProperty(DataProperty),
    SameIndividual(BTreeSet<Individual>),
    DifferentIndividuals(BTreeSet<Individual>),
}

impl Axiom {
    pub fn inverse_properties(a: ObjectProperty, b: ObjectProperty) -> Axiom {
        if a <= b {
            Axiom::InverseObjectProperties(a, b)
        } else {
            Axiom::InverseObjectProperties(b, a)
        }
    }

    /// Every entity the axiom references.
    pub fn entities(&self) -> Vec<Entity> {
        match self {
            Axiom::Declaration(e) => vec![e.clone()],
            Axiom::SubClassOf { sub, sup } => vec![sub.clone().into(), sup.clone().into()],
            Axiom::EquivalentClasses(set) | Axiom::DisjointClasses(set) => {
                set.iter().cloned().map(Entity::from).collect()
            }
            Axiom::ClassAssertion { class, individual } => {
                vec![class.clone().into(), individual.clone().into()]
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => vec![
                property.clone().into(),
                subject.clone().into(),
                object.clone().into(),
            ],
            Axiom::DataPropertyAssertion {
                property, subject, ..
            } => vec![property.clone().into(), subject.clone().into()],
            Axiom::SubObjectPropertyOf { sub, sup } => vec![sub.clone().into(), sup.clone().into()],
            Axiom::SubDataPropertyOf { sub, sup } => vec![sub.clone().into(), sup.clone().into()],
            Axiom::InverseObjectProperties(a, b) => vec![a.clone().into(), b.clone().into()],
            Axiom::ObjectPropertyCharacteristic { property, .. } => vec![property.clone().into()],
            Axiom::FunctionalDataProperty(p) => vec![p.clone().into()],
            Axiom::SameIndividual(set) | Axiom::DifferentIndividuals(set) => {
                set.iter().cloned().map(Entity::from).collect()
            }
        }
    }

    pub fn mentions(&self, entity: &Entity) -> bool {
        self.entities().iter().any(|e| e == entity)
    }

    /// A copy of the axiom with every occurrence of `from` replaced by the
    /// same kind of entity named `to`.
    pub fn renamed(&self, from: &Entity, to: &Iri) -> Axiom {
        let r = Renamer { from, to };
        match self {
            Axiom::Declaration(e) => Axiom::Declaration(if e == from {
                e.with_iri(to.clone())
            } else {
                e.clone()
            }),
            Axiom::SubClassOf { sub, sup } => Axiom::SubClassOf {
                sub: r.class(sub),
                sup: r.class(sup),
            },
            Axiom::EquivalentClasses(set) => {
                Axiom::EquivalentClasses(set.iter().map(|c| r.class(c)).collect())
            }
            Axiom::DisjointClasses(set) => {
                Axiom::DisjointClasses(set.iter().map(|c| r.class(c)).collect())
            }
            Axiom::ClassAssertion { class, individual } => Axiom::ClassAssertion {
                class: r.class(class),
                individual: r.individual(individual),
            },
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => Axiom::ObjectPropertyAssertion {
                property: r.object_property(property),
                subject: r.individual(subject),
                object: r.individual(object),
            },
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => Axiom::DataPropertyAssertion {
                property: r.data_property(property),
                subject: r.individual(subject),
                value: value.clone(),
            },
            Axiom::SubObjectPropertyOf { sub, sup } => Axiom::SubObjectPropertyOf {
                sub: r.object_property(sub),
                sup: r.object_property(sup),
            },
            Axiom::SubDataPropertyOf { sub, sup } => Axiom::SubDataPropertyOf {
                sub: r.data_property(sub),
                sup: r.data_property(sup),
            },
            Axiom::InverseObjectProperties(a, b) => {
                Axiom::inverse_properties(r.object_property(a), r.object_property(b))
            }
            Axiom::ObjectPropertyCharacteristic {
                property,
                characteristic,
            } => Axiom::ObjectPropertyCharacteristic {
                property: r.object_property(property),
                characteristic: *characteristic,
            },
            Axiom::FunctionalDataProperty(p) => Axiom::FunctionalDataProperty(r.data_property(p)),
            Axiom::SameIndividual(set) => {
                Axiom::SameIndividual(set.iter().map(|i| r.individual(i)).collect())
            }
            Axiom::DifferentIndividuals(set) => {
                Axiom::DifferentIndividuals(set.iter().map(|i| r.individual(i)).collect())
            }
        }
    }
}

struct Renamer<'a> {
    from: &'a Entity,
    to: &'a Iri,
}

impl Renamer<'_> {
    fn class(&self, c: &Class) -> Class {
        match self.from {
            Entity::Class(f) if f == c => Class::new(self.to.clone()),
            _ => c.clone(),
        }
    }

    fn individual(&self, i: &Individual) -> Individual {
        match self.from {
            Entity::Individual(f) if f == i => Individual::new(self.to.clone()),
            _ => i.clone(),
        }
    }

    fn object_property(&self, p: &ObjectProperty) -> ObjectProperty {
        match self.from {
            Entity::ObjectProperty(f) if f == p => ObjectProperty::new(self.to.clone()),
            _ => p.clone(),
        }
    }

    fn data_property(&self, p: &DataProperty) -> DataProperty {
        match self.from {
            Entity::DataProperty(f) if f == p => DataProperty::new(self.to.clone()),
            _ => p.clone(),
        }
    }
}

fn join<T: fmt::Display>(set: &BTreeSet<T>) -> String {
    set.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::Declaration(e) => write!(f, "Declaration({e})"),
            Axiom::SubClassOf { sub, sup } => write!(f, "SubClassOf({sub} {sup})"),
            Axiom::EquivalentClasses(set) => write!(f, "EquivalentClasses({})", join(set)),
            Axiom::DisjointClasses(set) => write!(f, "DisjointClasses({})", join(set)),
            Axiom::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "ObjectPropertyAssertion({property} {subject} {object})"),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "DataPropertyAssertion({property} {subject} {value})"),
            Axiom::SubObjectPropertyOf { sub, sup } => {
                write!(f, "SubObjectPropertyOf({sub} {sup})")
            }
            Axiom::SubDataPropertyOf { sub, sup } => write!(f, "SubDataPropertyOf({sub} {sup})"),
            Axiom::InverseObjectProperties(a, b) => write!(f, "InverseObjectProperties({a} {b})"),
            Axiom::ObjectPropertyCharacteristic {
                property,
                characteristic,
            } => write!(f, "{characteristic}ObjectProperty({property})"),
            Axiom::FunctionalDataProperty(p) => write!(f, "FunctionalDataProperty({p})"),
            Axiom::SameIndividual(set) => write!(f, "SameIndividual({})", join(set)),
            Axiom::DifferentIndividuals(set) => write!(f, "DifferentIndividuals({})", join(set)),
        }
    }
}

/// An ordered, immutable unit of mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeDescriptor {
    AddAxiom(Axiom),
    RemoveAxiom(Axiom),
}

impl ChangeDescriptor {
    pub fn axiom(&self) -> &Axiom {
        match self {
            ChangeDescriptor::AddAxiom(a) | ChangeDescriptor::RemoveAxiom(a) => a,
        }
    }

    pub fn is_addition(&self) -> bool {
        matches!(self, ChangeDescriptor::AddAxiom(_))
    }
}

impl fmt::Display for ChangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeDescriptor::AddAxiom(a) => write!(f, "+ {a}"),
            ChangeDescriptor::RemoveAxiom(a) => write!(f, "- {a}"),
        }
    }
}

/// In-memory ontology: the asserted set of axioms.
#[derive(Debug, Clone)]
pub struct Ontology {
    iri: Iri,
    axioms: BTreeSet<Axiom>,
    /// Entity → axioms referencing it.
    by_entity: HashMap<Entity, BTreeSet<Axiom>>,
    /// Bumped on every effective change.
    revision: u64,
}

impl Ontology {
    /// Create an empty ontology.
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            axioms: BTreeSet::new(),
            by_entity: HashMap::new(),
            revision: 0,
        }
    }

    /// Load an ontology document from disk.
    pub fn load(iri: Iri, path: &Path) -> OntologyResult<Self> {
        let mut ontology = Self::new(iri);
        let axioms = rdf::read_file(path)?;
        for axiom in axioms {
            ontology.add_axiom(axiom);
        }
        tracing::info!(
            path = %path.display(),
            axioms = ontology.len(),
            "loaded ontology from file"
        );
        Ok(ontology)
    }

    /// Fetch and parse an ontology document from the web.
    pub fn load_from_web(iri: Iri, url: &str, timeout: Duration) -> OntologyResult<Self> {
        let mut ontology = Self::new(iri);
        for axiom in rdf::fetch(url, timeout)? {
            ontology.add_axiom(axiom);
        }
        tracing::info!(url, axioms = ontology.len(), "loaded ontology from web");
        Ok(ontology)
    }

    /// Write the ontology to disk; the format follows the file extension.
    pub fn save(&self, path: &Path) -> OntologyResult<()> {
        rdf::write_file(&self.iri, self.axioms.iter(), path)?;
        tracing::info!(path = %path.display(), axioms = self.len(), "saved ontology");
        Ok(())
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Declare an entity if it is not yet part of the signature.
    ///
    /// Returns `true` when a declaration was added.
    pub fn create_entity(&mut self, entity: Entity) -> bool {
        if self.contains_entity(&entity) {
            return false;
        }
        self.add_axiom(Axiom::Declaration(entity))
    }

    /// Insert an axiom. Returns `false` if it was already present.
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        if self.axioms.contains(&axiom) {
            return false;
        }
        for entity in axiom.entities() {
            self.by_entity.entry(entity).or_default().insert(axiom.clone());
        }
        self.axioms.insert(axiom);
        self.revision += 1;
        true
    }

    /// Remove an axiom. Returns `false` if it was not present.
    pub fn remove_axiom(&mut self, axiom: &Axiom) -> bool {
        if !self.axioms.remove(axiom) {
            return false;
        }
        for entity in axiom.entities() {
            if let Some(set) = self.by_entity.get_mut(&entity) {
                set.remove(axiom);
                if set.is_empty() {
                    self.by_entity.remove(&entity);
                }
            }
        }
        self.revision += 1;
        true
    }

    pub fn apply_change(&mut self, change: &ChangeDescriptor) -> bool {
        match change {
            ChangeDescriptor::AddAxiom(a) => self.add_axiom(a.clone()),
            ChangeDescriptor::RemoveAxiom(a) => self.remove_axiom(a),
        }
    }

    /// Apply an ordered list of changes. Returns how many changed the store.
    pub fn apply(&mut self, changes: &[ChangeDescriptor]) -> usize {
        changes.iter().filter(|c| self.apply_change(c)).count()
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    pub fn contains_entity(&self, entity: &Entity) -> bool {
        self.by_entity.contains_key(entity)
    }

    pub fn axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    /// All axioms referencing the entity.
    pub fn axioms_referencing(&self, entity: &Entity) -> impl Iterator<Item = &Axiom> {
        self.by_entity.get(entity).into_iter().flat_map(|s| s.iter())
    }

    /// Every entity referenced by at least one axiom.
    pub fn signature(&self) -> BTreeSet<Entity> {
        self.by_entity.keys().cloned().collect()
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> BTreeSet<Entity> {
        self.by_entity
            .keys()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn classes(&self) -> BTreeSet<Class> {
        self.by_entity
            .keys()
            .filter_map(|e| match e {
                Entity::Class(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn individuals(&self) -> BTreeSet<Individual> {
        self.by_entity
            .keys()
            .filter_map(|e| match e {
                Entity::Individual(i) => Some(i.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn object_properties(&self) -> BTreeSet<ObjectProperty> {
        self.by_entity
            .keys()
            .filter_map(|e| match e {
                Entity::ObjectProperty(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn data_properties(&self) -> BTreeSet<DataProperty> {
        self.by_entity
            .keys()
            .filter_map(|e| match e {
                Entity::DataProperty(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    // -----------------------------------------------------------------------
    // Asserted (told) lookups
    // -----------------------------------------------------------------------

    fn referencing<'a, T>(
        &'a self,
        entity: Entity,
        f: impl Fn(&'a Axiom) -> Option<T> + 'a,
    ) -> impl Iterator<Item = T> + 'a {
        self.by_entity
            .get(&entity)
            .into_iter()
            .flat_map(|s| s.iter())
            .filter_map(f)
    }

    pub fn told_types(&self, individual: &Individual) -> BTreeSet<Class> {
        self.referencing(individual.clone().into(), move |a| match a {
            Axiom::ClassAssertion { class, individual: i } if i == individual => Some(class.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_instances(&self, class: &Class) -> BTreeSet<Individual> {
        if class.is_thing() {
            return self.individuals();
        }
        self.referencing(class.clone().into(), move |a| match a {
            Axiom::ClassAssertion { class: c, individual } if c == class => Some(individual.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_sub_classes(&self, class: &Class) -> BTreeSet<Class> {
        self.referencing(class.clone().into(), move |a| match a {
            Axiom::SubClassOf { sub, sup } if sup == class => Some(sub.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_super_classes(&self, class: &Class) -> BTreeSet<Class> {
        self.referencing(class.clone().into(), move |a| match a {
            Axiom::SubClassOf { sub, sup } if sub == class => Some(sup.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_equivalent_classes(&self, class: &Class) -> BTreeSet<Class> {
        self.referencing(class.clone().into(), |a| match a {
            Axiom::EquivalentClasses(set) => Some(set.clone()),
            _ => None,
        })
        .flatten()
        .filter(|c| c != class)
        .collect()
    }

    pub fn told_disjoint_classes(&self, class: &Class) -> BTreeSet<Class> {
        self.referencing(class.clone().into(), |a| match a {
            Axiom::DisjointClasses(set) => Some(set.clone()),
            _ => None,
        })
        .flatten()
        .filter(|c| c != class)
        .collect()
    }

    pub fn told_same_individuals(&self, individual: &Individual) -> BTreeSet<Individual> {
        self.referencing(individual.clone().into(), |a| match a {
            Axiom::SameIndividual(set) => Some(set.clone()),
            _ => None,
        })
        .flatten()
        .filter(|i| i != individual)
        .collect()
    }

    pub fn told_different_individuals(&self, individual: &Individual) -> BTreeSet<Individual> {
        self.referencing(individual.clone().into(), |a| match a {
            Axiom::DifferentIndividuals(set) => Some(set.clone()),
            _ => None,
        })
        .flatten()
        .filter(|i| i != individual)
        .collect()
    }

    pub fn told_object_values(
        &self,
        individual: &Individual,
        property: &ObjectProperty,
    ) -> BTreeSet<Individual> {
        self.referencing(individual.clone().into(), move |a| match a {
            Axiom::ObjectPropertyAssertion {
                property: p,
                subject,
                object,
            } if p == property && subject == individual => Some(object.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_data_values(
        &self,
        individual: &Individual,
        property: &DataProperty,
    ) -> BTreeSet<Literal> {
        self.referencing(individual.clone().into(), move |a| match a {
            Axiom::DataPropertyAssertion {
                property: p,
                subject,
                value,
            } if p == property && subject == individual => Some(value.clone()),
            _ => None,
        })
        .collect()
    }

    /// Object properties the individual has at least one told value for.
    pub fn told_object_properties_of(&self, individual: &Individual) -> BTreeSet<ObjectProperty> {
        self.referencing(individual.clone().into(), move |a| match a {
            Axiom::ObjectPropertyAssertion {
                property, subject, ..
            } if subject == individual => Some(property.clone()),
            _ => None,
        })
        .collect()
    }

    /// Data properties the individual has at least one told value for.
    pub fn told_data_properties_of(&self, individual: &Individual) -> BTreeSet<DataProperty> {
        self.referencing(individual.clone().into(), move |a| match a {
            Axiom::DataPropertyAssertion {
                property, subject, ..
            } if subject == individual => Some(property.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_sub_object_properties(&self, property: &ObjectProperty) -> BTreeSet<ObjectProperty> {
        self.referencing(property.clone().into(), move |a| match a {
            Axiom::SubObjectPropertyOf { sub, sup } if sup == property => Some(sub.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_super_object_properties(
        &self,
        property: &ObjectProperty,
    ) -> BTreeSet<ObjectProperty> {
        self.referencing(property.clone().into(), move |a| match a {
            Axiom::SubObjectPropertyOf { sub, sup } if sub == property => Some(sup.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_sub_data_properties(&self, property: &DataProperty) -> BTreeSet<DataProperty> {
        self.referencing(property.clone().into(), move |a| match a {
            Axiom::SubDataPropertyOf { sub, sup } if sup == property => Some(sub.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_super_data_properties(&self, property: &DataProperty) -> BTreeSet<DataProperty> {
        self.referencing(property.clone().into(), move |a| match a {
            Axiom::SubDataPropertyOf { sub, sup } if sub == property => Some(sup.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn told_inverses(&self, property: &ObjectProperty) -> BTreeSet<ObjectProperty> {
        self.referencing(property.clone().into(), move |a| match a {
            Axiom::InverseObjectProperties(x, y) if x == property => Some(y.clone()),
            Axiom::InverseObjectProperties(x, y) if y == property => Some(x.clone()),
            _ => None,
        })
        .collect()
    }

    pub fn has_characteristic(
        &self,
        property: &ObjectProperty,
        characteristic: PropertyCharacteristic,
    ) -> bool {
        self.contains(&Axiom::ObjectPropertyCharacteristic {
            property: property.clone(),
            characteristic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EntityNamer;

    fn namer() -> EntityNamer {
        EntityNamer::new("http://ex.org/test")
    }

    fn onto() -> Ontology {
        Ontology::new(Iri::new("http://ex.org/test"))
    }

    #[test]
    fn add_and_remove_axiom_updates_signature() {
        let n = namer();
        let mut o = onto();
        let ax = Axiom::ClassAssertion {
            class: n.class("Cup"),
            individual: n.individual("cup1"),
        };
        assert!(o.add_axiom(ax.clone()));
        assert!(!o.add_axiom(ax.clone()));
        assert!(o.contains_entity(&n.individual("cup1").into()));
        assert_eq!(o.len(), 1);

        assert!(o.remove_axiom(&ax));
        assert!(!o.remove_axiom(&ax));
        assert!(!o.contains_entity(&n.individual("cup1").into()));
        assert!(o.is_empty());
    }

    #[test]
    fn create_entity_only_declares_new_entities() {
        let n = namer();
        let mut o = onto();
        assert!(o.create_entity(n.class("A").into()));
        assert!(!o.create_entity(n.class("A").into()));
        assert_eq!(o.len(), 1);
    }

    #[test]
    fn apply_counts_effective_changes_in_order() {
        let n = namer();
        let mut o = onto();
        let ax = Axiom::SubClassOf {
            sub: n.class("B"),
            sup: n.class("A"),
        };
        let changes = vec![
            ChangeDescriptor::AddAxiom(ax.clone()),
            ChangeDescriptor::AddAxiom(ax.clone()),
            ChangeDescriptor::RemoveAxiom(ax.clone()),
            ChangeDescriptor::AddAxiom(ax.clone()),
        ];
        assert_eq!(o.apply(&changes), 3);
        assert!(o.contains(&ax));
    }

    #[test]
    fn nary_axioms_are_order_insensitive() {
        let n = namer();
        let a = Axiom::DisjointClasses(n.classes(["A", "B"]));
        let b = Axiom::DisjointClasses(n.classes(["B", "A"]));
        assert_eq!(a, b);
        assert_eq!(
            Axiom::inverse_properties(n.object_property("p"), n.object_property("q")),
            Axiom::inverse_properties(n.object_property("q"), n.object_property("p"))
        );
    }

    #[test]
    fn renamed_replaces_only_matching_kind() {
        let n = namer();
        let ax = Axiom::ClassAssertion {
            class: n.class("x"),
            individual: n.individual("x"),
        };
        let renamed = ax.renamed(&n.individual("x").into(), &n.iri("y"));
        assert_eq!(
            renamed,
            Axiom::ClassAssertion {
                class: n.class("x"),
                individual: n.individual("y"),
            }
        );
    }

    #[test]
    fn told_lookups() {
        let n = namer();
        let mut o = onto();
        o.add_axiom(Axiom::SubClassOf {
            sub: n.class("B"),
            sup: n.class("A"),
        });
        o.add_axiom(Axiom::ClassAssertion {
            class: n.class("B"),
            individual: n.individual("b1"),
        });
        o.add_axiom(Axiom::ObjectPropertyAssertion {
            property: n.object_property("near"),
            subject: n.individual("b1"),
            object: n.individual("b2"),
        });
        o.add_axiom(Axiom::DataPropertyAssertion {
            property: n.data_property("weight"),
            subject: n.individual("b1"),
            value: 3.into(),
        });
        o.add_axiom(Axiom::DisjointClasses(n.classes(["A", "C", "D"])));

        assert_eq!(o.told_sub_classes(&n.class("A")), n.classes(["B"]));
        assert_eq!(o.told_super_classes(&n.class("B")), n.classes(["A"]));
        assert_eq!(o.told_types(&n.individual("b1")), n.classes(["B"]));
        assert_eq!(o.told_instances(&n.class("B")), n.individuals(["b1"]));
        assert_eq!(
            o.told_object_values(&n.individual("b1"), &n.object_property("near")),
            n.individuals(["b2"])
        );
        assert_eq!(
            o.told_data_values(&n.individual("b1"), &n.data_property("weight")),
            [Literal::from(3)].into_iter().collect()
        );
        assert_eq!(o.told_disjoint_classes(&n.class("A")), n.classes(["C", "D"]));
        assert_eq!(
            o.told_instances(&Class::thing()),
            n.individuals(["b1", "b2"])
        );
    }

    #[test]
    fn change_descriptor_display() {
        let n = namer();
        let c = ChangeDescriptor::AddAxiom(Axiom::SubClassOf {
            sub: n.class("B"),
            sup: n.class("A"),
        });
        assert_eq!(c.to_string(), "+ SubClassOf(B A)");
        assert!(c.is_addition());
    }
}
