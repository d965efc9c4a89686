//! Materialized view of an ontology that both engines answer queries from.
//!
//! [`Model::told`] closes only the asserted hierarchies. [`Model::saturate`]
//! also runs the individual-level rules to a fixpoint (sameAs merging,
//! property hierarchy, inverse, symmetric, transitive and reflexive
//! properties, functional and inverse-functional merging) and records every
//! contradiction it finds.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::entity::{Class, DataProperty, Individual, Literal, ObjectProperty};
use crate::ontology::{Axiom, Ontology, PropertyCharacteristic};

use super::taxonomy::Taxonomy;
use super::{Completeness, Conflict, ReasonerError, ReasonerResult};

type Edge = (Individual, ObjectProperty, Individual);

#[derive(Debug, Clone, Default)]
pub(crate) struct Model {
    saturated: bool,
    classes: Taxonomy<Class>,
    object_properties: Taxonomy<ObjectProperty>,
    data_properties: Taxonomy<DataProperty>,
    individuals: BTreeSet<Individual>,
    /// Individual → representative of its sameAs group.
    rep: HashMap<Individual, Individual>,
    /// Representative → every member of the group.
    groups: HashMap<Individual, BTreeSet<Individual>>,
    /// Representative → all of its types.
    types: HashMap<Individual, BTreeSet<Class>>,
    /// Outgoing object edges keyed by representative.
    object_values: HashMap<(Individual, ObjectProperty), BTreeSet<Individual>>,
    data_values: HashMap<(Individual, DataProperty), BTreeSet<Literal>>,
    told_same: HashMap<Individual, BTreeSet<Individual>>,
    told_different: HashMap<Individual, BTreeSet<Individual>>,
    told_disjoint: HashMap<Class, BTreeSet<Class>>,
    inverses: HashMap<ObjectProperty, BTreeSet<ObjectProperty>>,
    conflicts: Vec<Conflict>,
}

fn nary_map<T: Clone + Ord + std::hash::Hash>(
    sets: impl Iterator<Item = BTreeSet<T>>,
) -> HashMap<T, BTreeSet<T>> {
    let mut map: HashMap<T, BTreeSet<T>> = HashMap::new();
    for set in sets {
        for a in &set {
            let entry = map.entry(a.clone()).or_default();
            entry.extend(set.iter().filter(|b| *b != a).cloned());
        }
    }
    map
}

fn is_owl_builtin(class: &Class) -> bool {
    class.is_thing() || class.is_nothing()
}

/// Union-find over individuals; the smallest IRI represents a group.
struct SameAs {
    parent: BTreeMap<Individual, Individual>,
}

impl SameAs {
    fn new(individuals: &BTreeSet<Individual>) -> Self {
        Self {
            parent: individuals.iter().map(|i| (i.clone(), i.clone())).collect(),
        }
    }

    fn find(&mut self, i: &Individual) -> Individual {
        let mut root = i.clone();
        loop {
            let next = self.parent.entry(root.clone()).or_insert_with(|| root.clone()).clone();
            if next == root {
                break;
            }
            root = next;
        }
        // Path compression.
        let mut cursor = i.clone();
        while cursor != root {
            let next = self.parent[&cursor].clone();
            self.parent.insert(cursor, root.clone());
            cursor = next;
        }
        root
    }

    /// Returns `true` if the two were not yet in the same group.
    fn union(&mut self, a: &Individual, b: &Individual) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent.insert(child, root);
        true
    }
}

impl Model {
    fn taxonomies(
        ontology: &Ontology,
    ) -> (
        Taxonomy<Class>,
        Taxonomy<ObjectProperty>,
        Taxonomy<DataProperty>,
    ) {
        let mut class_edges = Vec::new();
        let mut class_equivs = Vec::new();
        let mut op_edges = Vec::new();
        let mut dp_edges = Vec::new();
        for axiom in ontology.axioms() {
            match axiom {
                Axiom::SubClassOf { sub, sup } => class_edges.push((sub.clone(), sup.clone())),
                Axiom::EquivalentClasses(set) => class_equivs.push(set.clone()),
                Axiom::SubObjectPropertyOf { sub, sup } => {
                    op_edges.push((sub.clone(), sup.clone()))
                }
                Axiom::SubDataPropertyOf { sub, sup } => dp_edges.push((sub.clone(), sup.clone())),
                _ => {}
            }
        }
        (
            Taxonomy::build(ontology.classes(), class_edges, class_equivs),
            Taxonomy::build(ontology.object_properties(), op_edges, Vec::new()),
            Taxonomy::build(ontology.data_properties(), dp_edges, Vec::new()),
        )
    }

    fn base(ontology: &Ontology, saturated: bool) -> Self {
        let (classes, object_properties, data_properties) = Self::taxonomies(ontology);
        let individuals = ontology.individuals();
        let told_same = nary_map(ontology.axioms().filter_map(|a| match a {
            Axiom::SameIndividual(s) => Some(s.clone()),
            _ => None,
        }));
        let told_different = nary_map(ontology.axioms().filter_map(|a| match a {
            Axiom::DifferentIndividuals(s) => Some(s.clone()),
            _ => None,
        }));
        let told_disjoint = nary_map(ontology.axioms().filter_map(|a| match a {
            Axiom::DisjointClasses(s) => Some(s.clone()),
            _ => None,
        }));
        let mut inverses: HashMap<ObjectProperty, BTreeSet<ObjectProperty>> = HashMap::new();
        for axiom in ontology.axioms() {
            if let Axiom::InverseObjectProperties(a, b) = axiom {
                inverses.entry(a.clone()).or_default().insert(b.clone());
                inverses.entry(b.clone()).or_default().insert(a.clone());
            }
        }
        Self {
            saturated,
            classes,
            object_properties,
            data_properties,
            individuals,
            told_same,
            told_different,
            told_disjoint,
            inverses,
            ..Self::default()
        }
    }

    /// Close the asserted hierarchies; individuals keep their told identity.
    pub fn told(ontology: &Ontology) -> Self {
        let mut model = Self::base(ontology, false);
        for i in &model.individuals {
            model.rep.insert(i.clone(), i.clone());
            model.groups.insert(i.clone(), BTreeSet::from([i.clone()]));
            model.types.insert(i.clone(), BTreeSet::new());
        }
        for axiom in ontology.axioms() {
            match axiom {
                Axiom::ClassAssertion { class, individual } => {
                    let closed = model.classes.supers_or_self(class);
                    model.types.entry(individual.clone()).or_default().extend(closed);
                }
                Axiom::ObjectPropertyAssertion {
                    property,
                    subject,
                    object,
                } => {
                    for q in model.object_properties.supers_or_self(property) {
                        model
                            .object_values
                            .entry((subject.clone(), q))
                            .or_default()
                            .insert(object.clone());
                    }
                }
                Axiom::DataPropertyAssertion {
                    property,
                    subject,
                    value,
                } => {
                    for q in model.data_properties.supers_or_self(property) {
                        model
                            .data_values
                            .entry((subject.clone(), q))
                            .or_default()
                            .insert(value.clone());
                    }
                }
                _ => {}
            }
        }
        model
    }

    /// Run every supported entailment rule to a fixpoint and check consistency.
    pub fn saturate(ontology: &Ontology) -> Self {
        let mut model = Self::base(ontology, true);

        let mut characteristics: HashMap<PropertyCharacteristic, BTreeSet<ObjectProperty>> =
            HashMap::new();
        let mut functional_data = BTreeSet::new();
        let mut told_edges: Vec<Edge> = Vec::new();
        let mut same = SameAs::new(&model.individuals);

        for axiom in ontology.axioms() {
            match axiom {
                Axiom::ObjectPropertyCharacteristic {
                    property,
                    characteristic,
                } => {
                    characteristics
                        .entry(*characteristic)
                        .or_default()
                        .insert(property.clone());
                }
                Axiom::FunctionalDataProperty(p) => {
                    functional_data.insert(p.clone());
                }
                Axiom::ObjectPropertyAssertion {
                    property,
                    subject,
                    object,
                } => told_edges.push((subject.clone(), property.clone(), object.clone())),
                Axiom::SameIndividual(set) => {
                    let mut it = set.iter();
                    if let Some(first) = it.next() {
                        for other in it {
                            same.union(first, other);
                        }
                    }
                }
                _ => {}
            }
        }
        let has = |c: PropertyCharacteristic, p: &ObjectProperty| {
            characteristics.get(&c).is_some_and(|s| s.contains(p))
        };

        // Edge closure, then merge individuals forced equal by (inverse)
        // functional properties, until nothing changes.
        let mut edges: BTreeSet<Edge>;
        loop {
            edges = told_edges
                .iter()
                .map(|(s, p, o)| (same.find(s), p.clone(), same.find(o)))
                .collect();
            let reps: BTreeSet<Individual> =
                model.individuals.iter().map(|i| same.find(i)).collect();
            model.close_edges(&mut edges, &reps, &has, &characteristics);

            let mut merged = false;
            let mut by_subject: BTreeMap<(&Individual, &ObjectProperty), Vec<&Individual>> =
                BTreeMap::new();
            let mut by_object: BTreeMap<(&Individual, &ObjectProperty), Vec<&Individual>> =
                BTreeMap::new();
            for (s, p, o) in &edges {
                if has(PropertyCharacteristic::Functional, p) {
                    by_subject.entry((s, p)).or_default().push(o);
                }
                if has(PropertyCharacteristic::InverseFunctional, p) {
                    by_object.entry((o, p)).or_default().push(s);
                }
            }
            for group in by_subject.values().chain(by_object.values()) {
                for other in &group[1..] {
                    merged |= same.union(group[0], other);
                }
            }
            if !merged {
                break;
            }
        }

        for i in &model.individuals {
            let r = same.find(i);
            model.rep.insert(i.clone(), r.clone());
            model.groups.entry(r.clone()).or_default().insert(i.clone());
            model.types.entry(r).or_default();
        }

        for (s, p, o) in &edges {
            model
                .object_values
                .entry((s.clone(), p.clone()))
                .or_default()
                .insert(o.clone());
        }

        for axiom in ontology.axioms() {
            match axiom {
                Axiom::ClassAssertion { class, individual } => {
                    let r = same.find(individual);
                    let closed = model.classes.supers_or_self(class);
                    model.types.entry(r).or_default().extend(closed);
                }
                Axiom::DataPropertyAssertion {
                    property,
                    subject,
                    value,
                } => {
                    let r = same.find(subject);
                    for q in model.data_properties.supers_or_self(property) {
                        model
                            .data_values
                            .entry((r.clone(), q))
                            .or_default()
                            .insert(value.clone());
                    }
                }
                _ => {}
            }
        }

        model.check(&edges, &functional_data, &has);
        model
    }

    fn close_edges(
        &self,
        edges: &mut BTreeSet<Edge>,
        reps: &BTreeSet<Individual>,
        has: &impl Fn(PropertyCharacteristic, &ObjectProperty) -> bool,
        characteristics: &HashMap<PropertyCharacteristic, BTreeSet<ObjectProperty>>,
    ) {
        if let Some(reflexive) = characteristics.get(&PropertyCharacteristic::Reflexive) {
            for p in reflexive {
                for r in reps {
                    edges.insert((r.clone(), p.clone(), r.clone()));
                }
            }
        }
        loop {
            let mut derived: Vec<Edge> = Vec::new();
            for (s, p, o) in edges.iter() {
                for q in self.object_properties.supers(p, Completeness::Transitive) {
                    derived.push((s.clone(), q, o.clone()));
                }
                for q in self.object_properties.equivalents(p) {
                    derived.push((s.clone(), q, o.clone()));
                }
                if let Some(inv) = self.inverses.get(p) {
                    for q in inv {
                        derived.push((o.clone(), q.clone(), s.clone()));
                    }
                }
                if has(PropertyCharacteristic::Symmetric, p) {
                    derived.push((o.clone(), p.clone(), s.clone()));
                }
            }
            if let Some(transitive) = characteristics.get(&PropertyCharacteristic::Transitive) {
                for p in transitive {
                    let mut next: HashMap<&Individual, Vec<&Individual>> = HashMap::new();
                    for (s, q, o) in edges.iter() {
                        if q == p {
                            next.entry(s).or_default().push(o);
                        }
                    }
                    for (s, mids) in &next {
                        for m in mids {
                            for o in next.get(m).into_iter().flatten() {
                                derived.push(((*s).clone(), p.clone(), (*o).clone()));
                            }
                        }
                    }
                }
            }
            let before = edges.len();
            edges.extend(derived);
            if edges.len() == before {
                break;
            }
        }
    }

    fn check(
        &mut self,
        edges: &BTreeSet<Edge>,
        functional_data: &BTreeSet<DataProperty>,
        has: &impl Fn(PropertyCharacteristic, &ObjectProperty) -> bool,
    ) {
        let mut conflicts = BTreeSet::new();

        let mut disjoint_pairs: BTreeSet<(&Class, &Class)> = BTreeSet::new();
        for (a, others) in &self.told_disjoint {
            for b in others {
                if a < b {
                    disjoint_pairs.insert((a, b));
                }
            }
        }
        for (r, types) in &self.types {
            if types.iter().any(|t| t.is_nothing()) {
                conflicts.insert(Conflict::MemberOfNothing {
                    individual: r.clone(),
                });
            }
            for (a, b) in &disjoint_pairs {
                if types.contains(*a) && types.contains(*b) {
                    conflicts.insert(Conflict::DisjointMembership {
                        individual: r.clone(),
                        first: (*a).clone(),
                        second: (*b).clone(),
                    });
                }
            }
        }

        for (a, others) in &self.told_different {
            for b in others {
                if a < b && self.rep.get(a) == self.rep.get(b) {
                    conflicts.insert(Conflict::SameAndDifferent {
                        first: a.clone(),
                        second: b.clone(),
                    });
                }
            }
        }

        for ((s, p), values) in &self.data_values {
            if values.len() > 1 && functional_data.contains(p) {
                conflicts.insert(Conflict::FunctionalDataProperty {
                    individual: s.clone(),
                    property: p.clone(),
                    values: values.clone(),
                });
            }
        }

        for (s, p, o) in edges {
            if s == o && has(PropertyCharacteristic::Irreflexive, p) {
                conflicts.insert(Conflict::IrreflexiveSelfLoop {
                    individual: s.clone(),
                    property: p.clone(),
                });
            }
            if has(PropertyCharacteristic::Asymmetric, p)
                && s <= o
                && edges.contains(&(o.clone(), p.clone(), s.clone()))
            {
                conflicts.insert(Conflict::AsymmetricPair {
                    property: p.clone(),
                    first: s.clone(),
                    second: o.clone(),
                });
            }
        }

        self.conflicts = conflicts.into_iter().collect();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    fn rep_of(&self, individual: &Individual) -> Option<&Individual> {
        self.rep.get(individual)
    }

    fn expand_group(&self, reps: impl IntoIterator<Item = Individual>) -> BTreeSet<Individual> {
        reps.into_iter()
            .flat_map(|r| match self.groups.get(&r) {
                Some(g) => g.iter().cloned().collect::<Vec<_>>(),
                None => vec![r],
            })
            .collect()
    }

    fn strip(classes: BTreeSet<Class>) -> BTreeSet<Class> {
        classes.into_iter().filter(|c| !is_owl_builtin(c)).collect()
    }

    fn most_specific(&self, types: &BTreeSet<Class>) -> BTreeSet<Class> {
        types
            .iter()
            .filter(|t| !types.iter().any(|s| self.classes.is_strict_sub(s, t)))
            .cloned()
            .collect()
    }

    pub fn types_of(&self, individual: &Individual, mode: Completeness) -> BTreeSet<Class> {
        let Some(types) = self.rep_of(individual).and_then(|r| self.types.get(r)) else {
            return BTreeSet::new();
        };
        let types = Self::strip(types.clone());
        match mode {
            Completeness::Transitive => types,
            Completeness::Direct => self.most_specific(&types),
        }
    }

    pub fn instances_of(&self, class: &Class, mode: Completeness) -> BTreeSet<Individual> {
        let reps = self.types.iter().filter(|(_, types)| {
            let types = Self::strip((*types).clone());
            if class.is_thing() {
                return !mode.is_direct() || types.is_empty();
            }
            if !types.contains(class) {
                return false;
            }
            !mode.is_direct() || self.most_specific(&types).contains(class)
        });
        self.expand_group(reps.map(|(r, _)| r.clone()))
    }

    pub fn object_property_values(
        &self,
        individual: &Individual,
        property: &ObjectProperty,
    ) -> BTreeSet<Individual> {
        let Some(r) = self.rep_of(individual) else {
            return BTreeSet::new();
        };
        let values = self
            .object_values
            .get(&(r.clone(), property.clone()))
            .cloned()
            .unwrap_or_default();
        self.expand_group(values)
    }

    pub fn data_property_values(
        &self,
        individual: &Individual,
        property: &DataProperty,
    ) -> BTreeSet<Literal> {
        self.rep_of(individual)
            .and_then(|r| self.data_values.get(&(r.clone(), property.clone())))
            .cloned()
            .unwrap_or_default()
    }

    pub fn sub_classes(&self, class: &Class, mode: Completeness) -> BTreeSet<Class> {
        if class.is_thing() {
            return Self::strip(match mode {
                Completeness::Direct => {
                    let mut roots = self.classes.roots();
                    roots.extend(self.classes.subs(class, Completeness::Direct));
                    roots
                }
                Completeness::Transitive => self.classes.items().cloned().collect(),
            });
        }
        Self::strip(self.classes.subs(class, mode))
    }

    pub fn super_classes(&self, class: &Class, mode: Completeness) -> BTreeSet<Class> {
        Self::strip(self.classes.supers(class, mode))
    }

    pub fn equivalent_classes(&self, class: &Class) -> BTreeSet<Class> {
        Self::strip(self.classes.equivalents(class))
    }

    pub fn disjoint_classes(&self, class: &Class) -> BTreeSet<Class> {
        if !self.saturated {
            return self.told_disjoint.get(class).cloned().unwrap_or_default();
        }
        // Everything below a class disjoint with the class or one of its supers.
        let mut out = BTreeSet::new();
        for sup in self.classes.supers_or_self(class) {
            for d in self.told_disjoint.get(&sup).into_iter().flatten() {
                out.extend(self.classes.subs_or_self(d));
            }
        }
        Self::strip(out)
    }

    pub fn sub_object_properties(
        &self,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> BTreeSet<ObjectProperty> {
        self.object_properties.subs(property, mode)
    }

    pub fn super_object_properties(
        &self,
        property: &ObjectProperty,
        mode: Completeness,
    ) -> BTreeSet<ObjectProperty> {
        self.object_properties.supers(property, mode)
    }

    pub fn sub_data_properties(
        &self,
        property: &DataProperty,
        mode: Completeness,
    ) -> BTreeSet<DataProperty> {
        self.data_properties.subs(property, mode)
    }

    pub fn super_data_properties(
        &self,
        property: &DataProperty,
        mode: Completeness,
    ) -> BTreeSet<DataProperty> {
        self.data_properties.supers(property, mode)
    }

    pub fn inverse_properties(&self, property: &ObjectProperty) -> BTreeSet<ObjectProperty> {
        self.inverses.get(property).cloned().unwrap_or_default()
    }

    pub fn same_individuals(&self, individual: &Individual) -> BTreeSet<Individual> {
        if !self.saturated {
            return self.told_same.get(individual).cloned().unwrap_or_default();
        }
        let Some(r) = self.rep_of(individual) else {
            return BTreeSet::new();
        };
        self.groups
            .get(r)
            .into_iter()
            .flatten()
            .filter(|i| *i != individual)
            .cloned()
            .collect()
    }

    pub fn different_individuals(&self, individual: &Individual) -> BTreeSet<Individual> {
        if !self.saturated {
            return self.told_different.get(individual).cloned().unwrap_or_default();
        }
        let Some(r) = self.rep_of(individual) else {
            return BTreeSet::new();
        };
        let mut reps = BTreeSet::new();
        for member in self.groups.get(r).into_iter().flatten() {
            for d in self.told_different.get(member).into_iter().flatten() {
                if let Some(dr) = self.rep_of(d) {
                    reps.insert(dr.clone());
                }
            }
        }
        // Instances of classes disjoint with one of our types are different too.
        for t in self.types.get(r).into_iter().flatten() {
            for d in self.disjoint_classes(t) {
                for other in self.instances_of(&d, Completeness::Transitive) {
                    if let Some(or) = self.rep_of(&other) {
                        reps.insert(or.clone());
                    }
                }
            }
        }
        reps.remove(r);
        self.expand_group(reps)
    }
}

// ---------------------------------------------------------------------------
// Snapshot management shared by the engines
// ---------------------------------------------------------------------------

/// A [`Model`] plus the buffering policy deciding when it is rebuilt.
pub(crate) struct Materialized {
    build: fn(&Ontology) -> Model,
    buffering: bool,
    model: Model,
    stale: bool,
}

impl Materialized {
    pub fn new(build: fn(&Ontology) -> Model, buffering: bool) -> Self {
        Self {
            build,
            buffering,
            model: Model::default(),
            stale: false,
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Buffering views only go stale; eager views rebuild and report clashes.
    pub fn changed(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        if self.buffering {
            self.stale = true;
            Ok(())
        } else {
            self.rebuild(ontology)
        }
    }

    pub fn rebuild(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        self.model = (self.build)(ontology);
        self.stale = false;
        if self.model.conflicts().is_empty() {
            Ok(())
        } else {
            Err(ReasonerError::InconsistentOntology)
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.model.conflicts().is_empty()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        self.model.conflicts().to_vec()
    }

    /// The model, or the inconsistency signal if it holds contradictions.
    pub fn view(&self) -> ReasonerResult<&Model> {
        if self.is_consistent() {
            Ok(&self.model)
        } else {
            Err(ReasonerError::InconsistentOntology)
        }
    }
}

/// Implements the query half of [`Reasoner`](super::Reasoner) for a type
/// with an `inner: Materialized` field.
macro_rules! delegate_model_queries {
    () => {
        fn is_consistent(&self) -> bool {
            self.inner.is_consistent()
        }

        fn instances_of(
            &self,
            class: &Class,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<Individual>> {
            Ok(self.inner.view()?.instances_of(class, mode))
        }

        fn types_of(
            &self,
            individual: &Individual,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<Class>> {
            Ok(self.inner.view()?.types_of(individual, mode))
        }

        fn object_property_values(
            &self,
            individual: &Individual,
            property: &ObjectProperty,
        ) -> ReasonerResult<BTreeSet<Individual>> {
            Ok(self.inner.view()?.object_property_values(individual, property))
        }

        fn data_property_values(
            &self,
            individual: &Individual,
            property: &DataProperty,
        ) -> ReasonerResult<BTreeSet<Literal>> {
            Ok(self.inner.view()?.data_property_values(individual, property))
        }

        fn sub_classes(&self, class: &Class, mode: Completeness) -> ReasonerResult<BTreeSet<Class>> {
            Ok(self.inner.view()?.sub_classes(class, mode))
        }

        fn super_classes(
            &self,
            class: &Class,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<Class>> {
            Ok(self.inner.view()?.super_classes(class, mode))
        }

        fn equivalent_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>> {
            Ok(self.inner.view()?.equivalent_classes(class))
        }

        fn disjoint_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>> {
            Ok(self.inner.view()?.disjoint_classes(class))
        }

        fn sub_object_properties(
            &self,
            property: &ObjectProperty,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
            Ok(self.inner.view()?.sub_object_properties(property, mode))
        }

        fn super_object_properties(
            &self,
            property: &ObjectProperty,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
            Ok(self.inner.view()?.super_object_properties(property, mode))
        }

        fn sub_data_properties(
            &self,
            property: &DataProperty,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<DataProperty>> {
            Ok(self.inner.view()?.sub_data_properties(property, mode))
        }

        fn super_data_properties(
            &self,
            property: &DataProperty,
            mode: Completeness,
        ) -> ReasonerResult<BTreeSet<DataProperty>> {
            Ok(self.inner.view()?.super_data_properties(property, mode))
        }

        fn inverse_properties(
            &self,
            property: &ObjectProperty,
        ) -> ReasonerResult<BTreeSet<ObjectProperty>> {
            Ok(self.inner.view()?.inverse_properties(property))
        }

        fn same_individuals(
            &self,
            individual: &Individual,
        ) -> ReasonerResult<BTreeSet<Individual>> {
            Ok(self.inner.view()?.same_individuals(individual))
        }

        fn different_individuals(
            &self,
            individual: &Individual,
        ) -> ReasonerResult<BTreeSet<Individual>> {
            Ok(self.inner.view()?.different_individuals(individual))
        }

        fn conflicts(&self) -> Vec<Conflict> {
            self.inner.conflicts()
        }
    };
}

pub(crate) use delegate_model_queries;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Iri;
    use crate::naming::EntityNamer;

    fn n() -> EntityNamer {
        EntityNamer::new("http://ex.org/m")
    }

    fn onto(axioms: impl IntoIterator<Item = Axiom>) -> Ontology {
        let mut o = Ontology::new(Iri::new("http://ex.org/m"));
        for a in axioms {
            o.add_axiom(a);
        }
        o
    }

    fn sub(a: &str, b: &str) -> Axiom {
        Axiom::SubClassOf {
            sub: n().class(a),
            sup: n().class(b),
        }
    }

    fn is_a(i: &str, c: &str) -> Axiom {
        Axiom::ClassAssertion {
            class: n().class(c),
            individual: n().individual(i),
        }
    }

    fn rel(s: &str, p: &str, o: &str) -> Axiom {
        Axiom::ObjectPropertyAssertion {
            property: n().object_property(p),
            subject: n().individual(s),
            object: n().individual(o),
        }
    }

    fn characteristic(p: &str, c: PropertyCharacteristic) -> Axiom {
        Axiom::ObjectPropertyCharacteristic {
            property: n().object_property(p),
            characteristic: c,
        }
    }

    #[test]
    fn types_inherit_along_taxonomy() {
        let o = onto([sub("Mug", "Cup"), sub("Cup", "Container"), is_a("m1", "Mug")]);
        let m = Model::saturate(&o);
        let n = n();
        assert_eq!(
            m.types_of(&n.individual("m1"), Completeness::Transitive),
            n.classes(["Mug", "Cup", "Container"])
        );
        assert_eq!(
            m.types_of(&n.individual("m1"), Completeness::Direct),
            n.classes(["Mug"])
        );
        assert_eq!(
            m.instances_of(&n.class("Container"), Completeness::Transitive),
            n.individuals(["m1"])
        );
        assert!(m.instances_of(&n.class("Container"), Completeness::Direct).is_empty());
        assert!(m.conflicts().is_empty());
    }

    #[test]
    fn property_rules_propagate_values() {
        let o = onto([
            rel("a", "partOf", "b"),
            rel("b", "partOf", "c"),
            characteristic("partOf", PropertyCharacteristic::Transitive),
            Axiom::inverse_properties(n().object_property("partOf"), n().object_property("hasPart")),
            Axiom::SubObjectPropertyOf {
                sub: n().object_property("partOf"),
                sup: n().object_property("relatedTo"),
            },
        ]);
        let m = Model::saturate(&o);
        let n = n();
        assert_eq!(
            m.object_property_values(&n.individual("a"), &n.object_property("partOf")),
            n.individuals(["b", "c"])
        );
        assert_eq!(
            m.object_property_values(&n.individual("c"), &n.object_property("hasPart")),
            n.individuals(["a", "b"])
        );
        assert_eq!(
            m.object_property_values(&n.individual("a"), &n.object_property("relatedTo")),
            n.individuals(["b", "c"])
        );
    }

    #[test]
    fn symmetric_property() {
        let o = onto([
            rel("a", "near", "b"),
            characteristic("near", PropertyCharacteristic::Symmetric),
        ]);
        let m = Model::saturate(&o);
        let n = n();
        assert_eq!(
            m.object_property_values(&n.individual("b"), &n.object_property("near")),
            n.individuals(["a"])
        );
    }

    #[test]
    fn functional_property_merges_values() {
        let o = onto([
            rel("a", "hasOwner", "bob"),
            rel("a", "hasOwner", "robert"),
            characteristic("hasOwner", PropertyCharacteristic::Functional),
            is_a("bob", "Person"),
        ]);
        let m = Model::saturate(&o);
        let n = n();
        assert_eq!(m.same_individuals(&n.individual("robert")), n.individuals(["bob"]));
        assert!(
            m.types_of(&n.individual("robert"), Completeness::Transitive)
                .contains(&n.class("Person"))
        );
    }

    #[test]
    fn disjoint_membership_is_a_conflict() {
        let o = onto([
            Axiom::DisjointClasses(n().classes(["Cat", "Dog"])),
            sub("Puppy", "Dog"),
            is_a("x", "Cat"),
            is_a("x", "Puppy"),
        ]);
        let m = Model::saturate(&o);
        assert_eq!(m.conflicts().len(), 1);
        assert!(matches!(
            m.conflicts()[0],
            Conflict::DisjointMembership { .. }
        ));
    }

    #[test]
    fn same_and_different_clash() {
        let n = n();
        let o = onto([
            Axiom::SameIndividual(n.individuals(["a", "b"])),
            Axiom::DifferentIndividuals(n.individuals(["a", "b"])),
        ]);
        let m = Model::saturate(&o);
        assert!(matches!(
            m.conflicts(),
            [Conflict::SameAndDifferent { .. }]
        ));
    }

    #[test]
    fn functional_data_property_with_two_values() {
        let n = n();
        let o = onto([
            Axiom::FunctionalDataProperty(n.data_property("age")),
            Axiom::DataPropertyAssertion {
                property: n.data_property("age"),
                subject: n.individual("a"),
                value: 3.into(),
            },
            Axiom::DataPropertyAssertion {
                property: n.data_property("age"),
                subject: n.individual("a"),
                value: 4.into(),
            },
        ]);
        let m = Model::saturate(&o);
        assert!(matches!(
            m.conflicts(),
            [Conflict::FunctionalDataProperty { .. }]
        ));
    }

    #[test]
    fn irreflexive_and_asymmetric() {
        let o = onto([
            rel("a", "parentOf", "a"),
            characteristic("parentOf", PropertyCharacteristic::Irreflexive),
            rel("x", "beats", "y"),
            rel("y", "beats", "x"),
            characteristic("beats", PropertyCharacteristic::Asymmetric),
        ]);
        let m = Model::saturate(&o);
        assert_eq!(m.conflicts().len(), 2);
    }

    #[test]
    fn disjoint_classes_reach_subclasses() {
        let n = n();
        let o = onto([
            Axiom::DisjointClasses(n.classes(["Animal", "Plant"])),
            sub("Dog", "Animal"),
            sub("Tree", "Plant"),
            is_a("rex", "Dog"),
            is_a("oak", "Tree"),
        ]);
        let m = Model::saturate(&o);
        assert_eq!(m.disjoint_classes(&n.class("Dog")), n.classes(["Plant", "Tree"]));
        assert_eq!(
            m.different_individuals(&n.individual("rex")),
            n.individuals(["oak"])
        );
        let told = Model::told(&o);
        assert!(told.disjoint_classes(&n.class("Dog")).is_empty());
    }

    #[test]
    fn thing_is_never_returned() {
        let n = n();
        let o = onto([sub("A", &format!("{}Thing", crate::entity::OWL_NS)), is_a("a", "A")]);
        let m = Model::saturate(&o);
        assert_eq!(m.super_classes(&n.class("A"), Completeness::Transitive), BTreeSet::new());
        assert_eq!(
            m.types_of(&n.individual("a"), Completeness::Transitive),
            n.classes(["A"])
        );
        assert_eq!(
            m.sub_classes(&Class::thing(), Completeness::Transitive),
            n.classes(["A"])
        );
    }

    #[test]
    fn told_model_does_not_merge() {
        let o = onto([
            rel("a", "hasOwner", "bob"),
            rel("a", "hasOwner", "robert"),
            characteristic("hasOwner", PropertyCharacteristic::Functional),
        ]);
        let m = Model::told(&o);
        let n = n();
        assert!(m.same_individuals(&n.individual("bob")).is_empty());
        assert!(m.conflicts().is_empty());
    }
}
