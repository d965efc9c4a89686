//! Reference coordinator: the public facade over one ontology and its reasoner.
//!
//! A [`Reference`] owns an [`Ontology`], the attached [`Reasoner`], and the
//! [`Enquirer`], [`Manipulator`] and [`ConsistencyMonitor`] working on them.
//! All of that state sits behind a single mutex, the reasoner lock. Every
//! call that reads or writes the store holds it for its whole duration, so
//! calls on one reference never overlap and observe a total order.
//!
//! Per-operation timing is recorded while the reasoner lock is held. The
//! statistics map has its own mutex which is only ever taken *after* the
//! reasoner lock, never before.
//!
//! Reasoner inconsistency signals stop here: reads answer with an empty set,
//! writes keep their effect on the store, and the monitor moves to
//! `Inconsistent`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::{CreateMode, ReferenceConfig};
use crate::consistency::{ConsistencyMonitor, ConsistencyState};
use crate::enquirer::Enquirer;
use crate::entity::{Class, DataProperty, Entity, Individual, Iri, Literal, ObjectProperty};
use crate::error::{AmorResult, OntologyError, RegistryError};
use crate::explain::ExplanationHook;
use crate::manipulator::{Manipulator, Submitted, changes};
use crate::naming::EntityNamer;
use crate::ontology::{Axiom, ChangeDescriptor, Ontology, PropertyCharacteristic};
use crate::reasoner::{Completeness, Reasoner, ReasonerError, ReasonerFactory, ReasonerResult};

/// Logical operation a coordinator call performs, used for lock timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Individuals,
    Types,
    PropertyValues,
    ClassHierarchy,
    PropertyHierarchy,
    Relations,
    EntityWrite,
    ClassMembership,
    PropertyAssertion,
    ClassAxiom,
    PropertyAxiom,
    IndividualAxiom,
    RawChanges,
    Flush,
    Synchronize,
    Save,
    Inspect,
    Dispose,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Individuals => "individuals",
            OperationKind::Types => "types",
            OperationKind::PropertyValues => "property_values",
            OperationKind::ClassHierarchy => "class_hierarchy",
            OperationKind::PropertyHierarchy => "property_hierarchy",
            OperationKind::Relations => "relations",
            OperationKind::EntityWrite => "entity_write",
            OperationKind::ClassMembership => "class_membership",
            OperationKind::PropertyAssertion => "property_assertion",
            OperationKind::ClassAxiom => "class_axiom",
            OperationKind::PropertyAxiom => "property_axiom",
            OperationKind::IndividualAxiom => "individual_axiom",
            OperationKind::RawChanges => "raw_changes",
            OperationKind::Flush => "flush",
            OperationKind::Synchronize => "synchronize",
            OperationKind::Save => "save",
            OperationKind::Inspect => "inspect",
            OperationKind::Dispose => "dispose",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated reasoner-lock timing for one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockStats {
    pub calls: u64,
    pub total_wait: Duration,
    pub total_hold: Duration,
    pub max_hold: Duration,
}

impl LockStats {
    fn record(&mut self, wait: Duration, hold: Duration) {
        self.calls += 1;
        self.total_wait += wait;
        self.total_hold += hold;
        self.max_hold = self.max_hold.max(hold);
    }

    pub fn mean_hold(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            let mean = self.total_hold.as_nanos() / u128::from(self.calls);
            Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX))
        }
    }
}

/// Everything guarded by the reasoner lock.
struct ReferenceState {
    ontology: Ontology,
    reasoner: Box<dyn Reasoner>,
    enquirer: Enquirer,
    manipulator: Manipulator,
    monitor: ConsistencyMonitor,
}

impl ReferenceState {
    /// Turn a reasoner error into the consistency transition.
    fn absorb(&mut self, reference: &str, err: ReasonerError) {
        match err {
            ReasonerError::InconsistentOntology => {
                self.monitor
                    .notify_inconsistent(&self.ontology, self.reasoner.as_ref());
            }
            other => {
                tracing::error!(reference, error = %other, "reasoner call failed");
            }
        }
    }

    fn synchronize(&mut self) -> ConsistencyState {
        self.monitor.synchronize(
            &mut self.ontology,
            self.reasoner.as_mut(),
            &mut self.manipulator,
        )
    }
}

/// A named handle to one ontology and its reasoner, safe to share across threads.
pub struct Reference {
    name: String,
    config: ReferenceConfig,
    namer: EntityNamer,
    state: Mutex<Option<ReferenceState>>,
    stats: Mutex<BTreeMap<OperationKind, LockStats>>,
}

impl Reference {
    /// Build the ontology described by `config` and attach its reasoner.
    ///
    /// The reasoner is created before anything is loaded, so an unknown key
    /// fails fast. The new reference is synchronized once before returning.
    pub fn open(
        name: impl Into<String>,
        config: ReferenceConfig,
        factory: &ReasonerFactory,
    ) -> AmorResult<Self> {
        let name = name.into();
        config.validate()?;
        if config.ontology_iri.contains(char::is_whitespace) || config.ontology_iri.contains('<') {
            return Err(OntologyError::InvalidIri {
                iri: config.ontology_iri.clone(),
            }
            .into());
        }

        let reasoner = factory.create(&config.reasoner, config.buffering_reasoner)?;
        let namer = EntityNamer::new(&config.ontology_iri);
        let iri = namer.ontology_iri().clone();
        let ontology = match config.mode {
            CreateMode::Create => Ontology::new(iri),
            CreateMode::LoadFromFile => {
                let path = config
                    .file_path
                    .as_deref()
                    .ok_or_else(|| OntologyError::NoPath {
                        reference: name.clone(),
                    })?;
                Ontology::load(iri, path)?
            }
            CreateMode::LoadFromWeb => Ontology::load_from_web(iri, config.web_source(), config.web_timeout())?,
        };

        let mut state = ReferenceState {
            ontology,
            reasoner,
            enquirer: Enquirer::new(config.include_inferences, config.completeness),
            manipulator: Manipulator::new(config.buffering_manipulator),
            monitor: ConsistencyMonitor::new(name.clone()),
        };
        let verdict = state.synchronize();

        tracing::info!(
            reference = %name,
            reasoner = state.reasoner.name(),
            mode = ?config.mode,
            axioms = state.ontology.len(),
            consistency = %verdict,
            "reference created"
        );

        Ok(Self {
            name,
            config,
            namer,
            state: Mutex::new(Some(state)),
            stats: Mutex::new(BTreeMap::new()),
        })
    }

    // -----------------------------------------------------------------------
    // Locking
    // -----------------------------------------------------------------------

    /// Run `f` under the reasoner lock, recording timing for `kind`.
    ///
    /// Returns `None` once the reference has been disposed.
    fn locked<T>(&self, kind: OperationKind, f: impl FnOnce(&mut ReferenceState) -> T) -> Option<T> {
        let requested = Instant::now();
        let mut guard = self.state.lock().expect("reasoner lock poisoned");
        let acquired = Instant::now();
        let out = match guard.as_mut() {
            Some(state) => Some(f(state)),
            None => {
                tracing::warn!(reference = %self.name, %kind, "call on disposed reference");
                None
            }
        };
        self.record(kind, acquired - requested, acquired.elapsed());
        out
    }

    fn record(&self, kind: OperationKind, wait: Duration, hold: Duration) {
        let threshold = Duration::from_nanos(self.config.lock_log_threshold_ns);
        if wait > threshold || hold > threshold {
            tracing::debug!(
                reference = %self.name,
                %kind,
                wait_ns = wait.as_nanos() as u64,
                hold_ns = hold.as_nanos() as u64,
                "reasoner lock timing"
            );
        }
        self.stats
            .lock()
            .expect("lock stats poisoned")
            .entry(kind)
            .or_default()
            .record(wait, hold);
    }

    /// A read: empty answer on inconsistency or after disposal.
    fn read<T: Default>(
        &self,
        kind: OperationKind,
        f: impl FnOnce(&Enquirer, &Ontology, &dyn Reasoner) -> ReasonerResult<T>,
    ) -> T {
        self.locked(kind, |s| {
            match f(&s.enquirer, &s.ontology, s.reasoner.as_ref()) {
                Ok(answer) => answer,
                Err(err) => {
                    s.absorb(&self.name, err);
                    T::default()
                }
            }
        })
        .unwrap_or_default()
    }

    /// A write: builds its changes against the store with pending buffered
    /// changes applied, then applies or buffers them. Returns the changes
    /// that were submitted.
    fn write(
        &self,
        kind: OperationKind,
        build: impl FnOnce(&Ontology) -> Vec<ChangeDescriptor>,
    ) -> Vec<ChangeDescriptor> {
        self.locked(kind, |s| {
            let changes = build(&*s.manipulator.projected(&s.ontology));
            match s
                .manipulator
                .submit(&mut s.ontology, s.reasoner.as_mut(), changes.clone())
            {
                Ok(Submitted::Applied { effective }) => {
                    tracing::trace!(reference = %self.name, %kind, effective, "changes applied");
                }
                Ok(Submitted::Buffered { pending }) => {
                    tracing::trace!(reference = %self.name, %kind, pending, "changes buffered");
                }
                Err(err) => s.absorb(&self.name, err),
            }
            changes
        })
        .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Identity and settings
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    /// Facade resolving names against this ontology's IRI.
    pub fn namer(&self) -> &EntityNamer {
        &self.namer
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().expect("reasoner lock poisoned").is_none()
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency_state().is_consistent()
    }

    /// Disposed references report `Consistent`.
    pub fn consistency_state(&self) -> ConsistencyState {
        self.locked(OperationKind::Inspect, |s| s.monitor.state())
            .unwrap_or_default()
    }

    /// Text from the explanation hook for the current inconsistency, if any.
    pub fn last_explanation(&self) -> Option<String> {
        self.locked(OperationKind::Inspect, |s| {
            s.monitor.last_explanation().map(str::to_owned)
        })
        .flatten()
    }

    pub fn set_explanation_hook(&self, hook: Arc<dyn ExplanationHook>) {
        self.locked(OperationKind::Inspect, |s| s.monitor.set_hook(hook));
    }

    pub fn reasoner_name(&self) -> Option<String> {
        self.locked(OperationKind::Inspect, |s| s.reasoner.name().to_owned())
    }

    pub fn completeness(&self) -> Completeness {
        self.locked(OperationKind::Inspect, |s| s.enquirer.completeness())
            .unwrap_or_default()
    }

    pub fn set_completeness(&self, completeness: Completeness) {
        self.locked(OperationKind::Inspect, |s| {
            s.enquirer.set_completeness(completeness)
        });
    }

    pub fn includes_inferences(&self) -> bool {
        self.locked(OperationKind::Inspect, |s| s.enquirer.includes_inferences())
            .unwrap_or(false)
    }

    pub fn set_include_inferences(&self, include: bool) {
        self.locked(OperationKind::Inspect, |s| {
            s.enquirer.set_include_inferences(include)
        });
    }

    pub fn is_buffering(&self) -> bool {
        self.locked(OperationKind::Inspect, |s| s.manipulator.is_buffering())
            .unwrap_or(false)
    }

    /// Switch the manipulator between buffered and immediate mode.
    /// Pending changes stay buffered until the next flush.
    pub fn set_buffering(&self, buffering: bool) {
        self.locked(OperationKind::Inspect, |s| {
            s.manipulator.set_buffering(buffering)
        });
    }

    pub fn buffered_changes(&self) -> Vec<ChangeDescriptor> {
        self.locked(OperationKind::Inspect, |s| {
            s.manipulator.buffered_changes().to_vec()
        })
        .unwrap_or_default()
    }

    pub fn axiom_count(&self) -> usize {
        self.locked(OperationKind::Inspect, |s| s.ontology.len())
            .unwrap_or(0)
    }

    /// A copy of the asserted ontology.
    pub fn ontology_snapshot(&self) -> Option<Ontology> {
        self.locked(OperationKind::Inspect, |s| s.ontology.clone())
    }

    /// Reasoner-lock timing per operation kind.
    pub fn lock_stats(&self) -> BTreeMap<OperationKind, LockStats> {
        self.stats.lock().expect("lock stats poisoned").clone()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn individuals_of_thing(&self) -> BTreeSet<Individual> {
        self.read(OperationKind::Individuals, |e, o, r| {
            e.individuals_of_thing(o, r)
        })
    }

    pub fn individuals_of(&self, class: &str) -> BTreeSet<Individual> {
        let class = self.namer.class(class);
        self.read(OperationKind::Individuals, |e, o, r| {
            e.individuals_of(o, r, &class, e.completeness())
        })
    }

    pub fn individuals_of_with(&self, class: &str, mode: Completeness) -> BTreeSet<Individual> {
        let class = self.namer.class(class);
        self.read(OperationKind::Individuals, |e, o, r| {
            e.individuals_of(o, r, &class, mode)
        })
    }

    pub fn only_individual_of(&self, class: &str) -> Option<Individual> {
        let class = self.namer.class(class);
        self.read(OperationKind::Individuals, |e, o, r| {
            e.only_individual_of(o, r, &class, e.completeness())
        })
    }

    pub fn types_of(&self, individual: &str) -> BTreeSet<Class> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Types, |e, o, r| {
            e.types_of(o, r, &individual, e.completeness())
        })
    }

    pub fn types_of_with(&self, individual: &str, mode: Completeness) -> BTreeSet<Class> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Types, |e, o, r| {
            e.types_of(o, r, &individual, mode)
        })
    }

    pub fn only_type_of(&self, individual: &str) -> Option<Class> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Types, |e, o, r| {
            e.only_type_of(o, r, &individual, e.completeness())
        })
    }

    pub fn bottom_types_of(&self, individual: &str) -> BTreeSet<Class> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Types, |e, o, r| {
            e.bottom_types_of(o, r, &individual)
        })
    }

    pub fn only_bottom_type_of(&self, individual: &str) -> Option<Class> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Types, |e, o, r| {
            e.only_bottom_type_of(o, r, &individual)
        })
    }

    pub fn object_property_values(&self, individual: &str, property: &str) -> BTreeSet<Individual> {
        let individual = self.namer.individual(individual);
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.object_property_values(o, r, &individual, &property)
        })
    }

    pub fn only_object_property_value(&self, individual: &str, property: &str) -> Option<Individual> {
        let individual = self.namer.individual(individual);
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.only_object_property_value(o, r, &individual, &property)
        })
    }

    pub fn data_property_values(&self, individual: &str, property: &str) -> BTreeSet<Literal> {
        let individual = self.namer.individual(individual);
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.data_property_values(o, r, &individual, &property)
        })
    }

    pub fn only_data_property_value(&self, individual: &str, property: &str) -> Option<Literal> {
        let individual = self.namer.individual(individual);
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.only_data_property_value(o, r, &individual, &property)
        })
    }

    pub fn object_properties_of(
        &self,
        individual: &str,
    ) -> BTreeMap<ObjectProperty, BTreeSet<Individual>> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.object_properties_of(o, r, &individual)
        })
    }

    pub fn data_properties_of(&self, individual: &str) -> BTreeMap<DataProperty, BTreeSet<Literal>> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::PropertyValues, |e, o, r| {
            e.data_properties_of(o, r, &individual)
        })
    }

    pub fn sub_classes_of(&self, class: &str) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::ClassHierarchy, |e, o, r| {
            e.sub_classes_of(o, r, &class, e.completeness())
        })
    }

    pub fn sub_classes_of_with(&self, class: &str, mode: Completeness) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::ClassHierarchy, |e, o, r| {
            e.sub_classes_of(o, r, &class, mode)
        })
    }

    pub fn super_classes_of(&self, class: &str) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::ClassHierarchy, |e, o, r| {
            e.super_classes_of(o, r, &class, e.completeness())
        })
    }

    pub fn super_classes_of_with(&self, class: &str, mode: Completeness) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::ClassHierarchy, |e, o, r| {
            e.super_classes_of(o, r, &class, mode)
        })
    }

    pub fn equivalent_classes_of(&self, class: &str) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::Relations, |e, o, r| {
            e.equivalent_classes_of(o, r, &class)
        })
    }

    pub fn disjoint_classes_of(&self, class: &str) -> BTreeSet<Class> {
        let class = self.namer.class(class);
        self.read(OperationKind::Relations, |e, o, r| {
            e.disjoint_classes_of(o, r, &class)
        })
    }

    pub fn equivalent_individuals_of(&self, individual: &str) -> BTreeSet<Individual> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Relations, |e, o, r| {
            e.equivalent_individuals_of(o, r, &individual)
        })
    }

    pub fn disjoint_individuals_of(&self, individual: &str) -> BTreeSet<Individual> {
        let individual = self.namer.individual(individual);
        self.read(OperationKind::Relations, |e, o, r| {
            e.disjoint_individuals_of(o, r, &individual)
        })
    }

    pub fn inverse_properties_of(&self, property: &str) -> BTreeSet<ObjectProperty> {
        let property = self.namer.object_property(property);
        self.read(OperationKind::Relations, |e, o, r| {
            e.inverse_properties_of(o, r, &property)
        })
    }

    pub fn sub_object_properties_of(&self, property: &str) -> BTreeSet<ObjectProperty> {
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.sub_object_properties_of(o, r, &property, e.completeness())
        })
    }

    pub fn sub_object_properties_of_with(
        &self,
        property: &str,
        mode: Completeness,
    ) -> BTreeSet<ObjectProperty> {
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.sub_object_properties_of(o, r, &property, mode)
        })
    }

    pub fn super_object_properties_of(&self, property: &str) -> BTreeSet<ObjectProperty> {
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.super_object_properties_of(o, r, &property, e.completeness())
        })
    }

    pub fn super_object_properties_of_with(
        &self,
        property: &str,
        mode: Completeness,
    ) -> BTreeSet<ObjectProperty> {
        let property = self.namer.object_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.super_object_properties_of(o, r, &property, mode)
        })
    }

    pub fn sub_data_properties_of(&self, property: &str) -> BTreeSet<DataProperty> {
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.sub_data_properties_of(o, r, &property, e.completeness())
        })
    }

    pub fn sub_data_properties_of_with(
        &self,
        property: &str,
        mode: Completeness,
    ) -> BTreeSet<DataProperty> {
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.sub_data_properties_of(o, r, &property, mode)
        })
    }

    pub fn super_data_properties_of(&self, property: &str) -> BTreeSet<DataProperty> {
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.super_data_properties_of(o, r, &property, e.completeness())
        })
    }

    pub fn super_data_properties_of_with(
        &self,
        property: &str,
        mode: Completeness,
    ) -> BTreeSet<DataProperty> {
        let property = self.namer.data_property(property);
        self.read(OperationKind::PropertyHierarchy, |e, o, r| {
            e.super_data_properties_of(o, r, &property, mode)
        })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub fn add_individual(&self, individual: &str) -> Vec<ChangeDescriptor> {
        let individual = self.namer.individual(individual);
        self.write(OperationKind::EntityWrite, |_| {
            changes::add_individual(individual)
        })
    }

    pub fn remove_individual(&self, individual: &str) -> Vec<ChangeDescriptor> {
        let individual = self.namer.individual(individual);
        self.write(OperationKind::EntityWrite, |o| {
            changes::remove_individual(o, &individual)
        })
    }

    pub fn add_class(&self, class: &str) -> Vec<ChangeDescriptor> {
        let class = self.namer.class(class);
        self.write(OperationKind::EntityWrite, |_| changes::add_class(class))
    }

    pub fn remove_class(&self, class: &str) -> Vec<ChangeDescriptor> {
        let class = self.namer.class(class);
        self.write(OperationKind::EntityWrite, |o| {
            changes::remove_class(o, &class)
        })
    }

    /// Remove every axiom referencing the entity.
    pub fn remove_entity(&self, entity: &Entity) -> Vec<ChangeDescriptor> {
        self.write(OperationKind::EntityWrite, |o| {
            changes::remove_entity(o, entity)
        })
    }

    /// Give an entity a new name within this ontology (or a new absolute IRI).
    pub fn rename_entity(&self, entity: &Entity, new_name: &str) -> Vec<ChangeDescriptor> {
        let to = self.namer.iri(new_name);
        self.write(OperationKind::EntityWrite, |o| {
            changes::rename_entity(o, entity, &to)
        })
    }

    pub fn rename_entity_to_iri(&self, entity: &Entity, to: &Iri) -> Vec<ChangeDescriptor> {
        self.write(OperationKind::EntityWrite, |o| {
            changes::rename_entity(o, entity, to)
        })
    }

    pub fn rename_individual(&self, old: &str, new: &str) -> Vec<ChangeDescriptor> {
        self.rename_entity(&self.namer.individual(old).into(), new)
    }

    pub fn rename_class(&self, old: &str, new: &str) -> Vec<ChangeDescriptor> {
        self.rename_entity(&self.namer.class(old).into(), new)
    }

    pub fn add_sub_class(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let (sub, sup) = (self.namer.class(sub), self.namer.class(sup));
        self.write(OperationKind::ClassAxiom, |_| changes::add_sub_class(sub, sup))
    }

    pub fn remove_sub_class(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let (sub, sup) = (self.namer.class(sub), self.namer.class(sup));
        self.write(OperationKind::ClassAxiom, |_| {
            changes::remove_sub_class(sub, sup)
        })
    }

    pub fn add_individual_to_class(&self, individual: &str, class: &str) -> Vec<ChangeDescriptor> {
        let individual = self.namer.individual(individual);
        let class = self.namer.class(class);
        self.write(OperationKind::ClassMembership, |_| {
            changes::add_class_assertion(individual, class)
        })
    }

    pub fn remove_individual_from_class(&self, individual: &str, class: &str) -> Vec<ChangeDescriptor> {
        let individual = self.namer.individual(individual);
        let class = self.namer.class(class);
        self.write(OperationKind::ClassMembership, |_| {
            changes::remove_class_assertion(individual, class)
        })
    }

    /// Move an individual between classes; without `old`, every asserted
    /// type is dropped.
    pub fn replace_individual_class(
        &self,
        individual: &str,
        old: Option<&str>,
        new: &str,
    ) -> Vec<ChangeDescriptor> {
        let individual = self.namer.individual(individual);
        let old = old.map(|c| self.namer.class(c));
        let new = self.namer.class(new);
        self.write(OperationKind::ClassMembership, |o| {
            changes::replace_individual_class(o, &individual, old.as_ref(), new)
        })
    }

    pub fn add_object_property(&self, subject: &str, property: &str, object: &str) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.object_property(property);
        let object = self.namer.individual(object);
        self.write(OperationKind::PropertyAssertion, |_| {
            changes::add_object_property_value(subject, property, object)
        })
    }

    pub fn remove_object_property(
        &self,
        subject: &str,
        property: &str,
        object: &str,
    ) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.object_property(property);
        let object = self.namer.individual(object);
        self.write(OperationKind::PropertyAssertion, |_| {
            changes::remove_object_property_value(subject, property, object)
        })
    }

    /// Swap an object property value; without `old`, every asserted value is replaced.
    pub fn replace_object_property(
        &self,
        subject: &str,
        property: &str,
        old: Option<&str>,
        new: &str,
    ) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.object_property(property);
        let old = old.map(|i| self.namer.individual(i));
        let new = self.namer.individual(new);
        self.write(OperationKind::PropertyAssertion, |o| {
            changes::replace_object_property_value(o, &subject, &property, old.as_ref(), new)
        })
    }

    pub fn add_data_property(
        &self,
        subject: &str,
        property: &str,
        value: impl Into<Literal>,
    ) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.data_property(property);
        let value = value.into();
        self.write(OperationKind::PropertyAssertion, |_| {
            changes::add_data_property_value(subject, property, value)
        })
    }

    pub fn remove_data_property(
        &self,
        subject: &str,
        property: &str,
        value: impl Into<Literal>,
    ) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.data_property(property);
        let value = value.into();
        self.write(OperationKind::PropertyAssertion, |_| {
            changes::remove_data_property_value(subject, property, value)
        })
    }

    /// Swap a data property value; without `old`, every asserted value is replaced.
    pub fn replace_data_property(
        &self,
        subject: &str,
        property: &str,
        old: Option<Literal>,
        new: impl Into<Literal>,
    ) -> Vec<ChangeDescriptor> {
        let subject = self.namer.individual(subject);
        let property = self.namer.data_property(property);
        let new = new.into();
        self.write(OperationKind::PropertyAssertion, |o| {
            changes::replace_data_property_value(o, &subject, &property, old.as_ref(), new)
        })
    }

    pub fn add_sub_object_property(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let sub = self.namer.object_property(sub);
        let sup = self.namer.object_property(sup);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::add_sub_object_property(sub, sup)
        })
    }

    pub fn remove_sub_object_property(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let sub = self.namer.object_property(sub);
        let sup = self.namer.object_property(sup);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::remove_sub_object_property(sub, sup)
        })
    }

    pub fn add_sub_data_property(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let sub = self.namer.data_property(sub);
        let sup = self.namer.data_property(sup);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::add_sub_data_property(sub, sup)
        })
    }

    pub fn remove_sub_data_property(&self, sub: &str, sup: &str) -> Vec<ChangeDescriptor> {
        let sub = self.namer.data_property(sub);
        let sup = self.namer.data_property(sup);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::remove_sub_data_property(sub, sup)
        })
    }

    pub fn add_inverse_properties(&self, a: &str, b: &str) -> Vec<ChangeDescriptor> {
        let a = self.namer.object_property(a);
        let b = self.namer.object_property(b);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::add_inverse_properties(a, b)
        })
    }

    pub fn remove_inverse_properties(&self, a: &str, b: &str) -> Vec<ChangeDescriptor> {
        let a = self.namer.object_property(a);
        let b = self.namer.object_property(b);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::remove_inverse_properties(a, b)
        })
    }

    pub fn add_object_property_characteristic(
        &self,
        property: &str,
        characteristic: PropertyCharacteristic,
    ) -> Vec<ChangeDescriptor> {
        let property = self.namer.object_property(property);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::add_object_property_characteristic(property, characteristic)
        })
    }

    pub fn remove_object_property_characteristic(
        &self,
        property: &str,
        characteristic: PropertyCharacteristic,
    ) -> Vec<ChangeDescriptor> {
        let property = self.namer.object_property(property);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::remove_object_property_characteristic(property, characteristic)
        })
    }

    pub fn add_functional_data_property(&self, property: &str) -> Vec<ChangeDescriptor> {
        let property = self.namer.data_property(property);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::add_functional_data_property(property)
        })
    }

    pub fn remove_functional_data_property(&self, property: &str) -> Vec<ChangeDescriptor> {
        let property = self.namer.data_property(property);
        self.write(OperationKind::PropertyAxiom, |_| {
            changes::remove_functional_data_property(property)
        })
    }

    pub fn make_disjoint_classes(&self, classes: &[&str]) -> Vec<ChangeDescriptor> {
        let classes = self.namer.classes(classes.iter().copied());
        self.write(OperationKind::ClassAxiom, |_| {
            changes::make_disjoint_classes(classes)
        })
    }

    pub fn remove_disjoint_classes(&self, classes: &[&str]) -> Vec<ChangeDescriptor> {
        let classes = self.namer.classes(classes.iter().copied());
        self.write(OperationKind::ClassAxiom, |_| {
            changes::remove_disjoint_classes(classes)
        })
    }

    pub fn make_equivalent_classes(&self, classes: &[&str]) -> Vec<ChangeDescriptor> {
        let classes = self.namer.classes(classes.iter().copied());
        self.write(OperationKind::ClassAxiom, |_| {
            changes::make_equivalent_classes(classes)
        })
    }

    pub fn remove_equivalent_classes(&self, classes: &[&str]) -> Vec<ChangeDescriptor> {
        let classes = self.namer.classes(classes.iter().copied());
        self.write(OperationKind::ClassAxiom, |_| {
            changes::remove_equivalent_classes(classes)
        })
    }

    pub fn make_disjoint_individuals(&self, individuals: &[&str]) -> Vec<ChangeDescriptor> {
        let individuals = self.namer.individuals(individuals.iter().copied());
        self.write(OperationKind::IndividualAxiom, |_| {
            changes::make_disjoint_individuals(individuals)
        })
    }

    pub fn remove_disjoint_individuals(&self, individuals: &[&str]) -> Vec<ChangeDescriptor> {
        let individuals = self.namer.individuals(individuals.iter().copied());
        self.write(OperationKind::IndividualAxiom, |_| {
            changes::remove_disjoint_individuals(individuals)
        })
    }

    pub fn make_equivalent_individuals(&self, individuals: &[&str]) -> Vec<ChangeDescriptor> {
        let individuals = self.namer.individuals(individuals.iter().copied());
        self.write(OperationKind::IndividualAxiom, |_| {
            changes::make_equivalent_individuals(individuals)
        })
    }

    pub fn remove_equivalent_individuals(&self, individuals: &[&str]) -> Vec<ChangeDescriptor> {
        let individuals = self.namer.individuals(individuals.iter().copied());
        self.write(OperationKind::IndividualAxiom, |_| {
            changes::remove_equivalent_individuals(individuals)
        })
    }

    pub fn apply_axiom(&self, axiom: Axiom) -> Vec<ChangeDescriptor> {
        self.write(OperationKind::RawChanges, |_| changes::add_axiom(axiom))
    }

    pub fn remove_axiom(&self, axiom: Axiom) -> Vec<ChangeDescriptor> {
        self.write(OperationKind::RawChanges, |_| changes::remove_axiom(axiom))
    }

    /// Submit a prepared change list, honoring the buffering mode.
    pub fn apply_changes(&self, changes: Vec<ChangeDescriptor>) -> Vec<ChangeDescriptor> {
        self.write(OperationKind::RawChanges, |_| changes)
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    /// Apply every buffered change. Returns how many changed the store.
    pub fn flush(&self) -> usize {
        self.locked(OperationKind::Flush, |s| {
            match s.manipulator.flush(&mut s.ontology, s.reasoner.as_mut()) {
                Ok(effective) => effective,
                Err(err) => {
                    s.absorb(&self.name, err);
                    0
                }
            }
        })
        .unwrap_or(0)
    }

    /// Flush, re-classify and update the consistency state.
    ///
    /// While inconsistent this only re-checks the current store; buffered
    /// compensating writes need a [`flush`](Self::flush) first.
    pub fn synchronize(&self) -> ConsistencyState {
        self.locked(OperationKind::Synchronize, |s| s.synchronize())
            .unwrap_or_default()
    }

    /// Apply `changes` and synchronize under one lock acquisition.
    pub fn synchronize_with(&self, changes: Vec<ChangeDescriptor>) -> ConsistencyState {
        self.locked(OperationKind::Synchronize, |s| {
            s.monitor
                .synchronize_with(&mut s.ontology, s.reasoner.as_mut(), &changes)
        })
        .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Persistence and teardown
    // -----------------------------------------------------------------------

    fn target_path(&self, path: Option<&Path>) -> AmorResult<PathBuf> {
        path.map(Path::to_path_buf)
            .or_else(|| self.config.file_path.clone())
            .ok_or_else(|| {
                OntologyError::NoPath {
                    reference: self.name.clone(),
                }
                .into()
            })
    }

    fn disposed_error(&self) -> crate::error::AmorError {
        RegistryError::NotFound {
            name: self.name.clone(),
        }
        .into()
    }

    /// Write the asserted ontology to `path`, or to the configured file.
    pub fn save(&self, path: Option<&Path>) -> AmorResult<()> {
        let path = self.target_path(path)?;
        self.locked(OperationKind::Save, |s| s.ontology.save(&path))
            .ok_or_else(|| self.disposed_error())??;
        Ok(())
    }

    /// Write the ontology with the reasoner's inferences added as assertions.
    ///
    /// Returns `false` without writing when the reasoner reports the ontology
    /// inconsistent.
    pub fn save_with_inferences(&self, path: Option<&Path>) -> AmorResult<bool> {
        let path = self.target_path(path)?;
        let exported = self
            .locked(OperationKind::Save, |s| {
                match export_inferences(&s.ontology, s.reasoner.as_ref()) {
                    Ok(exported) => Some(exported),
                    Err(err) => {
                        s.absorb(&self.name, err);
                        None
                    }
                }
            })
            .ok_or_else(|| self.disposed_error())?;
        match exported {
            Some(ontology) => {
                ontology.save(&path)?;
                Ok(true)
            }
            None => {
                tracing::warn!(reference = %self.name, "inconsistent ontology not exported");
                Ok(false)
            }
        }
    }

    /// Tear down the ontology and reasoner.
    ///
    /// Waits for the call holding the reasoner lock, if any, to finish. Later
    /// calls find no state: reads answer empty and writes do nothing.
    pub fn dispose(&self) {
        let requested = Instant::now();
        let mut guard = self.state.lock().expect("reasoner lock poisoned");
        let acquired = Instant::now();
        let torn_down = guard.take().is_some();
        self.record(OperationKind::Dispose, acquired - requested, acquired.elapsed());
        drop(guard);
        if torn_down {
            tracing::info!(reference = %self.name, "reference disposed");
        }
    }
}

/// A copy of the ontology with inferred types, sub-class edges and property
/// values asserted.
fn export_inferences(ontology: &Ontology, reasoner: &dyn Reasoner) -> ReasonerResult<Ontology> {
    let mut out = ontology.clone();
    for class in ontology.classes() {
        for sup in reasoner.super_classes(&class, Completeness::Direct)? {
            out.add_axiom(Axiom::SubClassOf {
                sub: class.clone(),
                sup,
            });
        }
    }
    let object_properties = ontology.object_properties();
    let data_properties = ontology.data_properties();
    for individual in ontology.individuals() {
        for class in reasoner.types_of(&individual, Completeness::Direct)? {
            out.add_axiom(Axiom::ClassAssertion {
                class,
                individual: individual.clone(),
            });
        }
        for property in &object_properties {
            for object in reasoner.object_property_values(&individual, property)? {
                out.add_axiom(Axiom::ObjectPropertyAssertion {
                    property: property.clone(),
                    subject: individual.clone(),
                    object,
                });
            }
        }
        for property in &data_properties {
            for value in reasoner.data_property_values(&individual, property)? {
                out.add_axiom(Axiom::DataPropertyAssertion {
                    property: property.clone(),
                    subject: individual.clone(),
                    value,
                });
            }
        }
    }
    Ok(out)
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("name", &self.name)
            .field("ontology_iri", &self.config.ontology_iri)
            .field("reasoner", &self.config.reasoner)
            .finish()
    }
}
