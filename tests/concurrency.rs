//! Concurrency tests: a reference never lets two calls reach its reasoner
//! at the same time, and buffered flushes are observed all-or-nothing.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use amor::config::ReferenceConfig;
use amor::entity::{Class, DataProperty, Individual, Literal, ObjectProperty};
use amor::error::RegistryError;
use amor::ontology::Ontology;
use amor::reasoner::{
    Completeness, Conflict, Reasoner, ReasonerFactory, ReasonerResult, SaturationReasoner,
};
use amor::registry::ReferenceRegistry;
use amor::AmorError;

const IRI: &str = "http://www.semanticweb.org/concurrency";

/// Counts calls currently inside the reasoner and the highest count seen.
#[derive(Default)]
struct Gauge {
    in_flight: AtomicUsize,
    max: AtomicUsize,
}

struct Entered<'a>(&'a Gauge);

impl Gauge {
    fn enter(&self) -> Entered<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        // Widen the window in which an overlapping call would be seen.
        thread::yield_now();
        Entered(self)
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

struct GaugedReasoner {
    inner: SaturationReasoner,
    gauge: Arc<Gauge>,
}

macro_rules! gauged {
    ($( fn $name:ident(&self $(, $arg:ident : $ty:ty)*) -> $ret:ty; )*) => {
        $(
            fn $name(&self $(, $arg: $ty)*) -> $ret {
                let _entered = self.gauge.enter();
                self.inner.$name($($arg),*)
            }
        )*
    };
}

impl Reasoner for GaugedReasoner {
    fn name(&self) -> &str {
        "gauged"
    }

    fn is_buffering(&self) -> bool {
        self.inner.is_buffering()
    }

    fn ontology_changed(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        let gauge = self.gauge.clone();
        let _entered = gauge.enter();
        self.inner.ontology_changed(ontology)
    }

    fn classify(&mut self, ontology: &Ontology) -> ReasonerResult<()> {
        let gauge = self.gauge.clone();
        let _entered = gauge.enter();
        self.inner.classify(ontology)
    }

    gauged! {
        fn is_consistent(&self) -> bool;
        fn instances_of(&self, class: &Class, mode: Completeness) -> ReasonerResult<BTreeSet<Individual>>;
        fn types_of(&self, individual: &Individual, mode: Completeness) -> ReasonerResult<BTreeSet<Class>>;
        fn object_property_values(&self, individual: &Individual, property: &ObjectProperty) -> ReasonerResult<BTreeSet<Individual>>;
        fn data_property_values(&self, individual: &Individual, property: &DataProperty) -> ReasonerResult<BTreeSet<Literal>>;
        fn sub_classes(&self, class: &Class, mode: Completeness) -> ReasonerResult<BTreeSet<Class>>;
        fn super_classes(&self, class: &Class, mode: Completeness) -> ReasonerResult<BTreeSet<Class>>;
        fn equivalent_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>>;
        fn disjoint_classes(&self, class: &Class) -> ReasonerResult<BTreeSet<Class>>;
        fn sub_object_properties(&self, property: &ObjectProperty, mode: Completeness) -> ReasonerResult<BTreeSet<ObjectProperty>>;
        fn super_object_properties(&self, property: &ObjectProperty, mode: Completeness) -> ReasonerResult<BTreeSet<ObjectProperty>>;
        fn sub_data_properties(&self, property: &DataProperty, mode: Completeness) -> ReasonerResult<BTreeSet<DataProperty>>;
        fn super_data_properties(&self, property: &DataProperty, mode: Completeness) -> ReasonerResult<BTreeSet<DataProperty>>;
        fn inverse_properties(&self, property: &ObjectProperty) -> ReasonerResult<BTreeSet<ObjectProperty>>;
        fn same_individuals(&self, individual: &Individual) -> ReasonerResult<BTreeSet<Individual>>;
        fn different_individuals(&self, individual: &Individual) -> ReasonerResult<BTreeSet<Individual>>;
        fn conflicts(&self) -> Vec<Conflict>;
    }
}

fn gauged_registry(gauge: Arc<Gauge>) -> ReferenceRegistry {
    let mut factory = ReasonerFactory::new();
    factory.register("gauged", move |buffering| {
        Box::new(GaugedReasoner {
            inner: SaturationReasoner::new(buffering),
            gauge: gauge.clone(),
        }) as Box<dyn Reasoner>
    });
    ReferenceRegistry::with_factory(factory)
}

#[test]
fn reasoner_is_never_entered_concurrently() {
    let gauge = Arc::new(Gauge::default());
    let registry = gauged_registry(gauge.clone());
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_reasoner("gauged"))
        .unwrap();
    kb.add_sub_class("Mug", "Cup");

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let kb = kb.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..50 {
                    match (t + i) % 4 {
                        0 => {
                            kb.add_individual_to_class(&format!("mug{t}_{i}"), "Mug");
                        }
                        1 => {
                            kb.individuals_of("Cup");
                        }
                        2 => {
                            kb.synchronize();
                        }
                        _ => {
                            kb.types_of_with(&format!("mug{t}_{}", i.saturating_sub(3)), Completeness::Direct);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(gauge.max.load(Ordering::SeqCst), 1);
    assert_eq!(gauge.in_flight.load(Ordering::SeqCst), 0);
    kb.synchronize();
    assert!(kb.is_consistent());
    assert!(!kb.individuals_of("Cup").is_empty());
}

#[test]
fn readers_see_a_flush_all_or_nothing() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    let k = 40;
    for i in 0..k {
        kb.add_individual_to_class(&format!("cup{i}"), "Cup");
    }

    let reader = {
        let kb = kb.clone();
        thread::spawn(move || {
            let mut seen = BTreeSet::new();
            for _ in 0..200 {
                seen.insert(kb.individuals_of("Cup").len());
            }
            seen
        })
    };
    kb.flush();
    let seen = reader.join().unwrap();

    assert!(seen.iter().all(|&n| n == 0 || n == k), "partial flush observed: {seen:?}");
    assert_eq!(kb.individuals_of("Cup").len(), k);
}

#[test]
fn separate_references_progress_independently() {
    let registry = Arc::new(ReferenceRegistry::new());
    let handles: Vec<_> = (0..4)
        .map(|r| {
            let registry = registry.clone();
            thread::spawn(move || {
                let kb = registry
                    .create(&format!("kb{r}"), ReferenceConfig::new(format!("{IRI}/{r}")))
                    .unwrap();
                for i in 0..25 {
                    kb.add_individual_to_class(&format!("i{i}"), "C");
                }
                kb.synchronize();
                kb.individuals_of("C").len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 25);
    }
    assert_eq!(registry.len(), 4);
}

#[test]
fn concurrent_create_registers_one_reference() {
    let registry = Arc::new(ReferenceRegistry::new());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.create("shared", ReferenceConfig::new(IRI))
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(
                err,
                AmorError::Registry(RegistryError::DuplicateReferenceName { .. })
            )),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn dispose_waits_for_the_reference_and_empties_it() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    kb.add_individual_to_class("a", "A");

    let reader = {
        let kb = kb.clone();
        thread::spawn(move || {
            (0..100)
                .map(|_| kb.individuals_of("A").len())
                .collect::<Vec<_>>()
        })
    };
    registry.dispose("kb").unwrap();
    let counts = reader.join().unwrap();

    assert!(counts.iter().all(|&n| n == 0 || n == 1));
    assert!(kb.is_disposed());
    assert!(kb.individuals_of("A").is_empty());
    assert!(kb.add_individual_to_class("b", "A").is_empty());
}
