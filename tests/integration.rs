//! End-to-end tests for the amor reference layer.
//!
//! These exercise the registry, coordinator, manipulator, enquirer and
//! consistency monitor together, including loading and saving documents.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use amor::config::{CreateMode, ReferenceConfig};
use amor::consistency::ConsistencyState;
use amor::entity::Literal;
use amor::error::{AmorError, ReasonerError, RegistryError};
use amor::ontology::{Ontology, PropertyCharacteristic};
use amor::reasoner::{Completeness, Conflict};
use amor::registry::ReferenceRegistry;

const IRI: &str = "http://www.semanticweb.org/kitchen";

const KITCHEN_TTL: &str = r#"
@prefix : <http://www.semanticweb.org/kitchen#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<http://www.semanticweb.org/kitchen> a owl:Ontology .

:Container a owl:Class .
:Cup a owl:Class ; rdfs:subClassOf :Container .
:Mug a owl:Class ; rdfs:subClassOf :Cup .
:Plate a owl:Class ; rdfs:subClassOf :Container ; owl:disjointWith :Cup .
:isOn a owl:ObjectProperty .
:hasVolume a owl:DatatypeProperty .

:mug1 a owl:NamedIndividual , :Mug ;
    :isOn :table ;
    :hasVolume "250"^^xsd:integer .
:plate1 a owl:NamedIndividual , :Plate .
:table a owl:NamedIndividual .
"#;

fn kitchen_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("kitchen.ttl");
    std::fs::write(&path, KITCHEN_TTL).unwrap();
    path
}

#[test]
fn load_query_and_save_roundtrip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = kitchen_file(dir.path());
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kitchen", ReferenceConfig::from_file(IRI, &path))
        .unwrap();
    let n = kb.namer().clone();

    assert!(kb.is_consistent());
    assert_eq!(
        kb.individuals_of_with("Container", Completeness::Transitive),
        n.individuals(["mug1", "plate1"])
    );
    assert_eq!(
        kb.sub_classes_of_with("Container", Completeness::Direct),
        n.classes(["Cup", "Plate"])
    );
    assert_eq!(kb.bottom_types_of("mug1"), n.classes(["Mug"]));
    assert_eq!(kb.only_object_property_value("mug1", "isOn"), Some(n.individual("table")));
    assert_eq!(
        kb.data_property_values("mug1", "hasVolume"),
        [Literal::from(250)].into_iter().collect()
    );
    assert!(kb.disjoint_classes_of("Cup").contains(&n.class("Plate")));

    kb.add_individual_to_class("cup2", "Cup");
    let out = dir.path().join("kitchen-out.nt");
    kb.save(Some(&out)).unwrap();
    let reloaded = Ontology::load(n.ontology_iri().clone(), &out).unwrap();
    assert!(reloaded.told_types(&n.individual("cup2")).contains(&n.class("Cup")));
    assert!(reloaded.told_types(&n.individual("mug1")).contains(&n.class("Mug")));
}

#[test]
fn immediate_mode_round_trip_without_synchronize() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    kb.add_individual_to_class("i", "C");
    assert!(kb.individuals_of("C").contains(&kb.namer().individual("i")));
}

#[test]
fn completeness_modes_on_a_chain() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    kb.add_sub_class("B", "A");
    kb.add_sub_class("C", "B");
    kb.synchronize();
    let n = kb.namer();
    assert_eq!(kb.sub_classes_of_with("A", Completeness::Direct), n.classes(["B"]));
    assert_eq!(
        kb.sub_classes_of_with("A", Completeness::Transitive),
        n.classes(["B", "C"])
    );
    assert_eq!(kb.super_classes_of_with("C", Completeness::Direct), n.classes(["B"]));
}

#[test]
fn buffer_atomicity_after_flush() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    for i in 0..5 {
        kb.add_individual_to_class(&format!("cup{i}"), "Cup");
    }
    assert_eq!(kb.buffered_changes().len(), 5);
    assert!(kb.individuals_of("Cup").is_empty());
    assert_eq!(kb.flush(), 5);
    assert!(kb.buffered_changes().is_empty());
    assert_eq!(kb.individuals_of("Cup").len(), 5);
}

#[test]
fn replace_is_atomic_under_buffering() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    kb.add_data_property("cup", "temperature", 20);
    kb.synchronize();

    kb.replace_data_property("cup", "temperature", None, 80);
    assert_eq!(kb.buffered_changes().len(), 2);
    assert_eq!(
        kb.data_property_values("cup", "temperature"),
        [Literal::from(20)].into_iter().collect()
    );
    kb.synchronize();
    assert_eq!(
        kb.data_property_values("cup", "temperature"),
        [Literal::from(80)].into_iter().collect()
    );
}

#[test]
fn replace_sees_values_still_in_the_buffer() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    kb.add_object_property("cup", "isOn", "table");
    kb.replace_object_property("cup", "isOn", None, "shelf");
    kb.add_individual_to_class("cup", "Cup");
    kb.replace_individual_class("cup", None, "Mug");
    kb.synchronize();

    let n = kb.namer();
    assert_eq!(kb.object_property_values("cup", "isOn"), n.individuals(["shelf"]));
    assert_eq!(kb.types_of("cup"), n.classes(["Mug"]));
}

#[test]
fn consistency_is_sticky_until_compensated() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    let explained = Arc::new(AtomicUsize::new(0));
    let counter = explained.clone();
    kb.set_explanation_hook(Arc::new(move |_: &Ontology, conflicts: &[Conflict]| {
        counter.fetch_add(1, Ordering::SeqCst);
        format!("{} conflict(s)", conflicts.len())
    }));

    kb.make_disjoint_classes(&["Cup", "Plate"]);
    kb.add_individual_to_class("x", "Cup");
    kb.add_individual_to_class("x", "Plate");
    assert_eq!(kb.synchronize(), ConsistencyState::Inconsistent);

    for _ in 0..3 {
        assert!(!kb.is_consistent());
        assert!(kb.individuals_of("Cup").is_empty());
    }
    assert_eq!(kb.synchronize(), ConsistencyState::Inconsistent);
    assert_eq!(explained.load(Ordering::SeqCst), 1);

    kb.remove_individual_from_class("x", "Plate");
    assert!(!kb.is_consistent(), "compensation alone does not clear the flag");
    assert_eq!(kb.synchronize(), ConsistencyState::Consistent);
    assert!(kb.individuals_of("Cup").contains(&kb.namer().individual("x")));
}

#[test]
fn registry_uniqueness_and_reuse_after_dispose() {
    let registry = ReferenceRegistry::new();
    registry.create("X", ReferenceConfig::new(IRI)).unwrap();
    let err = registry.create("X", ReferenceConfig::new(IRI)).unwrap_err();
    assert!(matches!(
        err,
        AmorError::Registry(RegistryError::DuplicateReferenceName { .. })
    ));
    registry.dispose("X").unwrap();
    assert!(registry.lookup("X").is_none());
    assert!(registry.create("X", ReferenceConfig::new(IRI)).is_ok());
}

#[test]
fn bad_reasoner_key_is_fatal_for_creation() {
    let registry = ReferenceRegistry::new();
    let err = registry
        .create("X", ReferenceConfig::new(IRI).with_reasoner("pellet"))
        .unwrap_err();
    assert!(matches!(
        err,
        AmorError::Reasoner(ReasonerError::UnknownReasoner { .. })
    ));
    assert!(!registry.contains("X"));
}

#[test]
fn missing_document_fails_creation() {
    let registry = ReferenceRegistry::new();
    let cfg = ReferenceConfig::new(IRI)
        .with_mode(CreateMode::LoadFromFile)
        .with_file("/nonexistent/kitchen.owl");
    assert!(registry.create("X", cfg).is_err());
    assert!(registry.is_empty());
}

#[test]
fn structural_reasoner_ignores_individual_rules() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_reasoner("structural"))
        .unwrap();
    kb.add_object_property_characteristic("near", PropertyCharacteristic::Symmetric);
    kb.add_object_property("a", "near", "b");
    kb.make_disjoint_classes(&["Cup", "Plate"]);
    kb.add_individual_to_class("x", "Cup");
    kb.add_individual_to_class("x", "Plate");
    assert_eq!(kb.synchronize(), ConsistencyState::Consistent);
    assert!(kb.object_property_values("b", "near").is_empty());
}

#[test]
fn property_rules_through_the_coordinator() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    kb.add_inverse_properties("isOn", "supports");
    kb.add_object_property_characteristic("isIn", PropertyCharacteristic::Transitive);
    kb.add_sub_object_property("isOn", "touches");
    kb.add_object_property("cup", "isOn", "table");
    kb.add_object_property("cup", "isIn", "cupboard");
    kb.add_object_property("cupboard", "isIn", "kitchen");
    kb.synchronize();

    let n = kb.namer();
    assert_eq!(kb.object_property_values("table", "supports"), n.individuals(["cup"]));
    assert_eq!(kb.object_property_values("cup", "touches"), n.individuals(["table"]));
    assert_eq!(
        kb.object_property_values("cup", "isIn"),
        n.individuals(["cupboard", "kitchen"])
    );
    assert_eq!(
        kb.inverse_properties_of("supports"),
        [n.object_property("isOn")].into_iter().collect()
    );
    assert_eq!(kb.object_properties_of("cup").len(), 3);
}

#[test]
fn remove_and_rename_entities() {
    let registry = ReferenceRegistry::new();
    let kb = registry.create("kb", ReferenceConfig::new(IRI)).unwrap();
    kb.add_individual("table");
    kb.add_individual_to_class("cup", "Cup");
    kb.add_object_property("cup", "isOn", "table");
    kb.rename_class("Cup", "Mug");
    assert!(kb.individuals_of("Cup").is_empty());
    assert_eq!(kb.individuals_of("Mug"), kb.namer().individuals(["cup"]));

    let removed = kb.remove_individual("cup");
    assert_eq!(removed.len(), 2);
    assert!(kb.individuals_of_thing().contains(&kb.namer().individual("table")));
    assert!(!kb.individuals_of_thing().contains(&kb.namer().individual("cup")));
}

#[test]
fn synchronize_with_applies_explicit_changes() {
    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kb", ReferenceConfig::new(IRI).with_buffering(true, true))
        .unwrap();
    let prepared = {
        let scratch = registry.create("scratch", ReferenceConfig::new(IRI)).unwrap();
        scratch.set_buffering(true);
        scratch.add_individual_to_class("a", "A")
    };
    kb.add_individual_to_class("b", "A");
    assert_eq!(kb.synchronize_with(prepared), ConsistencyState::Consistent);
    assert_eq!(kb.individuals_of("A"), kb.namer().individuals(["a"]));
    assert_eq!(kb.buffered_changes().len(), 1, "buffer is left for the next flush");
}

#[test]
fn inferred_save_and_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let doc = kitchen_file(dir.path());
    let cfg_path = dir.path().join("kitchen.toml");
    ReferenceConfig::from_file(IRI, &doc)
        .with_completeness(Completeness::Direct)
        .save(&cfg_path)
        .unwrap();

    let registry = ReferenceRegistry::new();
    let kb = registry
        .create("kitchen", ReferenceConfig::load(&cfg_path).unwrap())
        .unwrap();
    assert_eq!(kb.completeness(), Completeness::Direct);

    let out = dir.path().join("inferred.ttl");
    assert!(kb.save_with_inferences(Some(&out)).unwrap());
    let n = kb.namer();
    let exported = Ontology::load(n.ontology_iri().clone(), &out).unwrap();
    assert!(exported.told_types(&n.individual("mug1")).contains(&n.class("Mug")));
    assert!(exported.told_sub_classes(&n.class("Container")).contains(&n.class("Cup")));
}
