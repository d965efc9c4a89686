//! RDF document I/O for the ontology store, backed by oxigraph.
//!
//! Documents are parsed into an in-memory oxigraph [`Store`] and the triples
//! are mapped onto [`Axiom`]s. Writing goes the other way: axioms become
//! triples in a scratch store that is then dumped in the requested format.
//!
//! Only named entities are understood. Class expressions built from blank
//! nodes (restrictions, unions, ...) are skipped, with the exception of the
//! `owl:AllDifferent` and `owl:AllDisjointClasses` list forms. N-ary axioms
//! are written as pairwise triples.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, Literal as RdfLiteral, NamedNode, Quad, Term};
use oxigraph::store::Store;

use crate::entity::{
    Class, DataProperty, Datatype, Entity, EntityKind, Individual, Iri, Literal, OWL_NS,
    ObjectProperty,
};
use crate::error::OntologyError;

use super::{Axiom, OntologyResult, PropertyCharacteristic};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

const ACCEPT: &str =
    "text/turtle, application/rdf+xml;q=0.9, application/n-triples;q=0.8, */*;q=0.1";

fn rdf(local: &str) -> String {
    format!("{RDF_NS}{local}")
}

fn rdfs(local: &str) -> String {
    format!("{RDFS_NS}{local}")
}

fn owl(local: &str) -> String {
    format!("{OWL_NS}{local}")
}

/// Pick a serialization format from a file extension.
pub fn format_for_path(path: &Path) -> OntologyResult<RdfFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "ttl" | "turtle" => Ok(RdfFormat::Turtle),
        "nt" => Ok(RdfFormat::NTriples),
        "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
        _ => Err(OntologyError::UnsupportedFormat { extension: ext }),
    }
}

fn format_for_media_type(content_type: &str) -> Option<RdfFormat> {
    let media = content_type.split(';').next().unwrap_or("").trim();
    match media {
        "text/turtle" | "application/x-turtle" => Some(RdfFormat::Turtle),
        "application/n-triples" => Some(RdfFormat::NTriples),
        "application/rdf+xml" | "application/owl+xml" | "application/xml" | "text/xml" => {
            Some(RdfFormat::RdfXml)
        }
        _ => None,
    }
}

/// Read the axioms of an ontology document on disk.
pub fn read_file(path: &Path) -> OntologyResult<Vec<Axiom>> {
    let format = format_for_path(path)?;
    let file = std::fs::File::open(path).map_err(|e| OntologyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_document(BufReader::new(file), format, &path.display().to_string())
}

/// Fetch an ontology document over HTTP and read its axioms.
///
/// The format follows the response `Content-Type`, falling back to the URL's
/// extension. `timeout` bounds the whole request, body included.
pub fn fetch(url: &str, timeout: Duration) -> OntologyResult<Vec<Axiom>> {
    let response = ureq::get(url)
        .timeout(timeout)
        .set("Accept", ACCEPT)
        .call()
        .map_err(|e| OntologyError::Fetch {
            url: url.into(),
            message: e.to_string(),
        })?;

    let format = format_for_media_type(response.content_type())
        .map(Ok)
        .unwrap_or_else(|| format_for_path(Path::new(url)))?;

    let mut data = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| OntologyError::Fetch {
            url: url.into(),
            message: format!("read body: {e}"),
        })?;

    tracing::debug!(url, bytes = data.len(), ?format, "fetched ontology document");
    read_document(data.as_slice(), format, url)
}

/// Parse a document into axioms.
pub fn read_document(
    reader: impl Read,
    format: RdfFormat,
    source_name: &str,
) -> OntologyResult<Vec<Axiom>> {
    let store = Store::new().map_err(|e| OntologyError::Parse {
        source_name: source_name.into(),
        message: format!("failed to create oxigraph store: {e}"),
    })?;
    store
        .load_from_reader(format, reader)
        .map_err(|e| OntologyError::Parse {
            source_name: source_name.into(),
            message: e.to_string(),
        })?;

    let mut triples = Vec::new();
    for quad in store.iter() {
        let quad = quad.map_err(|e| OntologyError::Parse {
            source_name: source_name.into(),
            message: e.to_string(),
        })?;
        let subject: Term = quad.subject.into();
        triples.push(RawTriple {
            subject: Node::from_term(subject),
            predicate: quad.predicate.as_str().to_string(),
            object: Node::from_term(quad.object),
        });
    }

    let axioms = TripleMapper::new(&triples).axioms();
    tracing::debug!(
        source = source_name,
        triples = triples.len(),
        axioms = axioms.len(),
        "mapped RDF document"
    );
    Ok(axioms)
}

/// Write axioms to a file; the format follows the extension.
pub fn write_file<'a>(
    ontology_iri: &Iri,
    axioms: impl IntoIterator<Item = &'a Axiom>,
    path: &Path,
) -> OntologyResult<()> {
    let format = format_for_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| OntologyError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    let file = std::fs::File::create(path).map_err(|e| OntologyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_document(ontology_iri, axioms, format, &mut writer)?;
    writer.flush().map_err(|e| OntologyError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Serialize axioms as an RDF document.
pub fn write_document<'a, W: Write>(
    ontology_iri: &Iri,
    axioms: impl IntoIterator<Item = &'a Axiom>,
    format: RdfFormat,
    writer: W,
) -> OntologyResult<W> {
    let store = Store::new().map_err(|e| OntologyError::Serialize {
        message: format!("failed to create oxigraph store: {e}"),
    })?;
    let emitter = TripleEmitter { store: &store };

    emitter.iri_triple(ontology_iri.as_str(), &rdf("type"), &owl("Ontology"))?;
    let mut declared = BTreeSet::new();
    for axiom in axioms {
        // Every referenced entity gets a declaration so its kind survives a reload.
        for entity in axiom.entities() {
            if declared.insert(entity.clone()) {
                emitter.declaration(&entity)?;
            }
        }
        emitter.axiom(axiom)?;
    }

    store
        .dump_graph_to_writer(GraphNameRef::DefaultGraph, format, writer)
        .map_err(|e| OntologyError::Serialize {
            message: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Axiom → triples
// ---------------------------------------------------------------------------

struct TripleEmitter<'a> {
    store: &'a Store,
}

impl TripleEmitter<'_> {
    fn node(iri: &str) -> OntologyResult<NamedNode> {
        NamedNode::new(iri).map_err(|_| OntologyError::InvalidIri { iri: iri.into() })
    }

    fn insert(&self, subject: NamedNode, predicate: NamedNode, object: Term) -> OntologyResult<()> {
        let quad = Quad::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store
            .insert(&quad)
            .map_err(|e| OntologyError::Serialize {
                message: format!("insert failed: {e}"),
            })?;
        Ok(())
    }

    fn iri_triple(&self, s: &str, p: &str, o: &str) -> OntologyResult<()> {
        self.insert(Self::node(s)?, Self::node(p)?, Self::node(o)?.into())
    }

    fn declaration(&self, entity: &Entity) -> OntologyResult<()> {
        let kind = match entity.kind() {
            EntityKind::Class => owl("Class"),
            EntityKind::Individual => owl("NamedIndividual"),
            EntityKind::ObjectProperty => owl("ObjectProperty"),
            EntityKind::DataProperty => owl("DatatypeProperty"),
        };
        self.iri_triple(entity.iri().as_str(), &rdf("type"), &kind)
    }

    fn pairwise<T>(
        &self,
        set: &BTreeSet<T>,
        predicate: &str,
        iri: impl Fn(&T) -> &Iri,
    ) -> OntologyResult<()> {
        let members: Vec<&T> = set.iter().collect();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                self.iri_triple(iri(*a).as_str(), predicate, iri(*b).as_str())?;
            }
        }
        Ok(())
    }

    fn axiom(&self, axiom: &Axiom) -> OntologyResult<()> {
        match axiom {
            Axiom::Declaration(_) => Ok(()),
            Axiom::SubClassOf { sub, sup } => {
                self.iri_triple(sub.iri().as_str(), &rdfs("subClassOf"), sup.iri().as_str())
            }
            Axiom::EquivalentClasses(set) => self.pairwise(set, &owl("equivalentClass"), Class::iri),
            Axiom::DisjointClasses(set) => self.pairwise(set, &owl("disjointWith"), Class::iri),
            Axiom::ClassAssertion { class, individual } => {
                self.iri_triple(individual.iri().as_str(), &rdf("type"), class.iri().as_str())
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => self.iri_triple(
                subject.iri().as_str(),
                property.iri().as_str(),
                object.iri().as_str(),
            ),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => {
                let literal = match value.datatype() {
                    Datatype::String => RdfLiteral::new_simple_literal(value.lexical()),
                    other => RdfLiteral::new_typed_literal(
                        value.lexical(),
                        Self::node(other.iri().as_str())?,
                    ),
                };
                self.insert(
                    Self::node(subject.iri().as_str())?,
                    Self::node(property.iri().as_str())?,
                    literal.into(),
                )
            }
            Axiom::SubObjectPropertyOf { sub, sup } => {
                self.iri_triple(sub.iri().as_str(), &rdfs("subPropertyOf"), sup.iri().as_str())
            }
            Axiom::SubDataPropertyOf { sub, sup } => {
                self.iri_triple(sub.iri().as_str(), &rdfs("subPropertyOf"), sup.iri().as_str())
            }
            Axiom::InverseObjectProperties(a, b) => {
                self.iri_triple(a.iri().as_str(), &owl("inverseOf"), b.iri().as_str())
            }
            Axiom::ObjectPropertyCharacteristic {
                property,
                characteristic,
            } => self.iri_triple(
                property.iri().as_str(),
                &rdf("type"),
                &owl(&format!("{characteristic}Property")),
            ),
            Axiom::FunctionalDataProperty(p) => {
                self.iri_triple(p.iri().as_str(), &rdf("type"), &owl("FunctionalProperty"))
            }
            Axiom::SameIndividual(set) => self.pairwise(set, &owl("sameAs"), Individual::iri),
            Axiom::DifferentIndividuals(set) => {
                self.pairwise(set, &owl("differentFrom"), Individual::iri)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Triples → axioms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Node {
    fn from_term(term: Term) -> Node {
        match term {
            Term::NamedNode(n) => Node::Iri(n.into_string()),
            Term::BlankNode(b) => Node::Blank(b.as_str().to_string()),
            Term::Literal(l) => {
                let datatype = if l.language().is_some() {
                    Datatype::String
                } else {
                    Datatype::from_iri(l.datatype().as_str())
                };
                Node::Literal(Literal::new(l.value(), datatype))
            }
            #[allow(unreachable_patterns)]
            other => Node::Blank(other.to_string()),
        }
    }

    fn iri(&self) -> Option<&str> {
        match self {
            Node::Iri(s) => Some(s),
            _ => None,
        }
    }
}

struct RawTriple {
    subject: Node,
    predicate: String,
    object: Node,
}

fn is_vocabulary(iri: &str) -> bool {
    iri.starts_with(RDF_NS) || iri.starts_with(RDFS_NS) || iri.starts_with(OWL_NS)
}

fn characteristic_for(type_iri: &str) -> Option<PropertyCharacteristic> {
    let local = type_iri.strip_prefix(OWL_NS)?.strip_suffix("Property")?;
    PropertyCharacteristic::ALL
        .into_iter()
        .find(|c| c.to_string() == local)
}

/// Two passes: infer the kind of every IRI, then emit axioms.
struct TripleMapper<'a> {
    triples: &'a [RawTriple],
    kinds: HashMap<String, EntityKind>,
    lists: HashMap<String, (Option<Node>, Option<Node>)>,
}

impl<'a> TripleMapper<'a> {
    fn new(triples: &'a [RawTriple]) -> Self {
        let mut mapper = Self {
            triples,
            kinds: HashMap::new(),
            lists: HashMap::new(),
        };
        mapper.collect_kinds();
        mapper
    }

    fn mark(&mut self, iri: &str, kind: EntityKind) {
        if !is_vocabulary(iri) || iri == owl("Thing") || iri == owl("Nothing") {
            self.kinds.entry(iri.to_string()).or_insert(kind);
        }
    }

    fn collect_kinds(&mut self) {
        let type_p = rdf("type");
        // Explicit declarations win over usage, so they go first.
        for t in self.triples {
            let (Some(s), Some(o)) = (t.subject.iri(), t.object.iri()) else {
                continue;
            };
            if t.predicate != type_p {
                continue;
            }
            let kind = match o.strip_prefix(OWL_NS) {
                Some("Class") => Some(EntityKind::Class),
                Some("NamedIndividual") => Some(EntityKind::Individual),
                Some("ObjectProperty") => Some(EntityKind::ObjectProperty),
                Some("DatatypeProperty") => Some(EntityKind::DataProperty),
                _ => None,
            };
            if let Some(kind) = kind {
                self.kinds.insert(s.to_string(), kind);
            }
        }

        for t in self.triples {
            if let Node::Blank(b) = &t.subject {
                if t.predicate == rdf("first") {
                    self.lists.entry(b.clone()).or_default().0 = Some(t.object.clone());
                } else if t.predicate == rdf("rest") {
                    self.lists.entry(b.clone()).or_default().1 = Some(t.object.clone());
                }
            }
            let Some(s) = t.subject.iri() else {
                continue;
            };
            let p = t.predicate.as_str();
            match &t.object {
                Node::Literal(_) if !is_vocabulary(p) => {
                    self.mark(p, EntityKind::DataProperty);
                    self.mark(s, EntityKind::Individual);
                }
                Node::Iri(o) => {
                    if p == rdf("type") {
                        if characteristic_for(o).is_some() {
                            self.mark(s, EntityKind::ObjectProperty);
                        } else if !is_vocabulary(o) || o == &owl("Thing") {
                            self.mark(s, EntityKind::Individual);
                            self.mark(o, EntityKind::Class);
                        }
                    } else if p == rdfs("subClassOf")
                        || p == owl("equivalentClass")
                        || p == owl("disjointWith")
                    {
                        self.mark(s, EntityKind::Class);
                        self.mark(o, EntityKind::Class);
                    } else if p == owl("inverseOf") {
                        self.mark(s, EntityKind::ObjectProperty);
                        self.mark(o, EntityKind::ObjectProperty);
                    } else if p == owl("sameAs") || p == owl("differentFrom") {
                        self.mark(s, EntityKind::Individual);
                        self.mark(o, EntityKind::Individual);
                    } else if !is_vocabulary(p) {
                        self.mark(p, EntityKind::ObjectProperty);
                        self.mark(s, EntityKind::Individual);
                        self.mark(o, EntityKind::Individual);
                    }
                }
                _ => {}
            }
        }
    }

    fn kind(&self, iri: &str) -> Option<EntityKind> {
        self.kinds.get(iri).copied()
    }

    fn list_members(&self, head: &Node) -> Vec<String> {
        let mut members = Vec::new();
        let mut cursor = head.clone();
        // Bounded by the number of list cells to survive cyclic input.
        for _ in 0..=self.lists.len() {
            let Node::Blank(b) = &cursor else { break };
            let Some((first, rest)) = self.lists.get(b) else {
                break;
            };
            if let Some(Node::Iri(iri)) = first {
                members.push(iri.clone());
            }
            match rest {
                Some(next) => cursor = next.clone(),
                None => break,
            }
        }
        members
    }

    fn axioms(&self) -> Vec<Axiom> {
        let mut out = Vec::new();
        for (iri, kind) in &self.kinds {
            if is_vocabulary(iri) {
                continue;
            }
            let iri = Iri::new(iri);
            out.push(Axiom::Declaration(match kind {
                EntityKind::Class => Class::new(iri).into(),
                EntityKind::Individual => Individual::new(iri).into(),
                EntityKind::ObjectProperty => ObjectProperty::new(iri).into(),
                EntityKind::DataProperty => DataProperty::new(iri).into(),
            }));
        }

        let class = |s: &str| Class::new(Iri::new(s));
        let ind = |s: &str| Individual::new(Iri::new(s));
        let op = |s: &str| ObjectProperty::new(Iri::new(s));
        let dp = |s: &str| DataProperty::new(Iri::new(s));

        for t in self.triples {
            let p = t.predicate.as_str();

            if let Node::Blank(_) = &t.subject {
                if p == owl("members") || p == owl("distinctMembers") {
                    let members = self.list_members(&t.object);
                    let is_classes = members
                        .first()
                        .is_some_and(|m| self.kind(m) == Some(EntityKind::Class));
                    if members.len() > 1 {
                        out.push(if is_classes {
                            Axiom::DisjointClasses(members.iter().map(|m| class(m)).collect())
                        } else {
                            Axiom::DifferentIndividuals(members.iter().map(|m| ind(m)).collect())
                        });
                    }
                }
                continue;
            }

            let Some(s) = t.subject.iri() else { continue };
            if is_vocabulary(s) {
                continue;
            }

            match &t.object {
                Node::Literal(value) => {
                    if !is_vocabulary(p) {
                        out.push(Axiom::DataPropertyAssertion {
                            property: dp(p),
                            subject: ind(s),
                            value: value.clone(),
                        });
                    }
                }
                Node::Iri(o) => {
                    if p == rdf("type") {
                        if o == &owl("FunctionalProperty") {
                            if self.kind(s) == Some(EntityKind::DataProperty) {
                                out.push(Axiom::FunctionalDataProperty(dp(s)));
                            } else {
                                out.push(Axiom::ObjectPropertyCharacteristic {
                                    property: op(s),
                                    characteristic: PropertyCharacteristic::Functional,
                                });
                            }
                        } else if let Some(characteristic) = characteristic_for(o) {
                            out.push(Axiom::ObjectPropertyCharacteristic {
                                property: op(s),
                                characteristic,
                            });
                        } else if !is_vocabulary(o) {
                            out.push(Axiom::ClassAssertion {
                                class: class(o),
                                individual: ind(s),
                            });
                        }
                    } else if p == rdfs("subClassOf") {
                        out.push(Axiom::SubClassOf {
                            sub: class(s),
                            sup: class(o),
                        });
                    } else if p == owl("equivalentClass") {
                        out.push(Axiom::EquivalentClasses([class(s), class(o)].into()));
                    } else if p == owl("disjointWith") {
                        out.push(Axiom::DisjointClasses([class(s), class(o)].into()));
                    } else if p == rdfs("subPropertyOf") {
                        if self.kind(s) == Some(EntityKind::DataProperty) {
                            out.push(Axiom::SubDataPropertyOf {
                                sub: dp(s),
                                sup: dp(o),
                            });
                        } else {
                            out.push(Axiom::SubObjectPropertyOf {
                                sub: op(s),
                                sup: op(o),
                            });
                        }
                    } else if p == owl("inverseOf") {
                        out.push(Axiom::inverse_properties(op(s), op(o)));
                    } else if p == owl("sameAs") {
                        out.push(Axiom::SameIndividual([ind(s), ind(o)].into()));
                    } else if p == owl("differentFrom") {
                        out.push(Axiom::DifferentIndividuals([ind(s), ind(o)].into()));
                    } else if !is_vocabulary(p) {
                        out.push(Axiom::ObjectPropertyAssertion {
                            property: op(p),
                            subject: ind(s),
                            object: ind(o),
                        });
                    }
                }
                Node::Blank(_) => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EntityNamer;

    const DOC: &str = r#"
@prefix : <http://ex.org/k#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<http://ex.org/k> a owl:Ontology .
:Cup a owl:Class ; rdfs:subClassOf :Container .
:weight a owl:DatatypeProperty , owl:FunctionalProperty .
:near a owl:ObjectProperty , owl:SymmetricProperty .
:cup1 a :Cup ; :near :plate1 ; :weight "3"^^xsd:integer .
:cup1 owl:differentFrom :plate1 .
[] a owl:AllDisjointClasses ; owl:members ( :Cup :Plate :Fork ) .
"#;

    fn parse() -> Vec<Axiom> {
        read_document(DOC.as_bytes(), RdfFormat::Turtle, "test").unwrap()
    }

    #[test]
    fn turtle_document_maps_to_axioms() {
        let n = EntityNamer::new("http://ex.org/k");
        let axioms = parse();
        let has = |a: Axiom| axioms.contains(&a);

        assert!(has(Axiom::SubClassOf {
            sub: n.class("Cup"),
            sup: n.class("Container"),
        }));
        assert!(has(Axiom::ClassAssertion {
            class: n.class("Cup"),
            individual: n.individual("cup1"),
        }));
        assert!(has(Axiom::ObjectPropertyAssertion {
            property: n.object_property("near"),
            subject: n.individual("cup1"),
            object: n.individual("plate1"),
        }));
        assert!(has(Axiom::DataPropertyAssertion {
            property: n.data_property("weight"),
            subject: n.individual("cup1"),
            value: Literal::from(3),
        }));
        assert!(has(Axiom::FunctionalDataProperty(n.data_property("weight"))));
        assert!(has(Axiom::ObjectPropertyCharacteristic {
            property: n.object_property("near"),
            characteristic: PropertyCharacteristic::Symmetric,
        }));
        assert!(has(Axiom::DifferentIndividuals(
            n.individuals(["cup1", "plate1"])
        )));
        assert!(has(Axiom::DisjointClasses(n.classes(["Cup", "Plate", "Fork"]))));
    }

    #[test]
    fn ontology_header_is_not_an_individual() {
        let axioms = parse();
        let header = Individual::new(Iri::new("http://ex.org/k"));
        assert!(!axioms.iter().any(|a| a.mentions(&header.clone().into())));
    }

    #[test]
    fn written_document_reads_back() {
        let n = EntityNamer::new("http://ex.org/k");
        let axioms = vec![
            Axiom::SubDataPropertyOf {
                sub: n.data_property("grams"),
                sup: n.data_property("weight"),
            },
            Axiom::DataPropertyAssertion {
                property: n.data_property("label"),
                subject: n.individual("cup1"),
                value: Literal::from("blue cup"),
            },
            Axiom::inverse_properties(n.object_property("holds"), n.object_property("heldBy")),
        ];
        let buf = write_document(n.ontology_iri(), &axioms, RdfFormat::NTriples, Vec::new())
            .unwrap();
        let back = read_document(buf.as_slice(), RdfFormat::NTriples, "buf").unwrap();
        for axiom in &axioms {
            assert!(back.contains(axiom), "missing {axiom}");
        }
    }

    #[test]
    fn format_follows_extension() {
        assert!(matches!(
            format_for_path(Path::new("a.ttl")),
            Ok(RdfFormat::Turtle)
        ));
        assert!(matches!(
            format_for_path(Path::new("a.OWL")),
            Ok(RdfFormat::RdfXml)
        ));
        assert!(matches!(
            format_for_path(Path::new("a.docx")),
            Err(OntologyError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn fetch_gives_up_on_a_silent_server() {
        // Accepted by the kernel backlog but never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/onto.ttl", listener.local_addr().unwrap());

        let start = std::time::Instant::now();
        let err = fetch(&url, Duration::from_millis(300)).unwrap_err();
        assert!(matches!(err, OntologyError::Fetch { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
        drop(listener);
    }
}
