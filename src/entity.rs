//! Entity handles for the ontology store.
//!
//! Every class, individual and property is identified by an [`Iri`]. Handles
//! are cheap to clone (the IRI is reference counted), carry no mutable state,
//! and two handles naming the same entity compare equal. Literals are values,
//! not entities, and are described by a lexical form plus a [`Datatype`].

use std::fmt;
use std::sync::Arc;

/// Namespace of the OWL vocabulary.
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
/// Namespace of the XML Schema datatypes.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// An internationalized resource identifier naming an entity.
///
/// Backed by an `Arc<str>` so cloning a handle never copies the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl AsRef<str>) -> Self {
        Iri(Arc::from(iri.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment after `#`, or the last path segment when there is none.
    pub fn short_name(&self) -> &str {
        let s = self.as_str();
        if let Some(idx) = s.rfind('#') {
            return &s[idx + 1..];
        }
        let trimmed = s.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

macro_rules! entity_handle {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Iri);

        impl $name {
            pub fn new(iri: Iri) -> Self {
                $name(iri)
            }

            pub fn iri(&self) -> &Iri {
                &self.0
            }

            /// Human-readable name (IRI fragment).
            pub fn name(&self) -> &str {
                self.0.short_name()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl From<$name> for Entity {
            fn from(handle: $name) -> Self {
                Entity::$kind(handle)
            }
        }
    };
}

entity_handle!(
    /// An OWL class.
    Class,
    Class
);
entity_handle!(
    /// A named individual.
    Individual,
    Individual
);
entity_handle!(
    /// A property relating two individuals.
    ObjectProperty,
    ObjectProperty
);
entity_handle!(
    /// A property relating an individual to a literal.
    DataProperty,
    DataProperty
);

impl Class {
    /// `owl:Thing`, the implicit root of every class hierarchy.
    pub fn thing() -> Self {
        Class(Iri::new(format!("{OWL_NS}Thing")))
    }

    /// `owl:Nothing`, the empty class.
    pub fn nothing() -> Self {
        Class(Iri::new(format!("{OWL_NS}Nothing")))
    }

    pub fn is_thing(&self) -> bool {
        self.0.as_str().strip_prefix(OWL_NS) == Some("Thing")
    }

    pub fn is_nothing(&self) -> bool {
        self.0.as_str().strip_prefix(OWL_NS) == Some("Nothing")
    }
}

/// Classification of an entity in the ontology signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    Individual,
    ObjectProperty,
    DataProperty,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Class => write!(f, "Class"),
            EntityKind::Individual => write!(f, "Individual"),
            EntityKind::ObjectProperty => write!(f, "ObjectProperty"),
            EntityKind::DataProperty => write!(f, "DataProperty"),
        }
    }
}

/// Any entity of the signature, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Class(Class),
    Individual(Individual),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Class(_) => EntityKind::Class,
            Entity::Individual(_) => EntityKind::Individual,
            Entity::ObjectProperty(_) => EntityKind::ObjectProperty,
            Entity::DataProperty(_) => EntityKind::DataProperty,
        }
    }

    pub fn iri(&self) -> &Iri {
        match self {
            Entity::Class(c) => c.iri(),
            Entity::Individual(i) => i.iri(),
            Entity::ObjectProperty(p) => p.iri(),
            Entity::DataProperty(p) => p.iri(),
        }
    }

    pub fn name(&self) -> &str {
        self.iri().short_name()
    }

    /// The same kind of entity under a different IRI.
    pub fn with_iri(&self, iri: Iri) -> Entity {
        match self {
            Entity::Class(_) => Entity::Class(Class::new(iri)),
            Entity::Individual(_) => Entity::Individual(Individual::new(iri)),
            Entity::ObjectProperty(_) => Entity::ObjectProperty(ObjectProperty::new(iri)),
            Entity::DataProperty(_) => Entity::DataProperty(DataProperty::new(iri)),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.name())
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Datatype of a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    String,
    Integer,
    Long,
    Boolean,
    Float,
    Double,
    Other(Iri),
}

impl Datatype {
    pub fn iri(&self) -> Iri {
        match self {
            Datatype::String => Iri::new(format!("{XSD_NS}string")),
            Datatype::Integer => Iri::new(format!("{XSD_NS}integer")),
            Datatype::Long => Iri::new(format!("{XSD_NS}long")),
            Datatype::Boolean => Iri::new(format!("{XSD_NS}boolean")),
            Datatype::Float => Iri::new(format!("{XSD_NS}float")),
            Datatype::Double => Iri::new(format!("{XSD_NS}double")),
            Datatype::Other(iri) => iri.clone(),
        }
    }

    pub fn from_iri(iri: &str) -> Self {
        match iri.strip_prefix(XSD_NS) {
            Some("string") => Datatype::String,
            Some("integer") | Some("int") => Datatype::Integer,
            Some("long") => Datatype::Long,
            Some("boolean") => Datatype::Boolean,
            Some("float") => Datatype::Float,
            Some("double") => Datatype::Double,
            _ => Datatype::Other(Iri::new(iri)),
        }
    }
}

/// A typed literal value (lexical form + datatype).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Datatype,
}

impl Literal {
    pub fn new(lexical: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.datatype {
            Datatype::Integer | Datatype::Long => self.lexical.parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.datatype {
            Datatype::Float | Datatype::Double | Datatype::Integer | Datatype::Long => {
                self.lexical.parse().ok()
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.datatype {
            Datatype::Boolean => self.lexical.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.datatype {
            Datatype::String => write!(f, "\"{}\"", self.lexical),
            _ => f.write_str(&self.lexical),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::new(value, Datatype::String)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::new(value, Datatype::String)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::new(value.to_string(), Datatype::Integer)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::new(value.to_string(), Datatype::Long)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::new(value.to_string(), Datatype::Boolean)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::new(value.to_string(), Datatype::Float)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::new(value.to_string(), Datatype::Double)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_uses_fragment_or_last_segment() {
        assert_eq!(Iri::new("http://ex.org/onto#Kitchen").short_name(), "Kitchen");
        assert_eq!(Iri::new("http://ex.org/onto/Room").short_name(), "Room");
        assert_eq!(Iri::new("http://ex.org/onto/Room/").short_name(), "Room");
        assert_eq!(Iri::new("plain").short_name(), "plain");
    }

    #[test]
    fn handles_with_same_iri_are_equal() {
        let a = Class::new(Iri::new("http://ex.org#A"));
        let b = Class::new(Iri::new(String::from("http://ex.org#A")));
        assert_eq!(a, b);
        assert_eq!(Entity::from(a), Entity::from(b));
    }

    #[test]
    fn entity_kind_distinguishes_same_iri() {
        let iri = Iri::new("http://ex.org#x");
        let class = Entity::from(Class::new(iri.clone()));
        let ind = Entity::from(Individual::new(iri));
        assert_ne!(class, ind);
        assert_eq!(class.kind(), EntityKind::Class);
        assert_eq!(ind.kind(), EntityKind::Individual);
    }

    #[test]
    fn thing_and_nothing() {
        assert!(Class::thing().is_thing());
        assert!(Class::nothing().is_nothing());
        assert!(!Class::new(Iri::new("http://ex.org#Thing")).is_thing());
    }

    #[test]
    fn literal_conversions() {
        assert_eq!(Literal::from(42).as_i64(), Some(42));
        assert_eq!(Literal::from(7_i64).datatype(), &Datatype::Long);
        assert_eq!(Literal::from(true).as_bool(), Some(true));
        assert_eq!(Literal::from(1.5_f32).as_f64(), Some(1.5));
        assert_eq!(Literal::from("hi").as_i64(), None);
        assert_eq!(Literal::from("hi").to_string(), "\"hi\"");
    }

    #[test]
    fn datatype_iri_roundtrip() {
        for dt in [
            Datatype::String,
            Datatype::Integer,
            Datatype::Long,
            Datatype::Boolean,
            Datatype::Float,
            Datatype::Double,
        ] {
            assert_eq!(Datatype::from_iri(dt.iri().as_str()), dt);
        }
    }

    #[test]
    fn entity_display() {
        let e = Entity::from(Individual::new(Iri::new("http://ex.org#cup")));
        assert_eq!(e.to_string(), "Individual(cup)");
    }
}
