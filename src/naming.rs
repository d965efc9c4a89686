//! Entity naming facade: human-readable names → entity handles.
//!
//! Names are resolved with a fixed convention: `<ontology IRI>#<name>`. A name
//! that is already an absolute IRI (contains `://`) is used verbatim, so
//! vocabulary terms such as `owl:Thing` can be addressed by their full IRI.
//! The facade is stateless beyond the prefix it wraps and never touches the
//! store, so resolving a name never creates an entity.

use std::collections::BTreeSet;

use crate::entity::{Class, DataProperty, Entity, Individual, Iri, Literal, ObjectProperty};

/// Maps names to entity handles for one ontology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNamer {
    ontology_iri: Iri,
    prefix: String,
}

impl EntityNamer {
    pub fn new(ontology_iri: impl AsRef<str>) -> Self {
        let base = ontology_iri.as_ref().trim_end_matches('#');
        Self {
            ontology_iri: Iri::new(base),
            prefix: format!("{base}#"),
        }
    }

    pub fn ontology_iri(&self) -> &Iri {
        &self.ontology_iri
    }

    /// The prefix every short name is appended to.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a name to a full IRI.
    pub fn iri(&self, name: &str) -> Iri {
        if name.contains("://") {
            Iri::new(name)
        } else {
            Iri::new(format!("{}{}", self.prefix, name))
        }
    }

    pub fn class(&self, name: &str) -> Class {
        Class::new(self.iri(name))
    }

    pub fn individual(&self, name: &str) -> Individual {
        Individual::new(self.iri(name))
    }

    pub fn object_property(&self, name: &str) -> ObjectProperty {
        ObjectProperty::new(self.iri(name))
    }

    pub fn data_property(&self, name: &str) -> DataProperty {
        DataProperty::new(self.iri(name))
    }

    pub fn literal(&self, value: impl Into<Literal>) -> Literal {
        value.into()
    }

    pub fn classes<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> BTreeSet<Class> {
        names.into_iter().map(|n| self.class(n)).collect()
    }

    pub fn individuals<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> BTreeSet<Individual> {
        names.into_iter().map(|n| self.individual(n)).collect()
    }

    /// Whether the entity lives in this ontology's namespace.
    pub fn is_local(&self, entity: &Entity) -> bool {
        entity.iri().as_str().starts_with(&self.prefix)
    }
}

/// Collect the short names of a set of handles.
pub fn names<T: std::fmt::Display>(handles: impl IntoIterator<Item = T>) -> BTreeSet<String> {
    handles.into_iter().map(|h| h.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OWL_NS;

    #[test]
    fn names_resolve_under_prefix() {
        let namer = EntityNamer::new("http://ex.org/kitchen");
        assert_eq!(namer.prefix(), "http://ex.org/kitchen#");
        assert_eq!(
            namer.class("Cup").iri().as_str(),
            "http://ex.org/kitchen#Cup"
        );
        assert_eq!(namer.individual("cup1").name(), "cup1");
    }

    #[test]
    fn trailing_hash_is_normalized() {
        let a = EntityNamer::new("http://ex.org/o#");
        let b = EntityNamer::new("http://ex.org/o");
        assert_eq!(a, b);
        assert_eq!(a.class("X"), b.class("X"));
    }

    #[test]
    fn absolute_iris_are_kept() {
        let namer = EntityNamer::new("http://ex.org/o");
        let thing = namer.class(&format!("{OWL_NS}Thing"));
        assert!(thing.is_thing());
    }

    #[test]
    fn same_name_same_handle() {
        let namer = EntityNamer::new("http://ex.org/o");
        assert_eq!(namer.individual("a"), namer.individual("a"));
        assert_ne!(namer.individual("a"), namer.individual("b"));
    }

    #[test]
    fn short_names_of_handles() {
        let namer = EntityNamer::new("http://ex.org/o");
        let set = namer.classes(["B", "A"]);
        let n = names(set);
        assert_eq!(n.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
