//! Explanation hooks: turn an inconsistent ontology into readable text.
//!
//! The consistency monitor calls the registered [`ExplanationHook`] once per
//! transition to inconsistent. The default [`ConflictExplainer`] lists each
//! clash the reasoner found together with the asserted axioms that mention
//! its participants, rendered as a tree:
//!
//! ```text
//! ontology <http://ex.org/pets> is inconsistent (1 conflict)
//! 1. rex is an instance of both Cat and Dog, which are disjoint
//!    ├─ ClassAssertion(Cat rex)
//!    ├─ ClassAssertion(Puppy rex)
//!    └─ SubClassOf(Puppy Dog)
//! ```

use std::collections::BTreeSet;

use crate::ontology::{Axiom, Ontology};
use crate::reasoner::Conflict;

/// Produces a human-readable account of why an ontology is inconsistent.
pub trait ExplanationHook: Send + Sync {
    fn explain(&self, ontology: &Ontology, conflicts: &[Conflict]) -> String;
}

impl<F> ExplanationHook for F
where
    F: Fn(&Ontology, &[Conflict]) -> String + Send + Sync,
{
    fn explain(&self, ontology: &Ontology, conflicts: &[Conflict]) -> String {
        self(ontology, conflicts)
    }
}

/// Lists conflicts with the axioms that mention their participants.
#[derive(Debug, Clone)]
pub struct ConflictExplainer {
    /// Upper bound on supporting axioms shown per conflict.
    pub max_support: usize,
}

impl Default for ConflictExplainer {
    fn default() -> Self {
        Self { max_support: 12 }
    }
}

impl ConflictExplainer {
    /// Asserted axioms touching the conflict's participants.
    pub fn support<'a>(&self, ontology: &'a Ontology, conflict: &Conflict) -> Vec<&'a Axiom> {
        let mut axioms: BTreeSet<&Axiom> = BTreeSet::new();
        for entity in conflict.entities() {
            axioms.extend(
                ontology
                    .axioms_referencing(&entity)
                    .filter(|a| !matches!(a, Axiom::Declaration(_))),
            );
        }
        axioms.into_iter().take(self.max_support).collect()
    }
}

impl ExplanationHook for ConflictExplainer {
    fn explain(&self, ontology: &Ontology, conflicts: &[Conflict]) -> String {
        let mut lines = Vec::new();
        let noun = if conflicts.len() == 1 { "conflict" } else { "conflicts" };
        lines.push(format!(
            "ontology {} is inconsistent ({} {noun})",
            ontology.iri(),
            conflicts.len()
        ));
        for (i, conflict) in conflicts.iter().enumerate() {
            lines.push(format!("{}. {conflict}", i + 1));
            let support = self.support(ontology, conflict);
            for (j, axiom) in support.iter().enumerate() {
                let connector = if j + 1 == support.len() { "└─ " } else { "├─ " };
                lines.push(format!("   {connector}{axiom}"));
            }
        }
        lines.join("\n")
    }
}

/// Hook that produces no text; the monitor still logs the transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentExplainer;

impl ExplanationHook for SilentExplainer {
    fn explain(&self, _ontology: &Ontology, _conflicts: &[Conflict]) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Iri;
    use crate::naming::EntityNamer;

    fn pets() -> (EntityNamer, Ontology, Conflict) {
        let n = EntityNamer::new("http://ex.org/pets");
        let mut o = Ontology::new(Iri::new("http://ex.org/pets"));
        o.add_axiom(Axiom::DisjointClasses(n.classes(["Cat", "Dog"])));
        o.add_axiom(Axiom::ClassAssertion {
            class: n.class("Cat"),
            individual: n.individual("rex"),
        });
        o.add_axiom(Axiom::ClassAssertion {
            class: n.class("Dog"),
            individual: n.individual("rex"),
        });
        o.create_entity(n.individual("rex").into());
        let conflict = Conflict::DisjointMembership {
            individual: n.individual("rex"),
            first: n.class("Cat"),
            second: n.class("Dog"),
        };
        (n, o, conflict)
    }

    #[test]
    fn explanation_lists_conflict_and_support() {
        let (_, o, conflict) = pets();
        let text = ConflictExplainer::default().explain(&o, &[conflict]);
        assert!(text.contains("is inconsistent (1 conflict)"));
        assert!(text.contains("1. rex is an instance of both Cat and Dog"));
        assert!(text.contains("DisjointClasses(Cat Dog)"));
        assert!(text.contains("└─ "));
        assert!(!text.contains("Declaration"));
    }

    #[test]
    fn support_is_capped() {
        let (_, o, conflict) = pets();
        let explainer = ConflictExplainer { max_support: 1 };
        assert_eq!(explainer.support(&o, &conflict).len(), 1);
    }

    #[test]
    fn closures_are_hooks() {
        let (_, o, conflict) = pets();
        let hook = |_: &Ontology, c: &[Conflict]| format!("{} clash", c.len());
        assert_eq!(hook.explain(&o, &[conflict]), "1 clash");
        assert!(SilentExplainer.explain(&o, &[]).is_empty());
    }
}
