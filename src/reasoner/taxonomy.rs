//! Subsumption hierarchy over one kind of entity, built with petgraph.
//!
//! Told `sub → sup` edges and equivalence sets form a directed graph. Cycles
//! are equivalences, so the graph is condensed into strongly connected
//! components; the closure and its transitive reduction are computed over the
//! resulting DAG.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use petgraph::algo::condensation;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use super::Completeness;

#[derive(Debug, Clone)]
pub(crate) struct Taxonomy<T> {
    /// Member → component id.
    component: HashMap<T, usize>,
    members: Vec<BTreeSet<T>>,
    ancestors: Vec<BTreeSet<usize>>,
    descendants: Vec<BTreeSet<usize>>,
    parents: Vec<BTreeSet<usize>>,
    children: Vec<BTreeSet<usize>>,
}

impl<T: Clone + Ord + Hash> Default for Taxonomy<T> {
    fn default() -> Self {
        Self::build(Vec::new(), Vec::new(), Vec::new())
    }
}

fn ensure_node<T: Clone + Eq + Hash>(
    graph: &mut DiGraph<T, ()>,
    index: &mut HashMap<T, NodeIndex>,
    item: T,
) -> NodeIndex {
    if let Some(idx) = index.get(&item) {
        return *idx;
    }
    let idx = graph.add_node(item.clone());
    index.insert(item, idx);
    idx
}

impl<T: Clone + Ord + Hash> Taxonomy<T> {
    pub fn build(
        nodes: impl IntoIterator<Item = T>,
        edges: impl IntoIterator<Item = (T, T)>,
        equivalences: impl IntoIterator<Item = BTreeSet<T>>,
    ) -> Self {
        let mut graph: DiGraph<T, ()> = DiGraph::new();
        let mut index: HashMap<T, NodeIndex> = HashMap::new();

        for node in nodes {
            ensure_node(&mut graph, &mut index, node);
        }
        for (sub, sup) in edges {
            let a = ensure_node(&mut graph, &mut index, sub);
            let b = ensure_node(&mut graph, &mut index, sup);
            graph.add_edge(a, b, ());
        }
        for set in equivalences {
            let ids: Vec<NodeIndex> = set
                .into_iter()
                .map(|t| ensure_node(&mut graph, &mut index, t))
                .collect();
            for pair in ids.windows(2) {
                graph.add_edge(pair[0], pair[1], ());
                graph.add_edge(pair[1], pair[0], ());
            }
        }

        let dag = condensation(graph, true);
        let n = dag.node_count();

        let mut component = HashMap::new();
        let mut members = Vec::with_capacity(n);
        for idx in dag.node_indices() {
            let set: BTreeSet<T> = dag[idx].iter().cloned().collect();
            for item in &set {
                component.insert(item.clone(), idx.index());
            }
            members.push(set);
        }

        let mut ancestors = vec![BTreeSet::new(); n];
        for idx in dag.node_indices() {
            let mut dfs = Dfs::new(&dag, idx);
            while let Some(next) = dfs.next(&dag) {
                if next != idx {
                    ancestors[idx.index()].insert(next.index());
                }
            }
        }

        let mut descendants = vec![BTreeSet::new(); n];
        for (c, anc) in ancestors.iter().enumerate() {
            for &a in anc {
                descendants[a].insert(c);
            }
        }

        let parents = reduce(&ancestors);
        let children = reduce(&descendants);

        Self {
            component,
            members,
            ancestors,
            descendants,
            parents,
            children,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.component.keys()
    }

    fn expand<'a>(&'a self, ids: impl IntoIterator<Item = &'a usize>) -> BTreeSet<T> {
        ids.into_iter()
            .flat_map(|&id| self.members[id].iter().cloned())
            .collect()
    }

    /// Strict super-items (equivalents excluded).
    pub fn supers(&self, item: &T, mode: Completeness) -> BTreeSet<T> {
        let Some(&c) = self.component.get(item) else {
            return BTreeSet::new();
        };
        match mode {
            Completeness::Direct => self.expand(&self.parents[c]),
            Completeness::Transitive => self.expand(&self.ancestors[c]),
        }
    }

    /// Strict sub-items (equivalents excluded).
    pub fn subs(&self, item: &T, mode: Completeness) -> BTreeSet<T> {
        let Some(&c) = self.component.get(item) else {
            return BTreeSet::new();
        };
        match mode {
            Completeness::Direct => self.expand(&self.children[c]),
            Completeness::Transitive => self.expand(&self.descendants[c]),
        }
    }

    pub fn equivalents(&self, item: &T) -> BTreeSet<T> {
        let Some(&c) = self.component.get(item) else {
            return BTreeSet::new();
        };
        self.members[c].iter().filter(|m| *m != item).cloned().collect()
    }

    /// The item, its equivalents and every super-item.
    pub fn supers_or_self(&self, item: &T) -> BTreeSet<T> {
        let Some(&c) = self.component.get(item) else {
            return BTreeSet::from([item.clone()]);
        };
        let mut out = self.expand(&self.ancestors[c]);
        out.extend(self.members[c].iter().cloned());
        out
    }

    /// The item, its equivalents and every sub-item.
    pub fn subs_or_self(&self, item: &T) -> BTreeSet<T> {
        let Some(&c) = self.component.get(item) else {
            return BTreeSet::from([item.clone()]);
        };
        let mut out = self.expand(&self.descendants[c]);
        out.extend(self.members[c].iter().cloned());
        out
    }

    /// Whether `sub` lies strictly below `sup`.
    pub fn is_strict_sub(&self, sub: &T, sup: &T) -> bool {
        match (self.component.get(sub), self.component.get(sup)) {
            (Some(&a), Some(&b)) => self.ancestors[a].contains(&b),
            _ => false,
        }
    }

    /// Items with no super-items.
    pub fn roots(&self) -> BTreeSet<T> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .flat_map(|(c, _)| self.members[c].iter().cloned())
            .collect()
    }
}

/// Transitive reduction: keep only the relatives not reachable through another.
fn reduce(closure: &[BTreeSet<usize>]) -> Vec<BTreeSet<usize>> {
    closure
        .iter()
        .map(|rel| {
            rel.iter()
                .copied()
                .filter(|&r| !rel.iter().any(|&q| q != r && closure[q].contains(&r)))
                .collect()
        })
        .collect()
}
