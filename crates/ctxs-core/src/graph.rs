//! # Relationship Graph
//!
//! Directed graph over document IDs with one edge per `requires` entry.
//! The graph is assembled from a whole batch first and checked for cycles
//! once afterwards, so the outcome never depends on the order in which
//! documents are visited. The one exception is a duplicated ID: only the
//! first document declaring it contributes edges.
//!
//! Cycle detection uses Tarjan's strongly-connected-components algorithm.
//! Every ID in a component of size > 1, or with a self-edge, is cyclic.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::document::ContextDocument;

/// `requires` edges for a batch of documents.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a batch of documents.
    ///
    /// Documents with an empty `id` contribute no node. When two documents
    /// share an ID only the first one's edges are kept.
    pub fn from_documents<'a>(docs: impl IntoIterator<Item = &'a ContextDocument>) -> Self {
        let mut graph = Self::new();
        for doc in docs {
            graph.add_document(doc);
        }
        graph
    }

    /// Add one document's `requires` edges, unless its ID already has a node.
    pub fn add_document(&mut self, doc: &ContextDocument) {
        if doc.id.is_empty() || self.edges.contains_key(&doc.id) {
            return;
        }
        let mut targets: Vec<String> = Vec::with_capacity(doc.requires.len());
        for dep in &doc.requires {
            if !targets.contains(dep) {
                targets.push(dep.clone());
            }
        }
        self.edges.insert(doc.id.clone(), targets);
    }

    /// Number of documents with outgoing edge lists.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of `id`.
    pub fn dependencies(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Compute every cycle in the graph.
    pub fn cycles(&self) -> CycleReport {
        let mut state = TarjanState::default();

        for node in self.edges.keys() {
            if !state.indices.contains_key(node.as_str()) {
                state.strongconnect(node, self);
            }
        }

        let mut cycles = Vec::new();
        for mut scc in state.sccs {
            let is_cycle = scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|only| self.dependencies(only).iter().any(|d| d == only));
            if is_cycle {
                scc.sort();
                cycles.push(scc);
            }
        }
        cycles.sort();

        let mut membership = HashMap::new();
        for (idx, members) in cycles.iter().enumerate() {
            for id in members {
                membership.insert(id.clone(), idx);
            }
        }

        CycleReport { cycles, membership }
    }
}

#[derive(Default)]
struct TarjanState<'g> {
    index_counter: usize,
    stack: Vec<&'g str>,
    on_stack: HashSet<&'g str>,
    indices: HashMap<&'g str, usize>,
    lowlinks: HashMap<&'g str, usize>,
    sccs: Vec<Vec<String>>,
}

impl<'g> TarjanState<'g> {
    /// Tarjan's algorithm driven by an explicit work stack, so long
    /// `requires` chains cannot exhaust the thread stack.
    fn strongconnect(&mut self, root: &'g str, graph: &'g DependencyGraph) {
        self.enter(root);
        // (node, index of the next outgoing edge to visit)
        let mut work: Vec<(&'g str, usize)> = vec![(root, 0)];

        while let Some(frame) = work.last_mut() {
            let (v, next) = *frame;
            if let Some(w) = graph.dependencies(v).get(next) {
                frame.1 += 1;
                let w = w.as_str();
                match self.indices.get(w) {
                    Some(&w_index) => {
                        if self.on_stack.contains(w) {
                            self.lower(v, w_index);
                        }
                    }
                    None => {
                        self.enter(w);
                        work.push((w, 0));
                    }
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                let v_low = self.lowlinks.get(v).copied().unwrap_or(usize::MAX);
                self.lower(parent, v_low);
            }

            if self.lowlinks.get(v) == self.indices.get(v) {
                let mut scc = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack.remove(w);
                    scc.push(w.to_string());
                    if w == v {
                        break;
                    }
                }
                self.sccs.push(scc);
            }
        }
    }

    fn enter(&mut self, v: &'g str) {
        self.indices.insert(v, self.index_counter);
        self.lowlinks.insert(v, self.index_counter);
        self.index_counter += 1;
        self.stack.push(v);
        self.on_stack.insert(v);
    }

    fn lower(&mut self, v: &'g str, candidate: usize) {
        if let Some(low) = self.lowlinks.get_mut(v) {
            *low = (*low).min(candidate);
        }
    }
}

/// Cycles found in a [`DependencyGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    cycles: Vec<Vec<String>>,
    membership: HashMap<String, usize>,
}

impl CycleReport {
    /// Whether any cycle exists.
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// All cycles, each as the sorted IDs of one strongly connected component.
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    /// The cycle containing `id`, if any.
    pub fn cycle_of(&self, id: &str) -> Option<&[String]> {
        self.membership
            .get(id)
            .and_then(|&idx| self.cycles.get(idx))
            .map(Vec::as_slice)
    }

    /// Every ID that participates in a cycle.
    pub fn cyclic_ids(&self) -> BTreeSet<&str> {
        self.membership.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, requires: &[&str]) -> ContextDocument {
        let fm = json!({"id": id, "requires": requires});
        ContextDocument::from_parts(fm.as_object().cloned().unwrap(), String::new())
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let docs = [doc("a", &["b"]), doc("b", &["c"]), doc("c", &[])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert!(!report.has_cycles());
        assert!(report.cycle_of("a").is_none());
    }

    #[test]
    fn two_node_cycle_detected_for_both() {
        let docs = [doc("a", &["b"]), doc("b", &["a"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert_eq!(report.cycles(), &[vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(report.cycle_of("a"), report.cycle_of("b"));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let docs = [doc("a", &["a"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert_eq!(report.cycle_of("a"), Some(&["a".to_string()][..]));
    }

    #[test]
    fn nodes_leading_into_a_cycle_are_not_cyclic() {
        let docs = [doc("entry", &["x"]), doc("x", &["y"]), doc("y", &["x"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert!(report.cycle_of("entry").is_none());
        assert!(report.cycle_of("x").is_some());
        let ids: Vec<_> = report.cyclic_ids().into_iter().collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn dangling_dependency_is_not_a_cycle() {
        let docs = [doc("a", &["missing"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert!(!report.has_cycles());
    }

    #[test]
    fn result_independent_of_insertion_order() {
        let forward = [doc("a", &["b"]), doc("b", &["c"]), doc("c", &["a"]), doc("d", &[])];
        let reverse = [doc("d", &[]), doc("c", &["a"]), doc("b", &["c"]), doc("a", &["b"])];
        assert_eq!(
            DependencyGraph::from_documents(&forward).cycles(),
            DependencyGraph::from_documents(&reverse).cycles()
        );
    }

    #[test]
    fn separate_cycles_reported_separately() {
        let docs = [doc("a", &["b"]), doc("b", &["a"]), doc("c", &["d"]), doc("d", &["c"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert_eq!(report.cycles().len(), 2);
        assert_ne!(report.cycle_of("a"), report.cycle_of("c"));
    }

    #[test]
    fn long_chain_does_not_exhaust_stack() {
        let docs: Vec<_> = (0..100_000)
            .map(|i| {
                let next = format!("d{}", i + 1);
                doc(&format!("d{i}"), &[next.as_str()])
            })
            .collect();
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert!(!report.has_cycles());
    }

    #[test]
    fn long_ring_is_one_cycle() {
        let n = 50_000;
        let docs: Vec<_> = (0..n)
            .map(|i| {
                let next = format!("d{}", (i + 1) % n);
                doc(&format!("d{i}"), &[next.as_str()])
            })
            .collect();
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert_eq!(report.cycles().len(), 1);
        assert_eq!(report.cycles()[0].len(), n);
    }

    #[test]
    fn duplicate_id_edges_do_not_create_cycles() {
        let docs = [doc("a", &[]), doc("a", &["b"]), doc("b", &["a"])];
        let report = DependencyGraph::from_documents(&docs).cycles();
        assert!(!report.has_cycles());
        assert!(DependencyGraph::from_documents(&docs).dependencies("a").is_empty());
    }

    #[test]
    fn empty_ids_are_skipped() {
        let docs = [doc("", &["a"])];
        assert_eq!(DependencyGraph::from_documents(&docs).node_count(), 0);
    }
}
