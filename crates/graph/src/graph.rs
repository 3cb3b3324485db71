use crate::ids::NodeId;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

/// Directed simple graph over [`NodeId`]s.
///
/// Thin domain wrapper around a petgraph [`DiGraphMap`], in the shape the
/// taxonomy pipeline needs: edge algebra, node contraction, reversal and
/// transitive closure. A node exists only while it has at least one
/// incident edge; self-edges are never stored (a taxonomy edge from a node
/// to itself carries no information).
#[derive(Debug, Default, Clone)]
pub struct Graph {
    inner: DiGraphMap<NodeId, ()>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `u -> v`. Returns `true` if the edge is new.
    pub fn put(&mut self, u: NodeId, v: NodeId) -> bool {
        if u == v {
            return false;
        }
        self.inner.add_edge(u, v, ()).is_none()
    }

    pub fn contains(&self, u: NodeId, v: NodeId) -> bool {
        self.inner.contains_edge(u, v)
    }

    pub fn has_node(&self, n: NodeId) -> bool {
        self.inner.contains_node(n)
    }

    /// Remove the edge `u -> v`. Returns `true` if it was present.
    /// Endpoints left without any incident edge are removed with it.
    pub fn remove(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self.inner.remove_edge(u, v).is_some();
        if removed {
            self.prune_if_isolated(u);
            self.prune_if_isolated(v);
        }
        removed
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, n: NodeId) -> bool {
        // Neighbors may become isolated once their edges to n vanish.
        let neighbors: Vec<NodeId> = self
            .predecessors(n)
            .chain(self.successors(n))
            .collect();
        let removed = self.inner.remove_node(n);
        if removed {
            for m in neighbors {
                self.prune_if_isolated(m);
            }
        }
        removed
    }

    /// Remove a node while preserving reachability between its neighbors:
    /// every predecessor is connected directly to every successor before
    /// the node and its edges are deleted.
    pub fn contract_node(&mut self, n: NodeId) {
        // Snapshot before mutating; the bypass edges must come from a
        // consistent view of the adjacency.
        let preds: Vec<NodeId> = self.predecessors(n).collect();
        let succs: Vec<NodeId> = self.successors(n).collect();
        for &p in &preds {
            for &s in &succs {
                self.put(p, s);
            }
        }
        self.remove_node(n);
    }

    pub fn successors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors_directed(n, Direction::Outgoing)
    }

    pub fn predecessors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors_directed(n, Direction::Incoming)
    }

    /// Successors in ascending id order, for reproducible iteration.
    pub fn sorted_successors(&self, n: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.successors(n).collect();
        out.sort_unstable();
        out
    }

    /// Predecessors in ascending id order.
    pub fn sorted_predecessors(&self, n: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.predecessors(n).collect();
        out.sort_unstable();
        out
    }

    pub fn out_degree(&self, n: NodeId) -> usize {
        self.successors(n).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.nodes()
    }

    /// All nodes in ascending id order.
    pub fn sorted_nodes(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.nodes().collect();
        out.sort_unstable();
        out
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.inner.all_edges().map(|(u, v, _)| (u, v))
    }

    /// All edges sorted by (source, target) id.
    pub fn sorted_edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut out: Vec<(NodeId, NodeId)> = self.edges().collect();
        out.sort_unstable();
        out
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.edge_count() == 0
    }

    /// A new graph with every edge flipped.
    pub fn reverse(&self) -> Graph {
        let mut reversed = Graph::new();
        for (u, v) in self.edges() {
            reversed.put(v, u);
        }
        reversed
    }

    /// Transitive closure: contains `u -> w` whenever this graph has a
    /// directed path from `u` to `w` (self-paths excluded).
    ///
    /// Computed iteratively: a node's successor set is unioned into every
    /// predecessor's successor set, over nodes that have both predecessors
    /// and successors, until a whole pass adds no edge. This is the most
    /// expensive operation in the crate, up to O(V * E); callers invoke it
    /// once per use.
    pub fn transitive_closure(&self) -> Graph {
        let mut closure = self.clone();
        let mut changed = true;
        while changed {
            changed = false;
            for n in closure.sorted_nodes() {
                let succs = closure.sorted_successors(n);
                if succs.is_empty() {
                    continue;
                }
                let preds = closure.sorted_predecessors(n);
                for p in preds {
                    for &s in &succs {
                        if closure.put(p, s) {
                            changed = true;
                        }
                    }
                }
            }
        }
        closure
    }

    /// Set of nodes reachable from `starts` (including the starts
    /// themselves) by following edges forward.
    pub fn reachable_from(&self, starts: &[NodeId]) -> std::collections::HashSet<NodeId> {
        let mut seen = std::collections::HashSet::new();
        let mut queue: std::collections::VecDeque<NodeId> = starts
            .iter()
            .copied()
            .filter(|&n| self.has_node(n))
            .collect();
        for &n in &queue {
            seen.insert(n);
        }
        while let Some(n) = queue.pop_front() {
            for s in self.sorted_successors(n) {
                if seen.insert(s) {
                    queue.push_back(s);
                }
            }
        }
        seen
    }

    fn prune_if_isolated(&mut self, n: NodeId) {
        if self.inner.contains_node(n)
            && self.inner.neighbors_directed(n, Direction::Outgoing).next().is_none()
            && self.inner.neighbors_directed(n, Direction::Incoming).next().is_none()
        {
            self.inner.remove_node(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Indexer;
    use pretty_assertions::assert_eq;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut indexer = Indexer::new();
        (0..n)
            .map(|i| indexer.category_id(&format!("n{i}")))
            .collect()
    }

    #[test]
    fn put_and_remove_track_edge_count() {
        let v = ids(3);
        let mut g = Graph::new();
        assert!(g.put(v[0], v[1]));
        assert!(!g.put(v[0], v[1]));
        assert!(g.put(v[1], v[2]));
        assert_eq!(g.edge_count(), 2);

        assert!(g.remove(v[0], v[1]));
        assert!(!g.remove(v[0], v[1]));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_edges_are_ignored() {
        let v = ids(1);
        let mut g = Graph::new();
        assert!(!g.put(v[0], v[0]));
        assert!(g.is_empty());
    }

    #[test]
    fn isolated_nodes_disappear() {
        let v = ids(2);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.remove(v[0], v[1]);
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn reverse_flips_every_edge() {
        let v = ids(3);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);

        let r = g.reverse();
        assert!(r.contains(v[1], v[0]));
        assert!(r.contains(v[2], v[1]));
        assert_eq!(r.edge_count(), 2);
    }

    #[test]
    fn contraction_preserves_reachability() {
        let v = ids(5);
        let mut g = Graph::new();
        // p0, p1 -> b -> s0, s1
        g.put(v[0], v[2]);
        g.put(v[1], v[2]);
        g.put(v[2], v[3]);
        g.put(v[2], v[4]);

        g.contract_node(v[2]);

        assert!(!g.has_node(v[2]));
        for &p in &[v[0], v[1]] {
            for &s in &[v[3], v[4]] {
                assert!(g.contains(p, s), "lost reachability {p} -> {s}");
            }
        }
    }

    #[test]
    fn closure_contains_all_paths() {
        let v = ids(4);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[2], v[3]);

        let c = g.transitive_closure();
        assert!(c.contains(v[0], v[2]));
        assert!(c.contains(v[0], v[3]));
        assert!(c.contains(v[1], v[3]));
        assert_eq!(c.edge_count(), 6);
    }

    #[test]
    fn closure_of_diamond() {
        let v = ids(4);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[0], v[2]);
        g.put(v[1], v[3]);
        g.put(v[2], v[3]);

        let c = g.transitive_closure();
        assert!(c.contains(v[0], v[3]));
        assert_eq!(c.edge_count(), 5);
    }

    #[test]
    fn reachable_from_follows_edges_forward() {
        let v = ids(4);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[3], v[0]);

        let seen = g.reachable_from(&[v[0]]);
        assert!(seen.contains(&v[0]));
        assert!(seen.contains(&v[1]));
        assert!(seen.contains(&v[2]));
        assert!(!seen.contains(&v[3]));
    }
}
