use std::collections::{BTreeMap, BTreeSet, VecDeque};

use taxonomy_graph::{Graph, Indexer, NodeId};

use crate::classifier::CategoryClassifier;
use crate::error::Result;
use crate::trace::{DropReason, TraceEvent, Tracer};

/// Index into the effective branch-group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Branch(pub(crate) usize);

/// Why a node carries its branch: the branch itself, the ontology class
/// that supports the assignment, and the same-branch parents whose edges
/// into the node survived.
struct Visitor {
    branch: Branch,
    owning_class: NodeId,
    parents: BTreeSet<NodeId>,
}

pub(crate) struct PrunerOutcome {
    pub(crate) graph: Graph,
    pub(crate) edges_dropped: usize,
    pub(crate) no_majority_dropped: usize,
}

/// Propagate branch labels down from the branch-group classes and keep only
/// the edges that connect two nodes of the same branch.
///
/// Breadth-first over the reversed merged graph. A node reached from a
/// visited parent is attached immediately when its projected class agrees
/// with the parent's branch, and otherwise parked as not-yet-connected with
/// the parent remembered as a candidate. After each full pass the parked
/// nodes are resolved: first by their own projection, then by their
/// candidate parents — a class shared by several of them decides (most
/// specific shared class first), else a majority vote over their branches.
/// Rounds repeat until a resolution attaches nothing new; whatever is still
/// parked then has no majority branch and is dropped.
pub(crate) fn prune_branches(
    merged: &Graph,
    indexer: &mut Indexer,
    classifier: &dyn CategoryClassifier,
    groups: &[Vec<NodeId>],
    strict_class_check: bool,
    tracer: &mut Tracer<'_>,
) -> Result<PrunerOutcome> {
    let down = merged.reverse();
    let branch_of_class = classify_branches(&down, groups);
    let class_closure = class_subgraph(merged).transitive_closure();

    let mut pruner = Pruner {
        down,
        indexer,
        classifier,
        branch_of_class,
        class_closure,
        strict: strict_class_check,
        visited: BTreeMap::new(),
        pending: BTreeMap::new(),
        queue: VecDeque::new(),
        out: Graph::new(),
        edges_dropped: 0,
        no_majority_dropped: 0,
        tracer,
    };
    pruner.seed(merged, groups);
    let no_majority = pruner.run()?;

    // Nodes the propagation never reached drop silently with their edges.
    for node in merged.sorted_nodes() {
        if !pruner.visited.contains_key(&node) && !no_majority.contains(&node) {
            log::debug!("Node {node} never attached to a branch");
            pruner.tracer.record(TraceEvent::NodeDropped {
                node,
                reason: DropReason::Unattached,
            });
        }
    }

    let outcome = PrunerOutcome {
        graph: pruner.out,
        edges_dropped: pruner.edges_dropped,
        no_majority_dropped: pruner.no_majority_dropped,
    };
    log::info!(
        "Branch pruning kept {} edges; dropped {} edges, {} nodes without a majority branch",
        outcome.graph.edge_count(),
        outcome.edges_dropped,
        outcome.no_majority_dropped
    );
    Ok(outcome)
}

/// Branch label for every ontology class below a branch group, by BFS down
/// the reversed class hierarchy. The first assignment wins (group order,
/// then id order), so a class under two branches lands deterministically.
fn classify_branches(down: &Graph, groups: &[Vec<NodeId>]) -> BTreeMap<NodeId, Branch> {
    let mut map = BTreeMap::new();
    for (index, group) in groups.iter().enumerate() {
        let branch = Branch(index);
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for &class in group {
            if !map.contains_key(&class) {
                map.insert(class, branch);
                queue.push_back(class);
            }
        }
        while let Some(class) = queue.pop_front() {
            for sub in down.sorted_successors(class) {
                if sub.is_class() && !map.contains_key(&sub) {
                    map.insert(sub, branch);
                    queue.push_back(sub);
                }
            }
        }
    }
    map
}

/// Subgraph induced on class nodes (subclass -> superclass edges only).
fn class_subgraph(merged: &Graph) -> Graph {
    let mut classes = Graph::new();
    for (u, v) in merged.edges() {
        if u.is_class() && v.is_class() {
            classes.put(u, v);
        }
    }
    classes
}

struct Pruner<'a, 't> {
    down: Graph,
    indexer: &'a mut Indexer,
    classifier: &'a dyn CategoryClassifier,
    branch_of_class: BTreeMap<NodeId, Branch>,
    class_closure: Graph,
    strict: bool,
    visited: BTreeMap<NodeId, Visitor>,
    pending: BTreeMap<NodeId, BTreeSet<NodeId>>,
    queue: VecDeque<NodeId>,
    out: Graph,
    edges_dropped: usize,
    no_majority_dropped: usize,
    tracer: &'a mut Tracer<'t>,
}

impl Pruner<'_, '_> {
    fn seed(&mut self, merged: &Graph, groups: &[Vec<NodeId>]) {
        for (index, group) in groups.iter().enumerate() {
            for &class in group {
                if merged.has_node(class) && !self.visited.contains_key(&class) {
                    self.visited.insert(
                        class,
                        Visitor {
                            branch: Branch(index),
                            owning_class: class,
                            parents: BTreeSet::new(),
                        },
                    );
                    self.queue.push_back(class);
                }
            }
        }
    }

    /// Returns the nodes dropped for lack of a majority branch.
    fn run(&mut self) -> Result<BTreeSet<NodeId>> {
        loop {
            self.propagate()?;
            if self.resolve()? == 0 {
                break;
            }
        }
        // Whatever is still parked found no majority branch.
        let leftovers: BTreeSet<NodeId> = self.pending.keys().copied().collect();
        for &node in &leftovers {
            let candidates = self.pending.remove(&node).unwrap_or_default();
            for parent in candidates {
                self.drop_edge(node, parent, DropReason::NoMajorityBranch);
            }
            self.tracer.record(TraceEvent::NodeDropped {
                node,
                reason: DropReason::NoMajorityBranch,
            });
            self.no_majority_dropped += 1;
        }
        Ok(leftovers)
    }

    /// Breadth-first pass from the current queue.
    fn propagate(&mut self) -> Result<()> {
        while let Some(parent) = self.queue.pop_front() {
            let (branch, class) = {
                let visitor = &self.visited[&parent];
                (visitor.branch, visitor.owning_class)
            };
            for child in self.down.sorted_successors(parent) {
                if let Some(existing) = self.visited.get(&child) {
                    let (child_branch, child_class) = (existing.branch, existing.owning_class);
                    if child_branch == branch && self.class_ok(class, child_class) {
                        self.keep_edge(child, parent);
                    } else if child_branch == branch {
                        self.drop_edge(child, parent, DropReason::ClassMismatch);
                    } else {
                        self.drop_edge(child, parent, DropReason::CrossBranch);
                    }
                } else if child.is_class() {
                    // Class branches are fixed up front by the class
                    // hierarchy; disagreement means a bad subclass edge.
                    match self.branch_of_class.get(&child) {
                        Some(&b) if b == branch => self.visit(child, b, child, parent),
                        _ => self.drop_edge(child, parent, DropReason::CrossBranch),
                    }
                } else {
                    let name = self.indexer.name_of(child)?.to_string();
                    let projected = self.classifier.projected_class(&name);
                    let projected = projected.map(|class| self.indexer.class_id(&class));
                    match projected {
                        Some(class) if self.branch_of_class.get(&class) == Some(&branch) => {
                            self.visit(child, branch, class, parent);
                        }
                        _ => {
                            // Not yet connected; remember the candidate.
                            self.pending.entry(child).or_default().insert(parent);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve parked nodes. Returns how many were attached.
    fn resolve(&mut self) -> Result<usize> {
        let parked: Vec<NodeId> = self.pending.keys().copied().collect();
        let mut attached = 0usize;
        for node in parked {
            let candidates = match self.pending.get(&node) {
                Some(c) => c.clone(),
                None => continue,
            };

            // Attached meanwhile through another route: settle the
            // remembered candidate edges against the node's branch.
            if let Some(visitor) = self.visited.get(&node) {
                let (branch, class) = (visitor.branch, visitor.owning_class);
                self.pending.remove(&node);
                for parent in candidates {
                    let (pb, pc) = {
                        let p = &self.visited[&parent];
                        (p.branch, p.owning_class)
                    };
                    if pb == branch && self.class_ok(pc, class) {
                        self.keep_edge(node, parent);
                    } else if pb == branch {
                        self.drop_edge(node, parent, DropReason::ClassMismatch);
                    } else {
                        self.drop_edge(node, parent, DropReason::CrossBranch);
                    }
                }
                continue;
            }

            // Heuristic (a): the node's own projection names the branch.
            let name = self.indexer.name_of(node)?.to_string();
            let projected = self.classifier.projected_class(&name);
            let projected = projected.map(|class| self.indexer.class_id(&class));
            if let Some(class) = projected {
                if let Some(&branch) = self.branch_of_class.get(&class) {
                    self.attach(node, branch, class, &candidates, true);
                    attached += 1;
                    continue;
                }
            }

            // Heuristic (b): group candidate parents by their supporting
            // class. A class shared by more than one parent decides, the
            // most specific shared class first; without a shared class the
            // branches vote, unique maximum only.
            let mut by_class: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
            for &parent in &candidates {
                by_class
                    .entry(self.visited[&parent].owning_class)
                    .or_default()
                    .insert(parent);
            }
            let shared: Vec<(NodeId, usize)> = by_class
                .iter()
                .filter(|(_, parents)| parents.len() > 1)
                .map(|(&class, parents)| (class, parents.len()))
                .collect();
            if let Some(&first) = shared.first() {
                let (class, _) = shared[1..].iter().fold(first, |best, &cand| {
                    if self.more_specific(cand, best) {
                        cand
                    } else {
                        best
                    }
                });
                let branch = self.branch_of_class[&class];
                self.attach(node, branch, class, &candidates, false);
                attached += 1;
                continue;
            }

            let mut support: BTreeMap<Branch, BTreeSet<NodeId>> = BTreeMap::new();
            for &parent in &candidates {
                support
                    .entry(self.visited[&parent].branch)
                    .or_default()
                    .insert(parent);
            }
            let best = support.values().map(BTreeSet::len).max().unwrap_or(0);
            let winners: Vec<Branch> = support
                .iter()
                .filter(|(_, parents)| parents.len() == best)
                .map(|(&branch, _)| branch)
                .collect();
            if let [branch] = winners[..] {
                // Record the most specific class among the winning
                // branch's candidates.
                let in_branch: Vec<(NodeId, usize)> = by_class
                    .iter()
                    .filter(|(class, _)| self.branch_of_class.get(class) == Some(&branch))
                    .map(|(&class, parents)| (class, parents.len()))
                    .collect();
                let (class, _) = in_branch[1..].iter().fold(in_branch[0], |best, &cand| {
                    if self.more_specific(cand, best) {
                        cand
                    } else {
                        best
                    }
                });
                self.attach(node, branch, class, &candidates, false);
                attached += 1;
            }
            // A tie stays parked; a later round may bring more candidates.
        }
        Ok(attached)
    }

    /// Attach a parked node to a branch, keeping its same-branch candidate
    /// edges and discarding the rest, then re-enter propagation through it.
    /// A node whose branch came from its own projection and whose candidate
    /// edges all fell away hangs directly under the projected class.
    fn attach(
        &mut self,
        node: NodeId,
        branch: Branch,
        class: NodeId,
        candidates: &BTreeSet<NodeId>,
        from_projection: bool,
    ) {
        self.pending.remove(&node);
        let mut parents = BTreeSet::new();
        for &parent in candidates {
            if self.visited[&parent].branch == branch {
                parents.insert(parent);
            } else {
                self.drop_edge(node, parent, DropReason::CrossBranch);
            }
        }
        if parents.is_empty() && from_projection {
            parents.insert(class);
        }
        for &parent in &parents {
            self.out.put(node, parent);
        }
        self.visited.insert(
            node,
            Visitor {
                branch,
                owning_class: class,
                parents,
            },
        );
        self.queue.push_back(node);
    }

    fn visit(&mut self, node: NodeId, branch: Branch, class: NodeId, parent: NodeId) {
        let mut parents = BTreeSet::new();
        parents.insert(parent);
        self.visited.insert(
            node,
            Visitor {
                branch,
                owning_class: class,
                parents,
            },
        );
        self.out.put(node, parent);
        self.queue.push_back(node);
    }

    fn keep_edge(&mut self, child: NodeId, parent: NodeId) {
        self.out.put(child, parent);
        if let Some(visitor) = self.visited.get_mut(&child) {
            visitor.parents.insert(parent);
        }
    }

    fn drop_edge(&mut self, child: NodeId, parent: NodeId, reason: DropReason) {
        log::debug!("Dropping edge {child} -> {parent}: {reason:?}");
        self.edges_dropped += 1;
        self.tracer.record(TraceEvent::EdgeDropped {
            from: child,
            to: parent,
            reason,
        });
    }

    /// Strict mode: the parent's supporting class must equal or be a
    /// subclass of the child's recorded class.
    fn class_ok(&self, parent_class: NodeId, child_class: NodeId) -> bool {
        if !self.strict {
            return true;
        }
        parent_class == child_class || self.class_closure.contains(parent_class, child_class)
    }

    /// Whether shared-class candidate `a` beats `b`: a strict subclass
    /// wins; otherwise the larger support count, keeping `b` on a full tie.
    fn more_specific(&self, a: (NodeId, usize), b: (NodeId, usize)) -> bool {
        if self.class_closure.contains(a.0, b.0) {
            return true;
        }
        if self.class_closure.contains(b.0, a.0) {
            return false;
        }
        a.1 > b.1
    }
}
