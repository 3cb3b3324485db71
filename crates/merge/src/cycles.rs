use std::collections::{BTreeSet, HashMap, HashSet};

use taxonomy_graph::{Graph, NodeId};

use crate::trace::{DropReason, TraceEvent, Tracer};

/// Break every strongly connected component by removing a small, determined
/// set of back edges.
///
/// Components come from an iterative Tarjan traversal (explicit frame
/// stack; index/lowlink in side maps) so deep chains cannot overflow the
/// call stack. Within a component, vertices are placed into a local
/// ordering one by one: always the vertex that would lose the fewest
/// not-yet-removed out-edges right now, preferring vertices already reduced
/// in this pass, then the smallest id. Placing a vertex removes its edges
/// into already-placed vertices — the later-to-earlier edges. Forward paths
/// through the rest of the component keep everything reachable, so removed
/// edges are discarded for good.
pub(crate) fn break_cycles(graph: &mut Graph, tracer: &mut Tracer<'_>) -> usize {
    let components = strongly_connected_components(graph);
    let mut reduced: HashSet<NodeId> = HashSet::new();
    let mut removed_total = 0usize;

    for component in components {
        if component.len() < 2 {
            continue;
        }
        removed_total += break_component(graph, &component, &mut reduced, tracer);
    }

    if removed_total > 0 {
        log::info!("Cycle breaking removed {removed_total} edges");
    }
    removed_total
}

fn break_component(
    graph: &mut Graph,
    component: &[NodeId],
    reduced: &mut HashSet<NodeId>,
    tracer: &mut Tracer<'_>,
) -> usize {
    let mut remaining: BTreeSet<NodeId> = component.iter().copied().collect();
    let mut placed: HashSet<NodeId> = HashSet::new();
    let mut removed = 0usize;

    while !remaining.is_empty() {
        // Cost of placing a vertex now = its edges into the placed region;
        // those are exactly the edges that would be removed.
        let next = remaining
            .iter()
            .copied()
            .min_by_key(|&v| {
                let backward = graph
                    .successors(v)
                    .filter(|s| placed.contains(s))
                    .count();
                (backward, !reduced.contains(&v), v)
            })
            .expect("non-empty remaining set");
        remaining.remove(&next);

        for succ in graph.sorted_successors(next) {
            if placed.contains(&succ) {
                graph.remove(next, succ);
                reduced.insert(next);
                removed += 1;
                tracer.record(TraceEvent::EdgeDropped {
                    from: next,
                    to: succ,
                    reason: DropReason::CycleBack,
                });
                log::debug!("Removed cycle edge {next} -> {succ}");
            }
        }
        placed.insert(next);
    }
    removed
}

struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    cursor: usize,
}

/// Iterative Tarjan. Returns components in the order they complete.
fn strongly_connected_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut index_of: HashMap<NodeId, usize> = HashMap::new();
    let mut lowlink: HashMap<NodeId, usize> = HashMap::new();
    let mut on_stack: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut next_index = 0usize;
    let mut components: Vec<Vec<NodeId>> = Vec::new();

    enum Step {
        Descend(NodeId),
        BackEdge(NodeId, NodeId),
        Skip,
        Done(NodeId),
    }

    for root in graph.sorted_nodes() {
        if index_of.contains_key(&root) {
            continue;
        }
        let mut frames: Vec<Frame> = Vec::new();
        visit(
            root, graph, &mut frames, &mut index_of, &mut lowlink, &mut stack, &mut on_stack,
            &mut next_index,
        );

        while !frames.is_empty() {
            let step = {
                let frame = frames.last_mut().expect("frame present");
                if frame.cursor < frame.successors.len() {
                    let next = frame.successors[frame.cursor];
                    frame.cursor += 1;
                    if !index_of.contains_key(&next) {
                        Step::Descend(next)
                    } else if on_stack.contains(&next) {
                        Step::BackEdge(frame.node, next)
                    } else {
                        Step::Skip
                    }
                } else {
                    Step::Done(frame.node)
                }
            };
            match step {
                Step::Descend(next) => visit(
                    next, graph, &mut frames, &mut index_of, &mut lowlink, &mut stack,
                    &mut on_stack, &mut next_index,
                ),
                Step::BackEdge(node, target) => {
                    let candidate = index_of[&target];
                    let low = lowlink.get_mut(&node).expect("lowlink present");
                    *low = (*low).min(candidate);
                }
                Step::Skip => {}
                Step::Done(node) => {
                    frames.pop();
                    if lowlink[&node] == index_of[&node] {
                        let mut component = Vec::new();
                        loop {
                            let member = stack.pop().expect("scc stack not empty");
                            on_stack.remove(&member);
                            component.push(member);
                            if member == node {
                                break;
                            }
                        }
                        components.push(component);
                    }
                    if let Some(parent) = frames.last() {
                        let parent_node = parent.node;
                        let child_low = lowlink[&node];
                        let low = lowlink.get_mut(&parent_node).expect("lowlink present");
                        *low = (*low).min(child_low);
                    }
                }
            }
        }
    }
    components
}

#[allow(clippy::too_many_arguments)]
fn visit(
    node: NodeId,
    graph: &Graph,
    frames: &mut Vec<Frame>,
    index_of: &mut HashMap<NodeId, usize>,
    lowlink: &mut HashMap<NodeId, usize>,
    stack: &mut Vec<NodeId>,
    on_stack: &mut HashSet<NodeId>,
    next_index: &mut usize,
) {
    index_of.insert(node, *next_index);
    lowlink.insert(node, *next_index);
    *next_index += 1;
    stack.push(node);
    on_stack.insert(node);
    frames.push(Frame {
        node,
        successors: graph.sorted_successors(node),
        cursor: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy_graph::Indexer;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut indexer = Indexer::new();
        (0..n)
            .map(|i| indexer.category_id(&format!("n{i}")))
            .collect()
    }

    fn is_acyclic(graph: &Graph) -> bool {
        let closure = graph.transitive_closure();
        graph.nodes().all(|n| !closure.contains(n, n))
    }

    #[test]
    fn finds_the_component() {
        let v = ids(4);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[2], v[0]);
        g.put(v[1], v[3]);

        let components = strongly_connected_components(&g);
        let cycle: Vec<_> = components.into_iter().filter(|c| c.len() > 1).collect();
        assert_eq!(cycle.len(), 1);
        let mut members = cycle[0].clone();
        members.sort_unstable();
        assert_eq!(members, vec![v[0], v[1], v[2]]);
    }

    #[test]
    fn triangle_loses_exactly_one_edge_and_keeps_the_exit() {
        let v = ids(4);
        let mut g = Graph::new();
        // A -> B -> C -> A, with B -> D leading out of the cycle.
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[2], v[0]);
        g.put(v[1], v[3]);

        let mut tracer = Tracer::new(None);
        let removed = break_cycles(&mut g, &mut tracer);

        assert_eq!(removed, 1);
        assert!(g.contains(v[1], v[3]), "exit edge must survive");
        assert!(is_acyclic(&g));
        // The removed edge is the back edge from the vertex with the
        // fewest remaining out-edges at decision time.
        assert!(!g.contains(v[2], v[0]));
        assert!(g.contains(v[0], v[1]));
        assert!(g.contains(v[1], v[2]));
    }

    #[test]
    fn two_cycle_is_broken_deterministically() {
        let v = ids(2);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[0]);

        let mut tracer = Tracer::new(None);
        let removed = break_cycles(&mut g, &mut tracer);
        assert_eq!(removed, 1);
        assert!(g.contains(v[0], v[1]));
        assert!(!g.contains(v[1], v[0]));
    }

    #[test]
    fn nested_cycles_end_up_acyclic() {
        let v = ids(6);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[2], v[0]);
        g.put(v[2], v[3]);
        g.put(v[3], v[4]);
        g.put(v[4], v[2]);
        g.put(v[4], v[5]);

        let mut tracer = Tracer::new(None);
        break_cycles(&mut g, &mut tracer);
        assert!(is_acyclic(&g));
        assert!(g.contains(v[4], v[5]), "exit edge must survive");
    }

    #[test]
    fn acyclic_graph_is_untouched() {
        let v = ids(4);
        let mut g = Graph::new();
        g.put(v[0], v[1]);
        g.put(v[1], v[2]);
        g.put(v[0], v[3]);

        let mut tracer = Tracer::new(None);
        let removed = break_cycles(&mut g, &mut tracer);
        assert_eq!(removed, 0);
        assert_eq!(g.edge_count(), 3);
    }
}
