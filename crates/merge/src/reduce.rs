use std::collections::HashMap;

use taxonomy_graph::{Graph, NodeId};

use crate::trace::{DropReason, TraceEvent, Tracer};

/// Remove every edge that is implied by a longer path.
///
/// The closure is computed once, up front, and the redundancy test for
/// each edge runs against the pre-reduction successor lists: edge `(i, j)`
/// goes when `i` has another direct successor `k != j` that reaches `j`.
/// On the acyclic graph this stage receives, that yields the canonical
/// transitive reduction, so running the pass twice changes nothing.
pub(crate) fn reduce_transitive(graph: &mut Graph, tracer: &mut Tracer<'_>) -> usize {
    let closure = graph.transitive_closure();
    let edges = graph.sorted_edges();
    let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for &(u, v) in &edges {
        successors.entry(u).or_default().push(v);
    }

    let mut removed = 0usize;
    for (i, j) in edges {
        let implied = successors[&i]
            .iter()
            .any(|&k| k != j && closure.contains(k, j));
        if implied {
            graph.remove(i, j);
            removed += 1;
            tracer.record(TraceEvent::EdgeDropped {
                from: i,
                to: j,
                reason: DropReason::Redundant,
            });
            log::debug!("Removed redundant edge {i} -> {j}");
        }
    }

    if removed > 0 {
        log::info!("Transitive reduction removed {removed} edges");
    }
    removed
}
