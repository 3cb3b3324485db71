use taxonomy_graph::{Graph, NodeId};

use crate::trace::{DropReason, TraceEvent, Tracer};

pub(crate) struct ConnectivityReport {
    pub(crate) reachable: usize,
    pub(crate) orphans: Vec<NodeId>,
}

/// Verify that every surviving node can be reached downward from the
/// branch roots. Unreached nodes are structural defects: reported always,
/// removed when `drop_unreachable` is set.
pub(crate) fn check_connectivity(
    graph: &mut Graph,
    roots: &[NodeId],
    drop_unreachable: bool,
    tracer: &mut Tracer<'_>,
) -> ConnectivityReport {
    let down = graph.reverse();
    let reached = down.reachable_from(roots);

    let orphans: Vec<NodeId> = graph
        .sorted_nodes()
        .into_iter()
        .filter(|n| !reached.contains(n))
        .collect();

    if orphans.is_empty() {
        log::info!("Connectivity check: all {} nodes reachable", reached.len());
    } else {
        log::warn!(
            "Connectivity check: {} of {} nodes unreachable from the branch roots{}",
            orphans.len(),
            graph.node_count(),
            if drop_unreachable { " (dropping)" } else { "" }
        );
    }
    for &node in &orphans {
        log::debug!("Orphaned node {node}");
        tracer.record(TraceEvent::NodeDropped {
            node,
            reason: DropReason::Orphaned,
        });
        if drop_unreachable {
            graph.remove_node(node);
        }
    }

    ConnectivityReport {
        reachable: reached.len(),
        orphans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy_graph::Indexer;

    fn build() -> (Graph, Vec<NodeId>, NodeId) {
        let mut indexer = Indexer::new();
        let root = indexer.class_id("wordnet_organization");
        let a = indexer.category_id("Companies");
        let b = indexer.category_id("German companies");
        let stray = indexer.category_id("Stray");
        let stray2 = indexer.category_id("Also stray");

        let mut g = Graph::new();
        g.put(a, root);
        g.put(b, a);
        g.put(stray, stray2);
        (g, vec![root, a, b], stray)
    }

    #[test]
    fn orphans_are_dropped_when_configured() {
        let (mut g, connected, stray) = build();
        let mut tracer = Tracer::new(None);
        let report = check_connectivity(&mut g, &[connected[0]], true, &mut tracer);

        assert_eq!(report.reachable, 3);
        assert_eq!(report.orphans.len(), 2);
        assert!(!g.has_node(stray));
        for n in connected {
            assert!(g.has_node(n));
        }
    }

    #[test]
    fn orphans_are_only_reported_when_not_dropping() {
        let (mut g, connected, stray) = build();
        let mut tracer = Tracer::new(None);
        let report = check_connectivity(&mut g, &[connected[0]], false, &mut tracer);

        assert_eq!(report.orphans.len(), 2);
        assert!(g.has_node(stray));
    }
}
