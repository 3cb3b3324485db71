use taxonomy_graph::{Graph, Indexer};

use crate::classifier::CategoryClassifier;
use crate::error::Result;
use crate::trace::{TraceEvent, Tracer};

/// Remove ill-formed or unclassifiable category nodes by contraction.
///
/// A bad node is never just deleted: its predecessors are wired directly to
/// its successors first, so every reachability relationship that passed
/// through it survives. Category ids are visited in ascending order; the
/// final reachability set does not depend on the order, the trace does.
pub(crate) fn remove_bad_categories(
    graph: &mut Graph,
    indexer: &Indexer,
    classifier: &dyn CategoryClassifier,
    require_projected_class: bool,
    tracer: &mut Tracer<'_>,
) -> Result<usize> {
    let categories: Vec<_> = graph
        .sorted_nodes()
        .into_iter()
        .filter(|n| n.is_category())
        .collect();

    let mut removed = 0usize;
    for node in categories {
        let name = indexer.name_of(node)?;
        let bad = !classifier.is_well_formed(name)
            || (require_projected_class && classifier.projected_class(name).is_none());
        if bad {
            log::debug!("Contracting bad category {node} ({name})");
            graph.contract_node(node);
            tracer.record(TraceEvent::NodeContracted { node });
            removed += 1;
        }
    }

    log::info!(
        "Removed {} bad categories; {} nodes, {} edges remain",
        removed,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(removed)
}
