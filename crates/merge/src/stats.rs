use serde::Serialize;

/// Per-stage counters for one merge run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MergeStats {
    /// Distinct category names seen in the input edge sets.
    pub categories: usize,
    /// Distinct ontology-class names seen in the input edge sets.
    pub classes: usize,
    /// Edges in the merged graph right after assembly.
    pub assembled_edges: usize,
    /// Ill-formed or unclassifiable categories removed by contraction.
    pub bad_categories_removed: usize,
    /// Edges discarded by the branch-consistency pruner.
    pub inconsistent_edges_dropped: usize,
    /// Unconnected nodes dropped for lack of a majority branch.
    pub nodes_dropped_no_majority: usize,
    /// Back edges removed while breaking cycles.
    pub cycle_edges_removed: usize,
    /// Edges removed by transitive reduction.
    pub redundant_edges_removed: usize,
    /// Nodes unreachable from the branch roots after reduction.
    pub orphaned_nodes: usize,
    /// Edges in the final taxonomy.
    pub output_edges: usize,
}
