use std::collections::BTreeSet;

use serde::Serialize;
use taxonomy_graph::{Graph, Indexer, NodeId};

use crate::classifier::CategoryClassifier;
use crate::config::MergeConfig;
use crate::error::Result;
use crate::stats::MergeStats;
use crate::trace::{TraceSink, Tracer};
use crate::{assembler, branches, cleaner, connectivity, cycles, reduce};

/// The three raw edge sets, as name pairs. Orientation is child -> parent
/// throughout: subcategory -> supercategory, category -> class,
/// subclass -> superclass.
#[derive(Debug, Default, Clone)]
pub struct MergeInput {
    pub category_to_class: Vec<(String, String)>,
    pub category_hierarchy: Vec<(String, String)>,
    pub class_hierarchy: Vec<(String, String)>,
}

/// Kind of an output edge, derived purely from its endpoint node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeKind {
    CategoryToCategory,
    CategoryToClass,
    ClassToClass,
}

/// One edge of the consolidated taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub subject: String,
    pub object: String,
    pub kind: EdgeKind,
}

/// Result of a merge run: the surviving taxonomy edges, per-stage
/// counters, and the indexer (for resolving ids recorded in trace events).
pub struct MergeOutcome {
    pub facts: Vec<Fact>,
    pub stats: MergeStats,
    pub indexer: Indexer,
}

/// Merge the category hierarchy with the ontology class hierarchy into one
/// cycle-free, branch-consistent taxonomy.
///
/// One-shot batch transformation: reads the input edge sets fully into
/// memory, runs the six pipeline stages in order, and produces the output
/// edge set. Deterministic for identical inputs; all tie-breaks are
/// numeric-id order. The optional trace sink observes edge and node drops
/// but never influences them.
pub fn merge(
    input: &MergeInput,
    config: &MergeConfig,
    classifier: &dyn CategoryClassifier,
    trace: Option<&mut dyn TraceSink>,
) -> Result<MergeOutcome> {
    let mut tracer = Tracer::new(trace);
    let mut indexer = Indexer::new();

    let mut category_to_class: BTreeSet<(NodeId, NodeId)> = BTreeSet::new();
    for (cat, class) in &input.category_to_class {
        let c = indexer.category_id(cat);
        let k = indexer.class_id(class);
        category_to_class.insert((c, k));
    }
    let mut category_hierarchy = Graph::new();
    for (child, parent) in &input.category_hierarchy {
        let c = indexer.category_id(child);
        let p = indexer.category_id(parent);
        category_hierarchy.put(c, p);
    }
    let mut class_hierarchy = Graph::new();
    for (sub, sup) in &input.class_hierarchy {
        let s = indexer.class_id(sub);
        let p = indexer.class_id(sup);
        class_hierarchy.put(s, p);
    }

    let mut stats = MergeStats {
        categories: indexer.category_count(),
        classes: indexer.class_count(),
        ..MergeStats::default()
    };
    log::info!(
        "Indexed {} categories, {} classes",
        stats.categories,
        stats.classes
    );

    let groups = effective_groups(config, &mut indexer);

    let mut graph = assembler::assemble(&category_to_class, &category_hierarchy, &class_hierarchy);
    stats.assembled_edges = graph.edge_count();

    stats.bad_categories_removed = cleaner::remove_bad_categories(
        &mut graph,
        &indexer,
        classifier,
        config.require_projected_class,
        &mut tracer,
    )?;

    let pruned = branches::prune_branches(
        &graph,
        &mut indexer,
        classifier,
        &groups,
        config.strict_class_check,
        &mut tracer,
    )?;
    stats.inconsistent_edges_dropped = pruned.edges_dropped;
    stats.nodes_dropped_no_majority = pruned.no_majority_dropped;
    let mut graph = pruned.graph;

    stats.cycle_edges_removed = cycles::break_cycles(&mut graph, &mut tracer);
    stats.redundant_edges_removed = reduce::reduce_transitive(&mut graph, &mut tracer);

    let roots: Vec<NodeId> = groups.iter().flatten().copied().collect();
    let report =
        connectivity::check_connectivity(&mut graph, &roots, config.drop_unreachable, &mut tracer);
    stats.orphaned_nodes = report.orphans.len();
    stats.output_edges = graph.edge_count();

    let mut facts = Vec::with_capacity(graph.edge_count());
    for (u, v) in graph.sorted_edges() {
        facts.push(Fact {
            subject: indexer.name_of(u)?.to_string(),
            object: indexer.name_of(v)?.to_string(),
            kind: kind_of(u, v),
        });
    }
    log::info!("Merge complete: {} facts", facts.len());

    Ok(MergeOutcome {
        facts,
        stats,
        indexer,
    })
}

/// Effective branch groups: the configured condensation groups first, then
/// a singleton group for every branch root not covered by one.
fn effective_groups(config: &MergeConfig, indexer: &mut Indexer) -> Vec<Vec<NodeId>> {
    let mut groups: Vec<Vec<NodeId>> = Vec::new();
    for group in &config.branch_groups {
        let mut seen = BTreeSet::new();
        let ids: Vec<NodeId> = group
            .iter()
            .map(|class| indexer.class_id(class))
            .filter(|&id| seen.insert(id))
            .collect();
        if !ids.is_empty() {
            groups.push(ids);
        }
    }
    for root in &config.branch_roots {
        let id = indexer.class_id(root);
        if !groups.iter().any(|g| g.contains(&id)) {
            groups.push(vec![id]);
        }
    }
    groups
}

// A class never points at a category: assembly only produces
// category->category, category->class and class->class edges, and
// contraction bypasses cannot invent a class->category pair because
// nothing ever points from a class into a category.
fn kind_of(u: NodeId, v: NodeId) -> EdgeKind {
    match (u.is_class(), v.is_class()) {
        (false, false) => EdgeKind::CategoryToCategory,
        (false, true) => EdgeKind::CategoryToClass,
        (true, _) => EdgeKind::ClassToClass,
    }
}
