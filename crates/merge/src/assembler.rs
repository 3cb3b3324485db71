use std::collections::{BTreeMap, BTreeSet};

use taxonomy_graph::{Graph, NodeId};

/// Merge the three input edge sets into one raw graph, bounded to the
/// subgraph that is semantically anchored by a classified category.
///
/// Edge orientation everywhere is child -> parent (subcategory ->
/// supercategory, category -> class, subclass -> superclass).
pub(crate) fn assemble(
    category_to_class: &BTreeSet<(NodeId, NodeId)>,
    category_hierarchy: &Graph,
    class_hierarchy: &Graph,
) -> Graph {
    // Phase 1: parent -> children lookup for downward traversal.
    let down = category_hierarchy.reverse();

    // Phase 2: every category with a direct class edge anchors itself and
    // all of its descendants. Categories with no classified ancestor are
    // dropped entirely.
    let classified: Vec<NodeId> = {
        let set: BTreeSet<NodeId> = category_to_class.iter().map(|&(cat, _)| cat).collect();
        set.into_iter().collect()
    };
    let anchored = down.reachable_from(&classified);
    // Classified leaves may not appear in the category hierarchy at all.
    let anchored: BTreeSet<NodeId> = anchored
        .into_iter()
        .chain(classified.iter().copied())
        .collect();

    let mut merged = Graph::new();
    for (child, parent) in category_hierarchy.sorted_edges() {
        if anchored.contains(&parent) {
            merged.put(child, parent);
        }
    }

    // Phase 3: per class, attach only the root categories — those not
    // reachable downward from another category attached to the same class.
    // This pins a class to the top of a category chain instead of to every
    // link in it.
    let mut by_class: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
    for &(cat, class) in category_to_class {
        by_class.entry(class).or_default().insert(cat);
    }
    let mut attachments = 0usize;
    for (class, cats) in &by_class {
        let mut covered: BTreeSet<NodeId> = BTreeSet::new();
        if cats.len() > 1 {
            for &cat in cats {
                let below = down.reachable_from(&[cat]);
                for &other in cats {
                    if other != cat && below.contains(&other) {
                        covered.insert(other);
                    }
                }
            }
        }
        for &cat in cats {
            if !covered.contains(&cat) {
                merged.put(cat, *class);
                attachments += 1;
            }
        }
    }

    // Phase 4: carry the class hierarchy so branch propagation can descend
    // from the branch roots to the attached leaf classes.
    for (sub, sup) in class_hierarchy.sorted_edges() {
        merged.put(sub, sup);
    }

    log::info!(
        "Assembled hierarchy: {} nodes, {} edges ({} anchored categories, {} class attachments)",
        merged.node_count(),
        merged.edge_count(),
        anchored.len(),
        attachments
    );
    merged
}
