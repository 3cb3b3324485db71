use crate::error::{GraphError, Result};
use crate::ids::NodeId;
use std::collections::HashMap;

/// Bijection between node names and [`NodeId`]s.
///
/// Categories and classes are allocated from separate id ranges (see
/// [`NodeId`]). Registration is idempotent: asking for a name that is
/// already registered returns the existing id, regardless of the kind it
/// was first registered under.
#[derive(Debug, Default, Clone)]
pub struct Indexer {
    categories: Vec<String>,
    classes: Vec<String>,
    by_name: HashMap<String, NodeId>,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-get the id for a category name.
    pub fn category_id(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = NodeId::category(self.categories.len());
        self.categories.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Create-or-get the id for an ontology-class name.
    pub fn class_id(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = NodeId::class(self.classes.len());
        self.classes.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Non-creating probe for a registered name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Name of a registered id.
    pub fn name_of(&self, id: NodeId) -> Result<&str> {
        let names = if id.is_category() {
            &self.categories
        } else {
            &self.classes
        };
        names
            .get(id.slot())
            .map(String::as_str)
            .ok_or(GraphError::UnknownId(id))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip() {
        let mut indexer = Indexer::new();
        let cat = indexer.category_id("Companies");
        let cls = indexer.class_id("wordnet_company");

        assert!(cat.is_category());
        assert!(cls.is_class());
        assert_eq!(indexer.name_of(cat).unwrap(), "Companies");
        assert_eq!(indexer.name_of(cls).unwrap(), "wordnet_company");
    }

    #[test]
    fn registration_is_idempotent() {
        let mut indexer = Indexer::new();
        let a = indexer.category_id("Companies");
        let b = indexer.category_id("Companies");
        assert_eq!(a, b);
        assert_eq!(indexer.category_count(), 1);

        // A name keeps its first id even when re-registered under the
        // other kind.
        let c = indexer.class_id("Companies");
        assert_eq!(a, c);
        assert_eq!(indexer.class_count(), 0);
    }

    #[test]
    fn distinct_names_never_collide() {
        let mut indexer = Indexer::new();
        let mut ids: Vec<_> = (0..100)
            .map(|i| indexer.category_id(&format!("Category {i}")))
            .collect();
        ids.extend((0..100).map(|i| indexer.class_id(&format!("class_{i}"))));

        let mut seen = std::collections::HashSet::new();
        for id in ids {
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut indexer = Indexer::new();
        indexer.category_id("Companies");
        let mut other = Indexer::new();
        other.category_id("A");
        other.category_id("B");
        let stray = other.category_id("C");
        assert_eq!(indexer.name_of(stray), Err(GraphError::UnknownId(stray)));
    }
}
