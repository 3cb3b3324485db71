use std::fmt;

/// Identifier of a taxonomy node.
///
/// The value is a signed integer: non-negative ids denote category nodes,
/// negative ids denote ontology-class nodes. The two universes grow
/// independently (categories 0, 1, 2, …; classes -1, -2, -3, …), which lets
/// the node kind be tested without a tag field. Only this module and the
/// [`Indexer`](crate::Indexer) construct raw values; everything else goes
/// through [`is_category`](NodeId::is_category) /
/// [`is_class`](NodeId::is_class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(i32);

impl NodeId {
    /// Category id for the given allocation slot.
    pub(crate) fn category(slot: usize) -> Self {
        debug_assert!(slot <= i32::MAX as usize);
        NodeId(slot as i32)
    }

    /// Class id for the given allocation slot.
    pub(crate) fn class(slot: usize) -> Self {
        debug_assert!(slot < i32::MAX as usize);
        NodeId(-(slot as i32) - 1)
    }

    pub fn is_category(self) -> bool {
        self.0 >= 0
    }

    pub fn is_class(self) -> bool {
        self.0 < 0
    }

    /// Allocation slot within the node's own universe.
    pub(crate) fn slot(self) -> usize {
        if self.0 >= 0 {
            self.0 as usize
        } else {
            (-(self.0 + 1)) as usize
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
