use crate::ids::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Lookup of an id that was never registered with the indexer.
    /// Hitting this is an invariant violation, not a data condition.
    #[error("unknown node id: {0}")]
    UnknownId(NodeId),
}
