//! # Taxonomy Graph
//!
//! Integer-indexed directed graphs for taxonomy consolidation.
//!
//! ## Architecture
//!
//! ```text
//! Node names (categories, ontology classes)
//!     │
//!     ├──> Indexer (name <-> NodeId bijection)
//!     │      ├─ Categories count up from 0
//!     │      └─ Classes count down from -1
//!     │
//!     └──> Graph (petgraph DiGraphMap over NodeId)
//!            ├─ Edge algebra: put / remove / contract
//!            ├─ Reversal for downward traversal
//!            └─ Transitive closure (fixpoint)
//! ```
//!
//! The sign convention on [`NodeId`] is an implementation detail of this
//! crate: callers test node kind through [`NodeId::is_category`] and
//! [`NodeId::is_class`] and obtain ids only through the [`Indexer`].

mod error;
mod graph;
mod ids;
mod indexer;

pub use error::{GraphError, Result};
pub use graph::Graph;
pub use ids::NodeId;
pub use indexer::Indexer;
