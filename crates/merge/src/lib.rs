//! # Taxonomy Merge
//!
//! Consolidation of the raw Wikipedia category hierarchy with an ontology
//! class hierarchy into one coherent, cycle-free taxonomy.
//!
//! ## Pipeline
//!
//! ```text
//! category->class, category->category, class->class edges
//!     │
//!     ├──> Hierarchy Assembler
//!     │      └─ one raw graph, bounded to classified subtrees
//!     │
//!     ├──> Bad-Category Remover
//!     │      └─ contraction of ill-formed categories
//!     │
//!     ├──> Branch-Consistency Pruner
//!     │      └─ one coarse semantic branch per node
//!     │
//!     ├──> Cycle Breaker (iterative Tarjan)
//!     │
//!     ├──> Transitive Reducer
//!     │
//!     └──> Connectivity Checker
//!            └─ every node reachable from a branch root
//! ```
//!
//! ## Example
//!
//! ```
//! use taxonomy_merge::{merge, MergeConfig, MergeInput, RuleClassifier};
//!
//! let input = MergeInput {
//!     category_to_class: vec![("Companies".into(), "wordnet_organization".into())],
//!     category_hierarchy: vec![("German companies".into(), "Companies".into())],
//!     class_hierarchy: vec![],
//! };
//! let config = MergeConfig::new(["wordnet_organization"]);
//! let mut classifier = RuleClassifier::new();
//! classifier.add_projection("Companies", "wordnet_organization");
//! classifier.add_projection("German companies", "wordnet_organization");
//!
//! let outcome = merge(&input, &config, &classifier, None).unwrap();
//! assert_eq!(outcome.facts.len(), 2);
//! ```

mod assembler;
mod branches;
mod classifier;
mod cleaner;
mod config;
mod connectivity;
mod cycles;
mod error;
mod merge;
mod reduce;
mod stats;
mod trace;

pub use classifier::{CategoryClassifier, RuleClassifier};
pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use merge::{merge, EdgeKind, Fact, MergeInput, MergeOutcome};
pub use stats::MergeStats;
pub use trace::{DropReason, TraceEvent, TraceSink, VecSink};

// The graph substrate types, re-exported for trace consumers.
pub use taxonomy_graph::{Graph, Indexer, NodeId};
