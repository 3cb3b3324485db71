use serde::{Deserialize, Serialize};

/// Configuration for a merge run.
///
/// Passed explicitly into [`merge`](crate::merge); there is no process-wide
/// state. The CLI deserializes this struct straight from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Coarse semantic branch roots (ontology-class names). Every surviving
    /// node must be reachable from one of these.
    pub branch_roots: Vec<String>,

    /// Optional condensation: classes listed in one group are treated as a
    /// single branch for consistency checks (e.g. building + organization +
    /// location). Roots not covered by any group form singleton branches.
    #[serde(default)]
    pub branch_groups: Vec<Vec<String>>,

    /// Treat categories without a projected class as bad (removed by
    /// contraction) instead of leaving them to branch resolution.
    #[serde(default)]
    pub require_projected_class: bool,

    /// Stricter propagation: an edge between two visited same-branch nodes
    /// is kept only when the parent's supporting class equals or is a
    /// subclass of the child's recorded class.
    #[serde(default)]
    pub strict_class_check: bool,

    /// Remove nodes the connectivity check cannot reach from the branch
    /// roots. When off they are only reported.
    #[serde(default = "default_drop_unreachable")]
    pub drop_unreachable: bool,
}

fn default_drop_unreachable() -> bool {
    true
}

impl MergeConfig {
    pub fn new<I, S>(branch_roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            branch_roots: branch_roots.into_iter().map(Into::into).collect(),
            branch_groups: Vec::new(),
            require_projected_class: false,
            strict_class_check: false,
            drop_unreachable: true,
        }
    }
}
