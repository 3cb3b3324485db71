use thiserror::Error;

pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("graph error: {0}")]
    Graph(#[from] taxonomy_graph::GraphError),

    #[error("invalid classifier rule: {0}")]
    Rule(#[from] regex::Error),
}
