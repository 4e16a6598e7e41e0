#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("graph contains an edge with a missing endpoint: {edge_id}")]
    MissingEndpoint { edge_id: String },
    #[error("node {id} references unknown parent {parent}")]
    UnknownParent { id: String, parent: String },
    #[error("parent chain of node {id} forms a cycle")]
    ParentCycle { id: String },
    #[error("invalid topology document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
