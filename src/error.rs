use thiserror::Error;

/// Errors raised by structural operations on the graph store.
///
/// A store operation that returns one of these has not mutated the graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Node type '{0}' is not registered")]
    UnknownNodeType(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("Node id '{0}' is already in use")]
    DuplicateNodeId(String),

    #[error("Edge id '{0}' is already in use")]
    DuplicateEdgeId(String),

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which does not exist")]
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Field '{field}' on node '{node_id}' cannot be set: {message}")]
    InvalidField {
        node_id: String,
        field: String,
        message: String,
    },
}

/// Errors that can occur while importing a channel document or persisted state.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse channel document: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Channel document has no 'nodes' list")]
    MissingNodes,

    #[error("Channel document field 'nodes' must be an array")]
    NodesNotArray,

    #[error("Channel document field 'edges' must be an array")]
    EdgesNotArray,

    #[error("Node at index {index} is malformed: {message}")]
    MalformedNode { index: usize, message: String },

    #[error("Edge at index {index} is malformed: {message}")]
    MalformedEdge { index: usize, message: String },

    #[error("Channel document graph is inconsistent: {0}")]
    Integrity(#[from] StoreError),

    #[error("Failed to access '{path}': {message}")]
    Io { path: String, message: String },
}
