use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Node {node_id} is missing required field `{field}`")]
    MissingField { node_id: String, field: &'static str },

    #[error("Unsupported node kind `{kind}` (node {node_id})")]
    UnsupportedNodeKind { node_id: String, kind: String },

    #[error("Duplicate {kind} registered: {id}")]
    DuplicateEntity { kind: &'static str, id: String },

    #[error("Node not registered: {0}")]
    UnregisteredNode(String),

    #[error("Invalid vector path on node {node_id}: {source}")]
    InvalidPath {
        node_id: String,
        #[source]
        source: crate::geometry::PathError,
    },

    #[error("Shape {0} added outside of a page")]
    OutsidePage(uuid::Uuid),

    #[error(
        "Font \"{family}\" ({variant}) is not available on the target platform. \
         Upload it to the team fonts and run the sync again."
    )]
    MissingFont { family: String, variant: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl ConvertError {
    pub fn missing(node_id: &str, field: &'static str) -> Self {
        ConvertError::MissingField {
            node_id: node_id.to_string(),
            field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
