use crate::foundation::ids::{NodeId, NodeKind};
use crate::scene::load::GraphErrors;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphErrors),

    #[error("invalid target type: node '{id}' is a {kind}")]
    InvalidTargetType { id: NodeId, kind: NodeKind },

    #[error(
        "containers only support shapes and child containers: container '{container}' has {kind} child '{child}'"
    )]
    UnsupportedContainerChild {
        container: NodeId,
        child: NodeId,
        kind: NodeKind,
    },

    #[error("node '{id}' is a {found}, expected {expected}")]
    UnexpectedKind {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("cyclic native object reference through '{0}'")]
    CyclicReference(NodeId),

    #[error("malformed method call in tween '{tween}': {message}")]
    MalformedCall { tween: NodeId, message: String },

    #[error("reference to unknown node '{0}'")]
    DanglingReference(NodeId),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchemaError {
    pub fn invalid_target(id: &NodeId, kind: NodeKind) -> Self {
        Self::InvalidTargetType {
            id: id.clone(),
            kind,
        }
    }

    pub fn unexpected_kind(id: &NodeId, expected: NodeKind, found: NodeKind) -> Self {
        Self::UnexpectedKind {
            id: id.clone(),
            expected,
            found,
        }
    }

    pub fn malformed_call(tween: &NodeId, message: impl Into<String>) -> Self {
        Self::MalformedCall {
            tween: tween.clone(),
            message: message.into(),
        }
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
