//! Error types for the socialgraph-engine crate.

use thiserror::Error;

use socialgraph_core::{CoreError, NodeKind, Relationship};
use socialgraph_graph::GraphError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{kind} {id} not found")]
    NotFound { kind: NodeKind, id: i64 },

    #[error("{kind} {id} already exists")]
    Conflict { kind: NodeKind, id: i64 },

    #[error("Graph backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The node was created but a later edge connect failed. The node stays,
    /// holding the `connected` edges made before the failure.
    #[error(
        "{kind} {id} created but {relationship} {source_id} -> {target_id} failed \
         after {connected} edge(s): {cause}"
    )]
    PartialMutation {
        kind: NodeKind,
        id: i64,
        relationship: Relationship,
        source_id: i64,
        target_id: i64,
        connected: usize,
        #[source]
        cause: GraphError,
    },

    #[error("Graph error: {0}")]
    Backend(#[source] GraphError),

    #[error("Invalid request: {0}")]
    Validation(#[from] CoreError),
}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotFound { kind, id } => Self::NotFound { kind, id },
            GraphError::Conflict { kind, id } => Self::Conflict { kind, id },
            GraphError::Connection(msg) => Self::BackendUnavailable(msg),
            other => Self::Backend(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_map_to_taxonomy() {
        let err: EngineError = GraphError::Conflict {
            kind: NodeKind::Group,
            id: 4,
        }
        .into();
        assert!(matches!(
            err,
            EngineError::Conflict {
                kind: NodeKind::Group,
                id: 4
            }
        ));
        assert_eq!(err.to_string(), "Group 4 already exists");

        let err: EngineError = GraphError::Connection("refused".to_string()).into();
        assert!(matches!(err, EngineError::BackendUnavailable(ref m) if m == "refused"));

        let err: EngineError = GraphError::Serialization("bad row".to_string()).into();
        assert!(matches!(err, EngineError::Backend(GraphError::Serialization(_))));
    }
}
