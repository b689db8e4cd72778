//! socialgraph-engine: the graph access engine.
//!
//! Implements list/get/create/delete for Users and Groups on top of any
//! `GraphBackend`. The engine is stateless: every operation is a short,
//! sequential series of backend round trips with no retry and no rollback.

pub mod error;
pub mod request;

mod groups;
mod users;

pub use error::{EngineError, Result};
pub use request::{CreateGroupRequest, CreateUserRequest};

use socialgraph_core::{NodeKind, Relationship};
use socialgraph_graph::GraphBackend;

/// An edge still to be made after a node is created.
#[derive(Debug, Clone, Copy)]
struct PendingEdge {
    rel: Relationship,
    source_id: i64,
    target_id: i64,
}

/// The graph access engine.
pub struct AccessEngine<B> {
    backend: B,
}

impl<B: GraphBackend> AccessEngine<B> {
    /// Create an engine over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend this engine reads and writes through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Connect every pending edge of a freshly created node, in order.
    ///
    /// The node already exists, so the first failure is reported as
    /// `PartialMutation` and the remaining edges are not attempted.
    async fn connect_all(&self, kind: NodeKind, id: i64, edges: &[PendingEdge]) -> Result<()> {
        for (connected, edge) in edges.iter().enumerate() {
            if let Err(cause) = self
                .backend
                .link(edge.rel, edge.source_id, edge.target_id)
                .await
            {
                tracing::warn!(
                    label = kind.label(),
                    id,
                    rel = edge.rel.rel_type(),
                    target_id = edge.target_id,
                    connected,
                    error = %cause,
                    "Node left partially connected"
                );
                return Err(EngineError::PartialMutation {
                    kind,
                    id,
                    relationship: edge.rel,
                    source_id: edge.source_id,
                    target_id: edge.target_id,
                    connected,
                    cause,
                });
            }
        }
        Ok(())
    }
}
