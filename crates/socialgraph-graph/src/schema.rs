//! Uniqueness constraints derived from the node kind declarations.

use neo4rs::query;

use socialgraph_core::NodeKind;

use crate::client::{GraphClient, GraphError};

/// Cypher that enforces uniqueness of a node kind's identity property.
pub fn unique_constraint(kind: NodeKind) -> String {
    format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS
         FOR (n:{label}) REQUIRE n.{key} IS UNIQUE",
        name = format!("{}_{}_unique", kind.label().to_lowercase(), kind.key()),
        label = kind.label(),
        key = kind.key(),
    )
}

impl GraphClient {
    /// Install identity constraints for every node kind. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), GraphError> {
        for kind in NodeKind::ALL {
            self.run(query(&unique_constraint(kind))).await?;
            tracing::info!(label = kind.label(), key = kind.key(), "Ensured unique constraint");
        }
        Ok(())
    }
}
