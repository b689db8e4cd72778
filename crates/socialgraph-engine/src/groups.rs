//! Group operations.

use socialgraph_core::{GroupDetail, GroupId, GroupSummary, NewGroup, NodeKind, Page, Relationship};
use socialgraph_graph::GraphBackend;

use crate::error::{EngineError, Result};
use crate::{AccessEngine, PendingEdge};

impl<B: GraphBackend> AccessEngine<B> {
    /// Page through groups, each with the ids of its subscribers.
    pub async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>> {
        Ok(self.backend.list_groups(page).await?)
    }

    /// A group with its subscribers expanded.
    pub async fn get_group(&self, group_id: GroupId) -> Result<GroupDetail> {
        let group = self
            .backend
            .find_group(group_id)
            .await?
            .ok_or(EngineError::NotFound {
                kind: NodeKind::Group,
                id: group_id,
            })?;

        let subscribers = self.backend.subscribers(group_id).await?;
        Ok(GroupDetail { group, subscribers })
    }

    /// Create a group and subscribe the users that resolve to it.
    pub async fn create_group(&self, new_group: NewGroup) -> Result<GroupDetail> {
        let NewGroup { group, subscribers } = new_group;

        let subscribers = self.backend.resolve_users(&subscribers).await?;

        self.backend.create_group(&group).await?;

        // SUBSCRIBES always points from the user to the group.
        let edges: Vec<PendingEdge> = subscribers
            .iter()
            .map(|user| PendingEdge {
                rel: Relationship::Subscribes,
                source_id: user.user_id,
                target_id: group.group_id,
            })
            .collect();
        self.connect_all(NodeKind::Group, group.group_id, &edges).await?;

        tracing::info!(
            group_id = group.group_id,
            subscribers = subscribers.len(),
            "Created group"
        );

        Ok(GroupDetail { group, subscribers })
    }

    /// Delete a group and all of its edges.
    pub async fn delete_group(&self, group_id: GroupId) -> Result<()> {
        if !self.backend.delete_group(group_id).await? {
            return Err(EngineError::NotFound {
                kind: NodeKind::Group,
                id: group_id,
            });
        }
        tracing::info!(group_id, "Deleted group");
        Ok(())
    }
}
