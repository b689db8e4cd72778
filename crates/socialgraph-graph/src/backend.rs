//! The operations the access engine needs from a property-graph store.

use async_trait::async_trait;

use socialgraph_core::{
    Group, GroupId, GroupSummary, Page, Relationship, User, UserId, UserSummary,
};

use crate::client::{GraphClient, GraphError};

/// Property-graph backend for the social graph.
///
/// Implemented by the Neo4j `GraphClient` and by `InMemoryGraph`.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Users with the ids they follow, in one aggregation pass.
    async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>, GraphError>;

    /// Groups with the ids of their subscribers, in one aggregation pass.
    async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>, GraphError>;

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, GraphError>;

    async fn find_group(&self, group_id: GroupId) -> Result<Option<Group>, GraphError>;

    /// Map ids to existing users, dropping ids with no node.
    async fn resolve_users(&self, ids: &[UserId]) -> Result<Vec<User>, GraphError>;

    /// Map ids to existing groups, dropping ids with no node.
    async fn resolve_groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, GraphError>;

    /// Outgoing FOLLOWS targets.
    async fn following(&self, user_id: UserId) -> Result<Vec<User>, GraphError>;

    /// Outgoing SUBSCRIBES targets.
    async fn subscriptions(&self, user_id: UserId) -> Result<Vec<Group>, GraphError>;

    /// Incoming SUBSCRIBES sources.
    async fn subscribers(&self, group_id: GroupId) -> Result<Vec<User>, GraphError>;

    /// Create a user; `GraphError::Conflict` if the id is taken.
    async fn create_user(&self, user: &User) -> Result<(), GraphError>;

    /// Create a group; `GraphError::Conflict` if the id is taken.
    async fn create_group(&self, group: &Group) -> Result<(), GraphError>;

    /// Merge a directed edge; `GraphError::NotFound` if an endpoint is gone.
    async fn link(
        &self,
        rel: Relationship,
        source_id: UserId,
        target_id: i64,
    ) -> Result<(), GraphError>;

    /// Detach-delete a user. Returns whether a node was removed.
    async fn delete_user(&self, user_id: UserId) -> Result<bool, GraphError>;

    /// Detach-delete a group. Returns whether a node was removed.
    async fn delete_group(&self, group_id: GroupId) -> Result<bool, GraphError>;
}

#[async_trait]
impl GraphBackend for GraphClient {
    async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>, GraphError> {
        GraphClient::list_users(self, page).await
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>, GraphError> {
        GraphClient::list_groups(self, page).await
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, GraphError> {
        GraphClient::find_user(self, user_id).await
    }

    async fn find_group(&self, group_id: GroupId) -> Result<Option<Group>, GraphError> {
        GraphClient::find_group(self, group_id).await
    }

    async fn resolve_users(&self, ids: &[UserId]) -> Result<Vec<User>, GraphError> {
        GraphClient::resolve_users(self, ids).await
    }

    async fn resolve_groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, GraphError> {
        GraphClient::resolve_groups(self, ids).await
    }

    async fn following(&self, user_id: UserId) -> Result<Vec<User>, GraphError> {
        GraphClient::following(self, user_id).await
    }

    async fn subscriptions(&self, user_id: UserId) -> Result<Vec<Group>, GraphError> {
        GraphClient::subscriptions(self, user_id).await
    }

    async fn subscribers(&self, group_id: GroupId) -> Result<Vec<User>, GraphError> {
        GraphClient::subscribers(self, group_id).await
    }

    async fn create_user(&self, user: &User) -> Result<(), GraphError> {
        GraphClient::create_user(self, user).await
    }

    async fn create_group(&self, group: &Group) -> Result<(), GraphError> {
        GraphClient::create_group(self, group).await
    }

    async fn link(
        &self,
        rel: Relationship,
        source_id: UserId,
        target_id: i64,
    ) -> Result<(), GraphError> {
        GraphClient::link(self, rel, source_id, target_id).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, GraphError> {
        GraphClient::delete_user(self, user_id).await
    }

    async fn delete_group(&self, group_id: GroupId) -> Result<bool, GraphError> {
        GraphClient::delete_group(self, group_id).await
    }
}
