//! In-memory implementation of `GraphBackend`.
//!
//! Mirrors the Neo4j semantics the engine depends on: unique identities,
//! merged edges, detach delete, and id-ordered skip/limit listing. Used as
//! the test double for engine tests and for running without a database.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use socialgraph_core::{
    Group, GroupId, GroupSummary, NodeKind, Page, Relationship, User, UserId, UserSummary,
};

use crate::backend::GraphBackend;
use crate::client::GraphError;

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    /// (follower, followed)
    follows: BTreeSet<(UserId, UserId)>,
    /// (user, group)
    subscribes: BTreeSet<(UserId, GroupId)>,
}

/// A graph held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    state: RwLock<State>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored edges of one relationship kind.
    pub async fn edge_count(&self, rel: Relationship) -> usize {
        let state = self.state.read().await;
        match rel {
            Relationship::Follows => state.follows.len(),
            Relationship::Subscribes => state.subscribes.len(),
        }
    }
}

fn window<T>(items: impl Iterator<Item = T>, page: Page) -> impl Iterator<Item = T> {
    items.skip(page.offset as usize).take(page.limit as usize)
}

#[async_trait]
impl GraphBackend for InMemoryGraph {
    async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>, GraphError> {
        let state = self.state.read().await;
        let summaries = window(state.users.values(), page)
            .map(|user| UserSummary {
                user: user.clone(),
                friends: state
                    .follows
                    .iter()
                    .filter(|(from, _)| *from == user.user_id)
                    .map(|(_, to)| *to)
                    .collect(),
            })
            .collect();
        Ok(summaries)
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>, GraphError> {
        let state = self.state.read().await;
        let summaries = window(state.groups.values(), page)
            .map(|group| GroupSummary {
                group: group.clone(),
                members: state
                    .subscribes
                    .iter()
                    .filter(|(_, to)| *to == group.group_id)
                    .map(|(from, _)| *from)
                    .collect(),
            })
            .collect();
        Ok(summaries)
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, GraphError> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn find_group(&self, group_id: GroupId) -> Result<Option<Group>, GraphError> {
        Ok(self.state.read().await.groups.get(&group_id).cloned())
    }

    async fn resolve_users(&self, ids: &[UserId]) -> Result<Vec<User>, GraphError> {
        let state = self.state.read().await;
        let wanted: BTreeSet<_> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.users.get(&id).cloned())
            .collect())
    }

    async fn resolve_groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, GraphError> {
        let state = self.state.read().await;
        let wanted: BTreeSet<_> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.groups.get(&id).cloned())
            .collect())
    }

    async fn following(&self, user_id: UserId) -> Result<Vec<User>, GraphError> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .filter(|(from, _)| *from == user_id)
            .filter_map(|(_, to)| state.users.get(to).cloned())
            .collect())
    }

    async fn subscriptions(&self, user_id: UserId) -> Result<Vec<Group>, GraphError> {
        let state = self.state.read().await;
        Ok(state
            .subscribes
            .iter()
            .filter(|(from, _)| *from == user_id)
            .filter_map(|(_, to)| state.groups.get(to).cloned())
            .collect())
    }

    async fn subscribers(&self, group_id: GroupId) -> Result<Vec<User>, GraphError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .subscribes
            .iter()
            .filter(|(_, to)| *to == group_id)
            .filter_map(|(from, _)| state.users.get(from).cloned())
            .collect();
        users.sort_by_key(|u| u.user_id);
        Ok(users)
    }

    async fn create_user(&self, user: &User) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.user_id) {
            return Err(GraphError::Conflict {
                kind: NodeKind::User,
                id: user.user_id,
            });
        }
        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn create_group(&self, group: &Group) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        if state.groups.contains_key(&group.group_id) {
            return Err(GraphError::Conflict {
                kind: NodeKind::Group,
                id: group.group_id,
            });
        }
        state.groups.insert(group.group_id, group.clone());
        Ok(())
    }

    async fn link(
        &self,
        rel: Relationship,
        source_id: UserId,
        target_id: i64,
    ) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&source_id) {
            return Err(GraphError::NotFound {
                kind: rel.source(),
                id: source_id,
            });
        }

        let target_exists = match rel.target() {
            NodeKind::User => state.users.contains_key(&target_id),
            NodeKind::Group => state.groups.contains_key(&target_id),
        };
        if !target_exists {
            return Err(GraphError::NotFound {
                kind: rel.target(),
                id: target_id,
            });
        }

        match rel {
            Relationship::Follows => state.follows.insert((source_id, target_id)),
            Relationship::Subscribes => state.subscribes.insert((source_id, target_id)),
        };
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, GraphError> {
        let mut state = self.state.write().await;
        if state.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        state
            .follows
            .retain(|(from, to)| *from != user_id && *to != user_id);
        state.subscribes.retain(|(from, _)| *from != user_id);
        Ok(true)
    }

    async fn delete_group(&self, group_id: GroupId) -> Result<bool, GraphError> {
        let mut state = self.state.write().await;
        if state.groups.remove(&group_id).is_none() {
            return Ok(false);
        }
        state.subscribes.retain(|(_, to)| *to != group_id);
        Ok(true)
    }
}
