//! User operations.

use socialgraph_core::{NewUser, NodeKind, Page, Relationship, UserDetail, UserId, UserSummary};
use socialgraph_graph::GraphBackend;

use crate::error::{EngineError, Result};
use crate::{AccessEngine, PendingEdge};

impl<B: GraphBackend> AccessEngine<B> {
    /// Page through users, each with the ids of the users it follows.
    pub async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>> {
        Ok(self.backend.list_users(page).await?)
    }

    /// A user with its follows and subscriptions expanded.
    pub async fn get_user(&self, user_id: UserId) -> Result<UserDetail> {
        let user = self
            .backend
            .find_user(user_id)
            .await?
            .ok_or(EngineError::NotFound {
                kind: NodeKind::User,
                id: user_id,
            })?;

        let follows = self.backend.following(user_id).await?;
        let subscribes = self.backend.subscriptions(user_id).await?;

        Ok(UserDetail {
            user,
            follows,
            subscribes,
        })
    }

    /// Create a user and connect it to the peers that resolve.
    ///
    /// Ids in `follows`/`subscribes` with no matching node are dropped. The
    /// returned detail lists exactly the resolved peers.
    pub async fn create_user(&self, new_user: NewUser) -> Result<UserDetail> {
        let NewUser {
            user,
            follows,
            subscribes,
        } = new_user;

        let follows = self.backend.resolve_users(&follows).await?;
        let subscribes = self.backend.resolve_groups(&subscribes).await?;

        self.backend.create_user(&user).await?;

        let edges: Vec<PendingEdge> = follows
            .iter()
            .map(|target| PendingEdge {
                rel: Relationship::Follows,
                source_id: user.user_id,
                target_id: target.user_id,
            })
            .chain(subscribes.iter().map(|group| PendingEdge {
                rel: Relationship::Subscribes,
                source_id: user.user_id,
                target_id: group.group_id,
            }))
            .collect();
        self.connect_all(NodeKind::User, user.user_id, &edges).await?;

        tracing::info!(
            user_id = user.user_id,
            follows = follows.len(),
            subscribes = subscribes.len(),
            "Created user"
        );

        Ok(UserDetail {
            user,
            follows,
            subscribes,
        })
    }

    /// Delete a user and all of its edges.
    pub async fn delete_user(&self, user_id: UserId) -> Result<()> {
        if !self.backend.delete_user(user_id).await? {
            return Err(EngineError::NotFound {
                kind: NodeKind::User,
                id: user_id,
            });
        }
        tracing::info!(user_id, "Deleted user");
        Ok(())
    }
}
