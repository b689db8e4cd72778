//! Read operations for the social graph.

use neo4rs::query;

use socialgraph_core::{
    Group, GroupId, GroupSummary, NodeKind, Page, Sex, User, UserId, UserSummary,
};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Aggregation Queries ──────────────────────────────────────

    /// List users, each with the ids of the users it follows.
    ///
    /// The FOLLOWS match is optional so users following nobody still appear.
    pub async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>, GraphError> {
        let q = query(
            "MATCH (user:User)
             OPTIONAL MATCH (user)-[:FOLLOWS]->(target:User)
             WITH user, collect(DISTINCT target.user_id) AS friends
             RETURN user, friends
             ORDER BY user.user_id
             SKIP $offset LIMIT $limit",
        )
        .param("offset", page.offset as i64)
        .param("limit", page.limit as i64);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("user").map_err(|e| {
                GraphError::Serialization(format!("Failed to deserialize user: {e}"))
            })?;
            let friends = row_ids(&row, "friends")?;
            results.push(UserSummary {
                user: node_to_user(&node)?,
                friends,
            });
        }

        tracing::debug!(count = results.len(), offset = page.offset, "Listed users");
        Ok(results)
    }

    /// List groups, each with the ids of its subscribers.
    pub async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>, GraphError> {
        let q = query(
            "MATCH (group:Group)
             OPTIONAL MATCH (subscriber:User)-[:SUBSCRIBES]->(group)
             WITH group, collect(DISTINCT subscriber.user_id) AS members
             RETURN group, members
             ORDER BY group.group_id
             SKIP $offset LIMIT $limit",
        )
        .param("offset", page.offset as i64)
        .param("limit", page.limit as i64);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("group").map_err(|e| {
                GraphError::Serialization(format!("Failed to deserialize group: {e}"))
            })?;
            let members = row_ids(&row, "members")?;
            results.push(GroupSummary {
                group: node_to_group(&node)?,
                members,
            });
        }

        tracing::debug!(count = results.len(), offset = page.offset, "Listed groups");
        Ok(results)
    }

    // ── Single Node Lookups ──────────────────────────────────────

    /// Get a user by its external id.
    pub async fn find_user(&self, user_id: UserId) -> Result<Option<User>, GraphError> {
        let q = query("MATCH (n:User {user_id: $id}) RETURN n LIMIT 1").param("id", user_id);

        match self.query_one(q).await? {
            Some(row) => Ok(Some(node_to_user(&row_node(&row, "n")?)?)),
            None => Ok(None),
        }
    }

    /// Get a group by its external id.
    pub async fn find_group(&self, group_id: GroupId) -> Result<Option<Group>, GraphError> {
        let q = query("MATCH (n:Group {group_id: $id}) RETURN n LIMIT 1").param("id", group_id);

        match self.query_one(q).await? {
            Some(row) => Ok(Some(node_to_group(&row_node(&row, "n")?)?)),
            None => Ok(None),
        }
    }

    // ── Bulk Resolve ─────────────────────────────────────────────

    /// Resolve user ids to existing users. Ids with no node are dropped.
    pub async fn resolve_users(&self, ids: &[UserId]) -> Result<Vec<User>, GraphError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let q = query(
            "MATCH (n:User) WHERE n.user_id IN $ids
             RETURN n ORDER BY n.user_id",
        )
        .param("ids", ids.to_vec());

        let users = self.collect_nodes(q, "n", node_to_user).await?;
        tracing::debug!(requested = ids.len(), resolved = users.len(), "Resolved users");
        Ok(users)
    }

    /// Resolve group ids to existing groups. Ids with no node are dropped.
    pub async fn resolve_groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, GraphError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let q = query(
            "MATCH (n:Group) WHERE n.group_id IN $ids
             RETURN n ORDER BY n.group_id",
        )
        .param("ids", ids.to_vec());

        let groups = self.collect_nodes(q, "n", node_to_group).await?;
        tracing::debug!(requested = ids.len(), resolved = groups.len(), "Resolved groups");
        Ok(groups)
    }

    // ── Traversals ───────────────────────────────────────────────

    /// Users that `user_id` follows.
    pub async fn following(&self, user_id: UserId) -> Result<Vec<User>, GraphError> {
        let q = query(
            "MATCH (:User {user_id: $id})-[:FOLLOWS]->(n:User)
             RETURN DISTINCT n ORDER BY n.user_id",
        )
        .param("id", user_id);

        self.collect_nodes(q, "n", node_to_user).await
    }

    /// Groups that `user_id` subscribes to.
    pub async fn subscriptions(&self, user_id: UserId) -> Result<Vec<Group>, GraphError> {
        let q = query(
            "MATCH (:User {user_id: $id})-[:SUBSCRIBES]->(n:Group)
             RETURN DISTINCT n ORDER BY n.group_id",
        )
        .param("id", user_id);

        self.collect_nodes(q, "n", node_to_group).await
    }

    /// Users subscribed to `group_id`.
    pub async fn subscribers(&self, group_id: GroupId) -> Result<Vec<User>, GraphError> {
        let q = query(
            "MATCH (n:User)-[:SUBSCRIBES]->(:Group {group_id: $id})
             RETURN DISTINCT n ORDER BY n.user_id",
        )
        .param("id", group_id);

        self.collect_nodes(q, "n", node_to_user).await
    }

    async fn collect_nodes<T>(
        &self,
        q: neo4rs::Query,
        column: &str,
        convert: fn(&neo4rs::Node) -> Result<T, GraphError>,
    ) -> Result<Vec<T>, GraphError> {
        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(convert(&row_node(&row, column)?)?);
        }
        Ok(results)
    }
}

fn row_node(row: &neo4rs::Row, column: &str) -> Result<neo4rs::Node, GraphError> {
    row.get(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize node: {e}")))
}

fn row_ids(row: &neo4rs::Row, column: &str) -> Result<Vec<i64>, GraphError> {
    row.get(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize {column}: {e}")))
}

/// Convert a neo4rs::Node labelled User into the model type.
pub(crate) fn node_to_user(node: &neo4rs::Node) -> Result<User, GraphError> {
    let user_id: i64 = node
        .get(NodeKind::User.key())
        .map_err(|e| GraphError::Serialization(format!("User without user_id: {e}")))?;

    // Absent sex means unset; anything else must be a known integer code.
    let sex = if node.keys().contains(&"sex") {
        let code: i64 = node.get("sex").map_err(|e| {
            GraphError::Serialization(format!("User {user_id}: sex is not an integer code: {e}"))
        })?;
        Some(
            Sex::from_code(code)
                .map_err(|e| GraphError::Serialization(format!("User {user_id}: {e}")))?,
        )
    } else {
        None
    };

    Ok(User {
        user_id,
        name: node.get("name").unwrap_or_default(),
        sex,
        home_town: node.get("home_town").unwrap_or_default(),
    })
}

/// Convert a neo4rs::Node labelled Group into the model type.
pub(crate) fn node_to_group(node: &neo4rs::Node) -> Result<Group, GraphError> {
    let group_id: i64 = node
        .get(NodeKind::Group.key())
        .map_err(|e| GraphError::Serialization(format!("Group without group_id: {e}")))?;

    Ok(Group {
        group_id,
        name: node.get("name").unwrap_or_default(),
    })
}
