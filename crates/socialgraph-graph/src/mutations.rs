//! Write operations for the social graph.
//!
//! Nodes are created exactly once: a create against an existing identity
//! fails with `GraphError::Conflict` and leaves the stored node untouched.
//! Edges use MERGE, so connecting the same pair twice yields one edge.

use neo4rs::query;

use socialgraph_core::{Group, GroupId, NodeKind, Relationship, User, UserId};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Node Creation ────────────────────────────────────────────

    /// Create a User node. Fails with Conflict if `user_id` is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), GraphError> {
        let q = query(
            "OPTIONAL MATCH (existing:User {user_id: $user_id})
             WITH existing WHERE existing IS NULL
             CREATE (n:User {user_id: $user_id, name: $name, sex: $sex, home_town: $home_town})
             RETURN n.user_id AS created",
        )
        .param("user_id", user.user_id)
        .param("name", user.name.clone())
        .param("sex", user.sex.map(|s| s.code()))
        .param("home_town", user.home_town.clone());

        self.create_once(q, NodeKind::User, user.user_id).await
    }

    /// Create a Group node. Fails with Conflict if `group_id` is taken.
    pub async fn create_group(&self, group: &Group) -> Result<(), GraphError> {
        let q = query(
            "OPTIONAL MATCH (existing:Group {group_id: $group_id})
             WITH existing WHERE existing IS NULL
             CREATE (n:Group {group_id: $group_id, name: $name})
             RETURN n.group_id AS created",
        )
        .param("group_id", group.group_id)
        .param("name", group.name.clone());

        self.create_once(q, NodeKind::Group, group.group_id).await
    }

    /// Run a guarded CREATE; an empty result means the identity already exists.
    async fn create_once(
        &self,
        q: neo4rs::Query,
        kind: NodeKind,
        id: i64,
    ) -> Result<(), GraphError> {
        let conflict = GraphError::Conflict { kind, id };

        match self.query_one(q).await {
            Ok(Some(_)) => {
                tracing::info!(label = kind.label(), id, "Created node");
                Ok(())
            }
            Ok(None) => Err(conflict),
            // Two concurrent creates can both pass the guard; the uniqueness
            // constraint rejects the loser.
            Err(GraphError::Query(e)) if is_constraint_violation(&e) => Err(conflict),
            Err(e) => Err(e),
        }
    }

    // ── Edges ────────────────────────────────────────────────────

    /// Merge a directed edge from a User to the relationship's target kind.
    ///
    /// Fails with NotFound if either endpoint no longer exists.
    pub async fn link(
        &self,
        rel: Relationship,
        source_id: UserId,
        target_id: i64,
    ) -> Result<(), GraphError> {
        let source = rel.source();
        let target = rel.target();
        let cypher = format!(
            "MATCH (a:{source_label} {{{source_key}: $source}})
             MATCH (b:{target_label} {{{target_key}: $target}})
             MERGE (a)-[:{rel_type}]->(b)
             RETURN count(*) AS linked",
            source_label = source.label(),
            source_key = source.key(),
            target_label = target.label(),
            target_key = target.key(),
            rel_type = rel.rel_type(),
        );

        let q = query(&cypher)
            .param("source", source_id)
            .param("target", target_id);

        let linked = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("linked").unwrap_or(0),
            None => 0,
        };

        if linked == 0 {
            return Err(GraphError::NotFound {
                kind: target,
                id: target_id,
            });
        }

        tracing::debug!(rel = rel.rel_type(), source_id, target_id, "Connected nodes");
        Ok(())
    }

    // ── Deletion ─────────────────────────────────────────────────

    /// Delete a user and every edge touching it. Returns false if absent.
    pub async fn delete_user(&self, user_id: UserId) -> Result<bool, GraphError> {
        self.detach_delete(NodeKind::User, user_id).await
    }

    /// Delete a group and every edge touching it. Returns false if absent.
    pub async fn delete_group(&self, group_id: GroupId) -> Result<bool, GraphError> {
        self.detach_delete(NodeKind::Group, group_id).await
    }

    async fn detach_delete(&self, kind: NodeKind, id: i64) -> Result<bool, GraphError> {
        let cypher = format!(
            "MATCH (n:{label} {{{key}: $id}})
             DETACH DELETE n
             RETURN count(n) AS cnt",
            label = kind.label(),
            key = kind.key(),
        );

        let q = query(&cypher).param("id", id);

        let deleted = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("cnt").unwrap_or(0),
            None => 0,
        };

        if deleted > 0 {
            tracing::info!(label = kind.label(), id, "Deleted node");
        }
        Ok(deleted > 0)
    }
}

fn is_constraint_violation(err: &neo4rs::Error) -> bool {
    err.to_string().contains("ConstraintValidationFailed")
}
