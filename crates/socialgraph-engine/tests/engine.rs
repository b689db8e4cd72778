//! Behavior tests for the access engine over the in-memory backend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use socialgraph_core::{
    Group, GroupId, GroupSummary, NewGroup, NewUser, NodeKind, Page, Relationship, Sex, User,
    UserId, UserSummary,
};
use socialgraph_engine::{AccessEngine, EngineError};
use socialgraph_graph::{GraphBackend, GraphClient, GraphConfig, GraphError, InMemoryGraph};

fn user(user_id: UserId, name: &str) -> User {
    User {
        user_id,
        name: name.to_string(),
        sex: Some(Sex::Female),
        home_town: "Oslo".to_string(),
    }
}

fn new_user(user_id: UserId, follows: Vec<UserId>, subscribes: Vec<GroupId>) -> NewUser {
    NewUser {
        user: user(user_id, &format!("user-{user_id}")),
        follows,
        subscribes,
    }
}

fn new_group(group_id: GroupId, name: &str, subscribers: Vec<UserId>) -> NewGroup {
    NewGroup {
        group: Group {
            group_id,
            name: name.to_string(),
        },
        subscribers,
    }
}

fn engine() -> AccessEngine<InMemoryGraph> {
    AccessEngine::new(InMemoryGraph::new())
}

#[tokio::test]
async fn test_chess_club_round_trip() {
    let engine = engine();
    engine
        .create_group(new_group(1, "Chess Club", vec![]))
        .await
        .unwrap();
    engine
        .create_user(NewUser {
            user: user(10, "Ann"),
            follows: vec![],
            subscribes: vec![1],
        })
        .await
        .unwrap();

    let group = engine.get_group(1).await.unwrap();
    let subscriber_ids: Vec<_> = group.subscribers.iter().map(|u| u.user_id).collect();
    assert_eq!(subscriber_ids, vec![10]);

    let ann = engine.get_user(10).await.unwrap();
    assert_eq!(
        ann.subscribes,
        vec![Group {
            group_id: 1,
            name: "Chess Club".to_string()
        }]
    );
}

#[tokio::test]
async fn test_user_without_relationships() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();

    let detail = engine.get_user(1).await.unwrap();
    assert!(detail.follows.is_empty());
    assert!(detail.subscribes.is_empty());

    let listed = engine.list_users(Page::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].friends.is_empty());
}

#[tokio::test]
async fn test_unresolved_follow_is_dropped() {
    let engine = engine();
    let detail = engine
        .create_user(new_user(1, vec![999], vec![555]))
        .await
        .unwrap();

    assert!(detail.follows.is_empty());
    assert!(detail.subscribes.is_empty());
    assert_eq!(engine.backend().edge_count(Relationship::Follows).await, 0);
}

#[tokio::test]
async fn test_create_returns_resolved_subset() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();
    engine.create_user(new_user(2, vec![], vec![])).await.unwrap();
    engine
        .create_group(new_group(7, "Go", vec![]))
        .await
        .unwrap();

    let created = engine
        .create_user(new_user(3, vec![2, 404, 1, 2], vec![7, 8]))
        .await
        .unwrap();
    let follow_ids: Vec<_> = created.follows.iter().map(|u| u.user_id).collect();
    assert_eq!(follow_ids, vec![1, 2]);

    let fetched = engine.get_user(3).await.unwrap();
    assert_eq!(fetched.follows, created.follows);
    assert_eq!(fetched.subscribes, created.subscribes);
    assert_eq!(fetched.subscribes.len(), 1);
}

#[tokio::test]
async fn test_list_users_aggregates_follows() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();
    engine.create_user(new_user(2, vec![1], vec![])).await.unwrap();
    engine.create_user(new_user(3, vec![1, 2], vec![])).await.unwrap();

    let listed = engine.list_users(Page::new(10, 0)).await.unwrap();
    let friends: Vec<_> = listed
        .iter()
        .map(|s| (s.user.user_id, s.friends.clone()))
        .collect();
    assert_eq!(
        friends,
        vec![(1, vec![]), (2, vec![1]), (3, vec![1, 2])]
    );
}

#[tokio::test]
async fn test_list_respects_limit_without_duplicates() {
    let engine = engine();
    for id in 1..=12 {
        engine
            .create_user(new_user(id, vec![1, 2, 3], vec![]))
            .await
            .unwrap();
    }

    for (limit, offset) in [(0, 0), (5, 0), (5, 10), (20, 3), (4, 12)] {
        let page = engine.list_users(Page::new(limit, offset)).await.unwrap();
        assert!(page.len() <= limit as usize);

        let unique: HashSet<_> = page.iter().map(|s| s.user.user_id).collect();
        assert_eq!(unique.len(), page.len());
    }

    let tail = engine.list_users(Page::new(5, 10)).await.unwrap();
    assert_eq!(tail.len(), 2);
}

#[tokio::test]
async fn test_list_groups_aggregates_members() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();
    engine.create_user(new_user(2, vec![], vec![])).await.unwrap();
    engine
        .create_group(new_group(5, "Choir", vec![1, 2, 3]))
        .await
        .unwrap();
    engine
        .create_group(new_group(6, "Empty", vec![]))
        .await
        .unwrap();

    let groups = engine.list_groups(Page::default()).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, vec![1, 2]);
    assert!(groups[1].members.is_empty());
}

#[tokio::test]
async fn test_create_group_resolves_subscribers() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();

    let detail = engine
        .create_group(new_group(9, "Book Club", vec![1, 42]))
        .await
        .unwrap();
    assert_eq!(detail.subscribers.len(), 1);
    assert_eq!(detail.subscribers[0].user_id, 1);

    let user = engine.get_user(1).await.unwrap();
    assert_eq!(user.subscribes[0].group_id, 9);
}

#[tokio::test]
async fn test_delete_user_then_not_found() {
    let engine = engine();
    engine.create_user(new_user(1, vec![], vec![])).await.unwrap();
    engine.create_user(new_user(2, vec![1], vec![])).await.unwrap();

    engine.delete_user(1).await.unwrap();

    let err = engine.get_user(1).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::NotFound {
            kind: NodeKind::User,
            id: 1
        }
    ));

    // Incident edges went with the node.
    assert!(engine.get_user(2).await.unwrap().follows.is_empty());

    let err = engine.delete_user(1).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_group_not_found() {
    let engine = engine();
    let err = engine.delete_group(3).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::NotFound {
            kind: NodeKind::Group,
            id: 3
        }
    ));
}

#[tokio::test]
async fn test_get_group_not_found() {
    let engine = engine();
    assert!(matches!(
        engine.get_group(8).await,
        Err(EngineError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_user_conflicts_and_keeps_stored() {
    let engine = engine();
    engine
        .create_user(NewUser {
            user: user(1, "Ann"),
            follows: vec![],
            subscribes: vec![],
        })
        .await
        .unwrap();

    let mut impostor = new_user(1, vec![], vec![]);
    impostor.user.name = "Impostor".to_string();
    impostor.user.sex = None;
    let err = engine.create_user(impostor).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Conflict {
            kind: NodeKind::User,
            id: 1
        }
    ));

    let stored = engine.get_user(1).await.unwrap();
    assert_eq!(stored.user, user(1, "Ann"));
}

#[tokio::test]
async fn test_duplicate_group_conflicts() {
    let engine = engine();
    engine
        .create_group(new_group(1, "Chess Club", vec![]))
        .await
        .unwrap();
    let err = engine
        .create_group(new_group(1, "Other", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));
    assert_eq!(engine.get_group(1).await.unwrap().group.name, "Chess Club");
}

// ── Fault injection ──────────────────────────────────────────────

/// Wraps the in-memory graph and fails selected operations.
#[derive(Default)]
struct FaultyGraph {
    inner: InMemoryGraph,
    /// Connects allowed to succeed before every further one fails.
    connect_budget: Option<usize>,
    connects: AtomicUsize,
    offline: bool,
}

impl FaultyGraph {
    fn check_online(&self) -> Result<(), GraphError> {
        if self.offline {
            return Err(GraphError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GraphBackend for FaultyGraph {
    async fn list_users(&self, page: Page) -> Result<Vec<UserSummary>, GraphError> {
        self.check_online()?;
        self.inner.list_users(page).await
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<GroupSummary>, GraphError> {
        self.check_online()?;
        self.inner.list_groups(page).await
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, GraphError> {
        self.check_online()?;
        self.inner.find_user(user_id).await
    }

    async fn find_group(&self, group_id: GroupId) -> Result<Option<Group>, GraphError> {
        self.check_online()?;
        self.inner.find_group(group_id).await
    }

    async fn resolve_users(&self, ids: &[UserId]) -> Result<Vec<User>, GraphError> {
        self.check_online()?;
        self.inner.resolve_users(ids).await
    }

    async fn resolve_groups(&self, ids: &[GroupId]) -> Result<Vec<Group>, GraphError> {
        self.check_online()?;
        self.inner.resolve_groups(ids).await
    }

    async fn following(&self, user_id: UserId) -> Result<Vec<User>, GraphError> {
        self.check_online()?;
        self.inner.following(user_id).await
    }

    async fn subscriptions(&self, user_id: UserId) -> Result<Vec<Group>, GraphError> {
        self.check_online()?;
        self.inner.subscriptions(user_id).await
    }

    async fn subscribers(&self, group_id: GroupId) -> Result<Vec<User>, GraphError> {
        self.check_online()?;
        self.inner.subscribers(group_id).await
    }

    async fn create_user(&self, user: &User) -> Result<(), GraphError> {
        self.check_online()?;
        self.inner.create_user(user).await
    }

    async fn create_group(&self, group: &Group) -> Result<(), GraphError> {
        self.check_online()?;
        self.inner.create_group(group).await
    }

    async fn link(
        &self,
        rel: Relationship,
        source_id: UserId,
        target_id: i64,
    ) -> Result<(), GraphError> {
        self.check_online()?;
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        if self.connect_budget.is_some_and(|budget| attempt >= budget) {
            return Err(GraphError::Connection("connection reset".to_string()));
        }
        self.inner.link(rel, source_id, target_id).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, GraphError> {
        self.check_online()?;
        self.inner.delete_user(user_id).await
    }

    async fn delete_group(&self, group_id: GroupId) -> Result<bool, GraphError> {
        self.check_online()?;
        self.inner.delete_group(group_id).await
    }
}

#[tokio::test]
async fn test_failed_connect_leaves_partial_node() {
    let inner = InMemoryGraph::new();
    inner.create_user(&user(1, "Ann")).await.unwrap();
    inner.create_user(&user(2, "Bob")).await.unwrap();
    inner
        .create_group(&Group {
            group_id: 5,
            name: "Chess Club".to_string(),
        })
        .await
        .unwrap();

    let engine = AccessEngine::new(FaultyGraph {
        inner,
        connect_budget: Some(1),
        ..Default::default()
    });

    let err = engine
        .create_user(new_user(3, vec![1, 2], vec![5]))
        .await
        .unwrap_err();
    match err {
        EngineError::PartialMutation {
            kind,
            id,
            relationship,
            target_id,
            connected,
            ..
        } => {
            assert_eq!(kind, NodeKind::User);
            assert_eq!(id, 3);
            assert_eq!(relationship, Relationship::Follows);
            assert_eq!(target_id, 2);
            assert_eq!(connected, 1);
        }
        other => panic!("expected PartialMutation, got {other:?}"),
    }

    // The node stays, holding only the edge made before the failure.
    let detail = engine.get_user(3).await.unwrap();
    assert_eq!(detail.follows.len(), 1);
    assert_eq!(detail.follows[0].user_id, 1);
    assert!(detail.subscribes.is_empty());
}

#[tokio::test]
async fn test_failed_group_connect_is_partial() {
    let inner = InMemoryGraph::new();
    inner.create_user(&user(1, "Ann")).await.unwrap();

    let engine = AccessEngine::new(FaultyGraph {
        inner,
        connect_budget: Some(0),
        ..Default::default()
    });

    let err = engine
        .create_group(new_group(5, "Chess Club", vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::PartialMutation {
            kind: NodeKind::Group,
            id: 5,
            connected: 0,
            ..
        }
    ));
    assert!(engine.get_group(5).await.unwrap().subscribers.is_empty());
}

#[tokio::test]
async fn test_backend_offline_is_unavailable() {
    let engine = AccessEngine::new(FaultyGraph {
        offline: true,
        ..Default::default()
    });

    assert!(matches!(
        engine.list_users(Page::default()).await,
        Err(EngineError::BackendUnavailable(_))
    ));
    assert!(matches!(
        engine.create_user(new_user(1, vec![], vec![])).await,
        Err(EngineError::BackendUnavailable(_))
    ));
    assert!(matches!(
        engine.delete_group(1).await,
        Err(EngineError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn test_unreachable_neo4j_is_unavailable() {
    let config = GraphConfig {
        uri: "bolt://127.0.0.1:1".to_string(),
        ..GraphConfig::default()
    };

    match GraphClient::connect(&config).await {
        Ok(client) => {
            let engine = AccessEngine::new(client);
            assert!(matches!(
                engine.list_users(Page::default()).await,
                Err(EngineError::BackendUnavailable(_))
            ));
            assert!(matches!(
                engine.get_group(1).await,
                Err(EngineError::BackendUnavailable(_))
            ));
        }
        Err(e) => assert!(matches!(
            EngineError::from(e),
            EngineError::BackendUnavailable(_)
        )),
    }
}
