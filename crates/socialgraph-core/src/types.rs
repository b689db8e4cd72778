//! Core domain types for the social graph.
//!
//! Two node kinds (User, Group) joined by two directed relationship kinds
//! (FOLLOWS: User → User, SUBSCRIBES: User → Group). Nodes are identified by
//! an external integer id, never by the backend's internal node id.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// External identity of a User node.
pub type UserId = i64;

/// External identity of a Group node.
pub type GroupId = i64;

// ── Schema Declarations ───────────────────────────────────────────

/// The node kinds stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    User,
    Group,
}

impl NodeKind {
    pub const ALL: [NodeKind; 2] = [NodeKind::User, NodeKind::Group];

    /// Node label in the graph.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
        }
    }

    /// Property holding the unique external id.
    pub fn key(&self) -> &'static str {
        match self {
            Self::User => "user_id",
            Self::Group => "group_id",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The permitted relationship kinds. Both are directed and always originate
/// at a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Follows,
    Subscribes,
}

impl Relationship {
    /// Relationship type in the graph.
    pub fn rel_type(&self) -> &'static str {
        match self {
            Self::Follows => "FOLLOWS",
            Self::Subscribes => "SUBSCRIBES",
        }
    }

    pub fn source(&self) -> NodeKind {
        NodeKind::User
    }

    pub fn target(&self) -> NodeKind {
        match self {
            Self::Follows => NodeKind::User,
            Self::Subscribes => NodeKind::Group,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rel_type())
    }
}

// ── Node Types ────────────────────────────────────────────────────

/// Sex of a user. Stored as an integer code, surfaced as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Parse a stored code. Only 1 and 2 are recognized.
    pub fn from_code(code: i64) -> Result<Self, CoreError> {
        match code {
            1 => Ok(Self::Female),
            2 => Ok(Self::Male),
            other => Err(CoreError::InvalidSex(other)),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Female => 1,
            Self::Male => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Unset sex is surfaced as an empty label rather than null.
fn serialize_sex<S: Serializer>(sex: &Option<Sex>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(sex.map(|s| s.label()).unwrap_or_default())
}

/// A user node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    #[serde(serialize_with = "serialize_sex")]
    pub sex: Option<Sex>,
    pub home_town: String,
}

/// A group node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub group_id: GroupId,
    pub name: String,
}

// ── Query Results ─────────────────────────────────────────────────

/// A user with the ids of the users it follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    pub friends: Vec<UserId>,
}

/// A group with the ids of its subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub members: Vec<UserId>,
}

/// A user with its relationships fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub follows: Vec<User>,
    pub subscribes: Vec<Group>,
}

/// A group with its subscribers fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    pub subscribers: Vec<User>,
}

// ── Mutation Inputs ───────────────────────────────────────────────

/// A validated user to create, with the peers to connect it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user: User,
    pub follows: Vec<UserId>,
    pub subscribes: Vec<GroupId>,
}

/// A validated group to create, with the users subscribing to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub group: Group,
    pub subscribers: Vec<UserId>,
}

/// Skip/limit window over a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 50;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}
