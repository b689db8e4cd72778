//! socialgraph-core: Graph model, configuration, and error types.
//!
//! This crate declares what the social graph contains:
//! - Node kinds (User, Group) and their properties
//! - Relationship kinds (FOLLOWS, SUBSCRIBES) with direction and endpoints
//! - Query result and mutation input shapes
//! - Configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::{
    Group, GroupDetail, GroupId, GroupSummary, NewGroup, NewUser, NodeKind, Page, Relationship,
    Sex, User, UserDetail, UserId, UserSummary,
};
