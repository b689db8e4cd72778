//! Request types for create operations.
//!
//! Requests arrive as JSON with `sex` as a raw integer code. Validation turns
//! them into the model's `NewUser`/`NewGroup` before the engine sees them.

use serde::Deserialize;

use socialgraph_core::{CoreError, Group, GroupId, NewGroup, NewUser, Sex, User, UserId};

/// Request to create a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: UserId,
    pub name: String,
    /// 1 = Female, 2 = Male; null or 0 leaves it unset.
    #[serde(default)]
    pub sex: Option<i64>,
    pub home_town: String,
    /// Users to follow.
    #[serde(default)]
    pub follows: Vec<UserId>,
    /// Groups to subscribe to.
    #[serde(default)]
    pub subscribes: Vec<GroupId>,
}

impl CreateUserRequest {
    /// Check the sex code and build the model input.
    pub fn validate(self) -> Result<NewUser, CoreError> {
        let sex = match self.sex {
            None | Some(0) => None,
            Some(code) => Some(Sex::from_code(code)?),
        };

        Ok(NewUser {
            user: User {
                user_id: self.user_id,
                name: self.name,
                sex,
                home_town: self.home_town,
            },
            follows: self.follows,
            subscribes: self.subscribes,
        })
    }
}

/// Request to create a group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub group_id: GroupId,
    pub name: String,
    /// Users to subscribe to the new group.
    #[serde(default)]
    pub subscribers: Vec<UserId>,
}

impl From<CreateGroupRequest> for NewGroup {
    fn from(req: CreateGroupRequest) -> Self {
        NewGroup {
            group: Group {
                group_id: req.group_id,
                name: req.name,
            },
            subscribers: req.subscribers,
        }
    }
}
