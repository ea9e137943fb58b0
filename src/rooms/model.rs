use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PolicyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Moderator,
    Visitor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        use Role::*;
        match self {
            Owner => "owner",
            Admin => "admin",
            Moderator => "moderator",
            Visitor => "visitor",
        }
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Role::*;
        match s {
            "owner" => Ok(Owner),
            "admin" => Ok(Admin),
            "moderator" => Ok(Moderator),
            "visitor" => Ok(Visitor),
            _ => Err(PolicyError::InvalidRole(s.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a room's member sequence, stored inside the room document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub user: Uuid,
    pub role: Role,
}

impl Member {
    pub fn new(user: Uuid, role: Role) -> Self {
        Member {
            id: Uuid::now_v7(),
            user,
            role,
        }
    }
}

/// A `{user, role}` pair that has not been given a member identity yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMember {
    pub user: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Uuid,
    pub title: String,
    pub members: Vec<Member>,
    pub version: i64,
}
