//! Request bodies for the room endpoints.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::AppResult;

use super::model::NewMember;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MemberInput {
    user: Option<String>,
    role: Option<String>,
}

impl MemberInput {
    fn is_complete(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.is_empty())
            && self.role.as_deref().is_some_and(|r| !r.is_empty())
    }

    fn parse(self) -> AppResult<NewMember> {
        let (Some(user), Some(role)) = (self.user, self.role) else {
            return Err("Path `user` and `role` are required for every member".into());
        };

        Ok(NewMember {
            user: Uuid::parse_str(&user)?,
            role: role.parse()?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateRoomBody {
    pub(crate) title: Option<String>,
    pub(crate) members: Option<Value>,
}

impl CreateRoomBody {
    /// Anything but an array is ignored, as are entries that are not objects
    /// or lack `user`/`role`. Complete entries must be valid.
    pub(crate) fn requested_members(members: Option<Value>) -> AppResult<Vec<NewMember>> {
        let Some(Value::Array(entries)) = members else {
            return Ok(Vec::new());
        };

        let mut requested = Vec::new();
        for entry in entries.into_iter().filter(Value::is_object) {
            let input: MemberInput = serde_json::from_value(entry)?;
            if input.is_complete() {
                requested.push(input.parse()?);
            }
        }

        Ok(requested)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateTitleBody {
    pub(crate) title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AddMembersBody {
    pub(crate) members: Option<Vec<MemberInput>>,
}

impl AddMembersBody {
    /// Unlike creation, every entry has to be complete.
    pub(crate) fn parse_members(members: Vec<MemberInput>) -> AppResult<Vec<NewMember>> {
        members.into_iter().map(MemberInput::parse).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRoleBody {
    pub(crate) new_role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DuplicateBody {
    pub(crate) title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveMembersBody {
    pub(crate) members_to_delete: Option<Vec<String>>,
}
