use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{db, AppResult};

use super::{model::{Member, Role, Room}, policy::Removal};

#[derive(Debug, Serialize)]
pub(crate) struct MemberView {
    #[serde(rename = "userID")]
    user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(rename = "memberID")]
    member_id: Uuid,
    role: Role,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoomView {
    #[serde(rename = "roomID")]
    room_id: Uuid,
    title: String,
    members: Vec<MemberView>,
    #[serde(rename = "__v")]
    version: i64,
}

impl RoomView {
    fn build(room: Room, names: &HashMap<Uuid, String>) -> Self {
        RoomView {
            room_id: room.id,
            title: room.title,
            members: room
                .members
                .into_iter()
                .map(|Member { id, user, role }| MemberView {
                    user_id: user,
                    username: names.get(&user).cloned(),
                    member_id: id,
                    role,
                })
                .collect(),
            version: room.version,
        }
    }

    pub(crate) async fn load(db_pool: &SqlitePool, room: Room) -> AppResult<Self> {
        let names = db::usernames(db_pool, &room.members).await?;
        Ok(Self::build(room, &names))
    }

    pub(crate) async fn load_all(db_pool: &SqlitePool, rooms: Vec<Room>) -> AppResult<Vec<Self>> {
        let members: Vec<&Member> = rooms.iter().flat_map(|r| r.members.iter()).collect();
        let names = db::usernames(db_pool, members).await?;
        Ok(rooms.into_iter().map(|room| Self::build(room, &names)).collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeletedMemberView {
    member_id: Uuid,
    user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemovalView {
    message: &'static str,
    deleted_members: Vec<DeletedMemberView>,
    not_found_members: Vec<String>,
}

impl RemovalView {
    pub(crate) async fn load(db_pool: &SqlitePool, removal: Removal) -> AppResult<Self> {
        let names = db::usernames(db_pool, &removal.deleted).await?;

        Ok(RemovalView {
            message: "Members deleted successfully",
            deleted_members: removal
                .deleted
                .into_iter()
                .map(|m| DeletedMemberView {
                    member_id: m.id,
                    user_id: m.user,
                    username: names.get(&m.user).cloned(),
                })
                .collect(),
            not_found_members: removal.not_found,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub(crate) message: &'static str,
}
