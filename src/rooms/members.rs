use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Response}, Json};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{db, extract::{present, JsonBody}, session::CurrentUser, AppError, AppResult};

use super::{
    body::{AddMembersBody, RemoveMembersBody, UpdateRoleBody},
    load_room,
    view::{RemovalView, RoomView},
};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn add_members(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<String>,

    JsonBody(AddMembersBody { members }): JsonBody<AddMembersBody>,
) -> AppResult<Json<RoomView>> {
    AppError::check_fields([("members", members.is_some())])?;

    let members = AddMembersBody::parse_members(members.unwrap_or_default())?;
    let mut room = load_room(&db_pool, &room_id).await?;
    room.add_members(members);
    db::save_room(&db_pool, &mut room).await?;

    tracing::info!(room_id = %room.id, %user_id, members = room.members.len(), "members added");
    Ok(Json(RoomView::load(&db_pool, room).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn update_member_role(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path((room_id, member_id)): Path<(String, String)>,

    JsonBody(UpdateRoleBody { new_role }): JsonBody<UpdateRoleBody>,
) -> AppResult<Json<RoomView>> {
    AppError::check_fields([("newRole", present(&new_role))])?;
    let role = new_role.unwrap_or_default();

    let mut room = load_room(&db_pool, &room_id).await?;
    // a malformed id matches no member, same as an unknown one
    room.set_member_role(user_id, Uuid::parse_str(&member_id).ok(), &role)?;
    db::save_room(&db_pool, &mut room).await?;

    tracing::info!(room_id = %room.id, %member_id, %role, "member role changed");
    Ok(Json(RoomView::load(&db_pool, room).await?))
}

/// Removes `target_id`, or every id in `membersToDelete` when the body names some.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn remove_member(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path((room_id, target_id)): Path<(String, String)>,

    JsonBody(RemoveMembersBody { members_to_delete }): JsonBody<RemoveMembersBody>,
) -> AppResult<Response> {
    let mut room = load_room(&db_pool, &room_id).await?;

    if let Some(ids) = members_to_delete {
        let removal = room.remove_members(user_id, &ids)?;
        db::save_room(&db_pool, &mut room).await?;

        tracing::info!(
            room_id = %room.id,
            deleted = removal.deleted.len(),
            not_found = removal.not_found.len(),
            "members removed"
        );
        return Ok(Json(RemovalView::load(&db_pool, removal).await?).into_response());
    }

    let removed = room.remove_member(user_id, Uuid::parse_str(&target_id).ok())?;
    db::save_room(&db_pool, &mut room).await?;

    tracing::info!(room_id = %room.id, member_id = %removed.id, %user_id, "member removed");
    Ok(Json(RoomView::load(&db_pool, room).await?).into_response())
}
