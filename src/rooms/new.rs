use axum::{debug_handler, extract::{Path, State}, Json};
use sqlx::SqlitePool;

use crate::{db, extract::{present, JsonBody}, session::CurrentUser, AppError, AppResult};

use super::{body::{CreateRoomBody, DuplicateBody}, load_room, model::Room, view::RoomView};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(creator): CurrentUser,

    JsonBody(CreateRoomBody { title, members }): JsonBody<CreateRoomBody>,
) -> AppResult<Json<RoomView>> {
    AppError::check_fields([("title", present(&title))])?;

    let members = CreateRoomBody::requested_members(members)?;
    let room = Room::create(title.unwrap_or_default(), creator, members)?;
    db::insert_room(&db_pool, &room).await?;

    tracing::info!(room_id = %room.id, %creator, members = room.members.len(), "room created");
    Ok(Json(RoomView::load(&db_pool, room).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn duplicate_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<String>,

    JsonBody(DuplicateBody { title }): JsonBody<DuplicateBody>,
) -> AppResult<Json<RoomView>> {
    let source = load_room(&db_pool, &room_id).await?;
    let room = source.duplicate(user_id, title)?;
    db::insert_room(&db_pool, &room).await?;

    tracing::info!(source = %source.id, room_id = %room.id, "room duplicated");
    Ok(Json(RoomView::load(&db_pool, room).await?))
}
