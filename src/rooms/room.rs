use axum::{debug_handler, extract::{Path, State}, Json};
use sqlx::SqlitePool;

use crate::{db, extract::{present, JsonBody}, session::CurrentUser, AppError, AppResult};

use super::{body::UpdateTitleBody, load_room, view::{Message, RoomView}};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(_): CurrentUser,
    Path(room_id): Path<String>,
) -> AppResult<Json<RoomView>> {
    let room = load_room(&db_pool, &room_id).await?;
    Ok(Json(RoomView::load(&db_pool, room).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn rooms(
    State(db_pool): State<SqlitePool>,
    CurrentUser(_): CurrentUser,
) -> AppResult<Json<Vec<RoomView>>> {
    let rooms = db::fetch_rooms(&db_pool).await?;
    Ok(Json(RoomView::load_all(&db_pool, rooms).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn rename_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<String>,

    JsonBody(UpdateTitleBody { title }): JsonBody<UpdateTitleBody>,
) -> AppResult<Json<RoomView>> {
    AppError::check_fields([("title", present(&title))])?;

    let mut room = load_room(&db_pool, &room_id).await?;
    room.rename(user_id, title.unwrap_or_default())?;
    db::save_room(&db_pool, &mut room).await?;

    Ok(Json(RoomView::load(&db_pool, room).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_room(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
    Path(room_id): Path<String>,
) -> AppResult<Json<Message>> {
    let room = load_room(&db_pool, &room_id).await?;
    room.check_delete(user_id)?;
    db::delete_room(&db_pool, room.id).await?;

    tracing::info!(room_id = %room.id, %user_id, "room deleted");
    Ok(Json(Message { message: "Room deleted successfully" }))
}
