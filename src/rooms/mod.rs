mod body;
mod members;
mod model;
mod new;
mod policy;
mod room;
mod view;

use axum::{routing::{delete, get, patch, post}, Router};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{db, AppError, AppResult, AppState};

pub use model::{Member, NewMember, Role, Room};
pub use policy::{PolicyError, PolicyResult, Removal};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(room::rooms).post(new::new_room))
        .route(
            "/{room_id}",
            get(room::room)
                .patch(members::add_members)
                .delete(room::delete_room),
        )
        .route("/{room_id}/update", patch(room::rename_room))
        .route("/{room_id}/duplicate", post(new::duplicate_room))
        .route(
            "/{room_id}/member/{member_id}/updates",
            patch(members::update_member_role),
        )
        .route(
            "/{room_id}/member/{member_id}/delete",
            delete(members::remove_member),
        )
}

/// A malformed id is a bad request; a well-formed one that matches nothing is a 404.
async fn load_room(db_pool: &SqlitePool, room_id: &str) -> AppResult<Room> {
    let room_id = Uuid::parse_str(room_id)?;
    db::fetch_room(db_pool, room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_owned()))
}
