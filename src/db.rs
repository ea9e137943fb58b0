use std::{collections::HashMap, str::FromStr};

use anyhow::Context;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, SqlitePool};
use uuid::Uuid;

use crate::{rooms::{Member, Room}, AppResult};

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse DATABASE_URL {database_url}"))?
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("open database")?;

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("run migrations")?;

    Ok(db_pool)
}

type RoomRow = (String, String, String, i64);

fn room_from_row((uuid, title, members, version): RoomRow) -> AppResult<Room> {
    Ok(Room {
        id: Uuid::parse_str(&uuid)?,
        title,
        members: serde_json::from_str(&members)?,
        version,
    })
}

pub(crate) async fn fetch_room(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<Option<Room>> {
    sqlx::query_as::<_, RoomRow>("SELECT uuid,title,members,version FROM rooms WHERE uuid=?")
        .bind(room_id.to_string())
        .fetch_optional(db_pool)
        .await?
        .map(room_from_row)
        .transpose()
}

pub(crate) async fn fetch_rooms(db_pool: &SqlitePool) -> AppResult<Vec<Room>> {
    sqlx::query_as::<_, RoomRow>("SELECT uuid,title,members,version FROM rooms ORDER BY rowid")
        .fetch_all(db_pool)
        .await?
        .into_iter()
        .map(room_from_row)
        .collect()
}

pub(crate) async fn insert_room(db_pool: &SqlitePool, room: &Room) -> AppResult<()> {
    sqlx::query("INSERT INTO rooms (uuid,title,members,version) VALUES (?,?,?,?)")
        .bind(room.id.to_string())
        .bind(&room.title)
        .bind(serde_json::to_string(&room.members)?)
        .bind(room.version)
        .execute(db_pool)
        .await?;

    Ok(())
}

/// Overwrites whatever is stored and bumps the revision; the stored
/// revision is not compared first, so the last writer wins.
pub(crate) async fn save_room(db_pool: &SqlitePool, room: &mut Room) -> AppResult<()> {
    room.version += 1;
    sqlx::query("UPDATE rooms SET title=?,members=?,version=? WHERE uuid=?")
        .bind(&room.title)
        .bind(serde_json::to_string(&room.members)?)
        .bind(room.version)
        .bind(room.id.to_string())
        .execute(db_pool)
        .await?;

    Ok(())
}

pub(crate) async fn delete_room(db_pool: &SqlitePool, room_id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM rooms WHERE uuid=?")
        .bind(room_id.to_string())
        .execute(db_pool)
        .await?;

    Ok(())
}

/// Usernames for every user referenced by `members`. Unknown users are left out.
pub(crate) async fn usernames<'a>(
    db_pool: &SqlitePool,
    members: impl IntoIterator<Item = &'a Member>,
) -> AppResult<HashMap<Uuid, String>> {
    let mut names = HashMap::new();
    for member in members {
        if names.contains_key(&member.user) {
            continue;
        }

        let name: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE uuid=?")
            .bind(member.user.to_string())
            .fetch_optional(db_pool)
            .await?;
        if let Some((name,)) = name {
            names.insert(member.user, name);
        }
    }

    Ok(names)
}

pub(crate) async fn insert_user(
    db_pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Uuid, sqlx::Error> {
    let uuid = Uuid::now_v7();
    sqlx::query("INSERT INTO users (uuid,username,email,password_hash) VALUES (?,?,?,?)")
        .bind(uuid.to_string())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(db_pool)
        .await?;

    Ok(uuid)
}

/// `(user id, password hash)` of the user whose username or email is `login`.
pub(crate) async fn find_login(db_pool: &SqlitePool, login: &str) -> AppResult<Option<(Uuid, String)>> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT uuid,password_hash FROM users WHERE username=? OR email=?")
            .bind(login)
            .bind(login)
            .fetch_optional(db_pool)
            .await?;

    match row {
        Some((uuid, hash)) => Ok(Some((Uuid::parse_str(&uuid)?, hash))),
        None => Ok(None),
    }
}
