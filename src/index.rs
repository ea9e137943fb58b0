use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{include_res, res, session::USER_ID, AppResult};

#[debug_handler(state = crate::AppState)]
pub async fn index(
    State(db_pool): State<SqlitePool>,
    session: Session
) -> AppResult<Response> {
    let Some(user_id) = session.get::<Uuid>(USER_ID).await? else {
        return Ok(
            Redirect::to("/login")
                .into_response()
        );
    };

    let username: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE uuid=?")
        .bind(user_id.to_string())
        .fetch_optional(&db_pool)
        .await?;
    let Some((username,)) = username else {
        // the account is gone; drop the stale session
        session.flush().await?;
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(
        Html(
            include_res!(str, "/pages/index.html")
                .replace("{username}", &res::escape(&username))
        ).into_response()
    )
}
