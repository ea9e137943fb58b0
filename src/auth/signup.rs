use axum::{debug_handler, extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db, extract::{present, JsonBody}, session::USER_ID, AppError, AppResult};

use super::hash_password;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignupBody {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignedUp {
    #[serde(rename = "userID")]
    user_id: Uuid,
    username: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    session: Session,

    JsonBody(SignupBody { username, email, password }): JsonBody<SignupBody>,
) -> AppResult<Json<SignedUp>> {
    AppError::check_fields([
        ("username", present(&username)),
        ("email", present(&email)),
        ("password", present(&password)),
    ])?;
    let (username, email, password) = (
        username.unwrap_or_default(),
        email.unwrap_or_default(),
        password.unwrap_or_default(),
    );

    let hash = hash_password(&password)?;
    let user_id = match db::insert_user(&db_pool, &username, &email, &hash).await {
        Ok(user_id) => user_id,
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            return Err("Username or email already in use".into());
        }
        Err(err) => return Err(err.into()),
    };

    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await?;

    tracing::info!(%user_id, %username, "signed up");
    Ok(Json(SignedUp { user_id, username }))
}
