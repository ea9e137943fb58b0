use axum::{debug_handler, extract::Query, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;

use crate::AppResult;

use super::return_to;

#[derive(Deserialize)]
pub(crate) struct LogoutQuery {
    pub(crate) return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    session: Session
) -> AppResult<Redirect> {
    session.flush().await?;
    Ok(Redirect::to(&return_to(return_url)))
}
