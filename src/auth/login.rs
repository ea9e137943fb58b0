use axum::{debug_handler, extract::{Query, State}, http::StatusCode, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db, include_res, res, session::USER_ID, AppResult};

use super::{return_to, verify_password};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginForm {
    #[serde(default)]
    username_or_email: String,
    #[serde(default)]
    password: String,
    return_url: Option<String>,
}

fn login_html(return_url: Option<&str>, error: Option<&str>) -> Html<String> {
    let error = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, res::escape(e)))
        .unwrap_or_default();

    Html(
        include_res!(str, "/pages/login.html")
            .replace("{return_url}", &res::escape(return_url.unwrap_or("/")))
            .replace("{error}", &error)
    )
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
) -> impl IntoResponse {
    login_html(return_url.as_deref(), None)
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(LoginForm { username_or_email, password, return_url }): Form<LoginForm>,
) -> AppResult<Response> {
    if username_or_email.is_empty() || password.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            login_html(return_url.as_deref(), Some("Please fill in all the fields")),
        ).into_response());
    }

    let user_id = match db::find_login(&db_pool, &username_or_email).await? {
        Some((user_id, hash)) if verify_password(&password, &hash) => user_id,
        _ => {
            tracing::info!(login = %username_or_email, "rejected login");
            return Ok((
                StatusCode::BAD_REQUEST,
                login_html(return_url.as_deref(), Some("Incorrect username/email or password")),
            ).into_response());
        }
    };

    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await?;

    tracing::info!(%user_id, "logged in");
    Ok(Redirect::to(&return_to(return_url)).into_response())
}
