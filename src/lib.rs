pub mod auth;
pub mod config;
pub mod db;
pub mod extract;
pub mod index;
pub mod res;
pub mod rooms;
pub mod session;

mod appresult;

use axum::{extract::FromRef, http::{header, HeaderValue, Method}, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

/// The whole HTTP surface, with sessions kept in memory for `config.session_idle`.
pub fn app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.session_idle));

    let mut app = Router::new()
        .route("/", get(index::index))
        .merge(auth::router())
        .nest("/rooms", rooms::router())
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = &config.cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);
        app = app.layer(cors);
    }

    Ok(app)
}
