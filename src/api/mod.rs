//! HTTP surface of the presence resource.

pub mod error;
pub mod handlers;
pub mod requester;

use crate::core::WriteOptions;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Shared handler state. The single SQLite connection is serialized by the
/// mutex; every write runs in its own transaction while the lock is held.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<Mutex<DbPool>>,
    pub opts: WriteOptions,
}

impl AppState {
    pub fn new(pool: DbPool, opts: WriteOptions) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
            opts,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/presences",
            get(handlers::list_presences).post(handlers::create_presence),
        )
        .route("/presences/today", get(handlers::today))
        .route(
            "/presences/:id",
            get(handlers::retrieve_presence)
                .put(handlers::put_presence)
                .patch(handlers::patch_presence)
                .delete(handlers::delete_presence),
        )
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> AppResult<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "rpresence listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("rpresence stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
