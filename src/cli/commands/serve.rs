use crate::api::{self, AppState};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::WriteOptions;
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::logging::init_tracing;
use std::net::SocketAddr;
use tracing::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { bind } = cmd {
        init_tracing(cfg);

        let bind = bind.clone().unwrap_or_else(|| cfg.bind.clone());
        let addr: SocketAddr = bind
            .parse()
            .map_err(|_| AppError::Config(format!("invalid bind address '{}'", bind)))?;

        let pool = open_db(&cfg.database)?;
        info!(database = %cfg.database, gps_radius_m = ?cfg.gps_radius_m, "database ready");

        let state = AppState::new(pool, WriteOptions::from(cfg));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(api::serve(state, addr))?;
    }

    Ok(())
}
