use crate::core::visibility::{find_visible, scope_for};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::delete_presence;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use tracing::{info, warn};

pub struct DeleteLogic;

impl DeleteLogic {
    /// Delete presence `id` if it lies within the requester's scope.
    pub fn apply(pool: &mut DbPool, requester: &User, id: i64) -> AppResult<()> {
        let result = Self::run(pool, requester, id);

        match &result {
            Ok(()) => info!(presence_id = id, user_id = requester.id, "presence deleted"),
            Err(e) => warn!(
                presence_id = id,
                user_id = requester.id,
                error = %e,
                "presence delete failed"
            ),
        }

        result
    }

    fn run(pool: &mut DbPool, requester: &User, id: i64) -> AppResult<()> {
        let scope = scope_for(requester);
        let tx = pool.transaction()?;

        let row = find_visible(&tx, id, scope)?;

        if !delete_presence(&tx, id)? {
            return Err(AppError::NotFound);
        }

        ttlog(
            &tx,
            "delete",
            &format!("presence:{}", id),
            &format!(
                "deleted by {} ({} on {})",
                requester.email,
                row.presence.kind.to_db_str(),
                row.presence.date_pointage
            ),
        )?;

        tx.commit()?;
        Ok(())
    }
}
