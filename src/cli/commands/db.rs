use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use rusqlite::Connection;

/// Rows that are legal but worth knowing about: presences whose owner was
/// deleted, and presences pointing at a store id that does not resolve.
fn dangling_counts(conn: &Connection) -> AppResult<(i64, i64)> {
    let ownerless: i64 = conn.query_row(
        "SELECT COUNT(*) FROM presences WHERE user_id IS NULL",
        [],
        |row| row.get(0),
    )?;
    let unresolved: i64 = conn.query_row(
        "SELECT COUNT(*) FROM presences p
         LEFT JOIN magasins m ON m.id = p.magasin_id
         WHERE m.id IS NULL",
        [],
        |row| row.get(0),
    )?;
    Ok((ownerless, unresolved))
}

fn check(conn: &Connection) -> AppResult<()> {
    info("Running integrity check…");

    let integrity: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if integrity == "ok" {
        success("Integrity check passed.");
    } else {
        warning(format!("Integrity check failed: {}", integrity));
    }

    let (ownerless, unresolved) = dangling_counts(conn)?;
    if ownerless > 0 {
        warning(format!("{} presence(s) have no owner (user deleted).", ownerless));
    }
    if unresolved > 0 {
        warning(format!(
            "{} presence(s) reference a store that does not exist.",
            unresolved
        ));
    }

    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check: run_check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        info("Running migrations…");
        run_pending_migrations(&pool.conn)?;
        success("Migrations completed.");
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *run_check {
        check(&pool.conn)?;
    }

    if *vacuum {
        info("Running VACUUM…");
        pool.conn.execute_batch("VACUUM;")?;
        success("Vacuum completed.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    #[test]
    fn dangling_rows_are_counted() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool.conn
            .execute_batch(
                "INSERT INTO presences (user_id, magasin_id, magasin_nom, date_pointage, type)
                 VALUES (NULL, 42, 'unknown store', '2025-03-10T08:00:00.000Z', 'arrivee');",
            )
            .unwrap();

        assert_eq!(dangling_counts(&pool.conn).unwrap(), (1, 1));
    }
}
