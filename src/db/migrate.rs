use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Stores. Coordinates were added later, see `migrate_add_store_coordinates`.
fn create_magasins_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS magasins (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            nom        TEXT NOT NULL,
            latitude   REAL,
            longitude  REAL
        );
        "#,
    )?;
    Ok(())
}

fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            nom         TEXT NOT NULL DEFAULT '',
            prenom      TEXT NOT NULL DEFAULT '',
            role        TEXT NOT NULL DEFAULT 'employe' CHECK(role IN ('admin','manager','employe')),
            magasin_id  INTEGER REFERENCES magasins(id) ON DELETE SET NULL
        );
        "#,
    )?;
    Ok(())
}

/// Punch records. `magasin_id` is not a foreign key: a punch
/// may reference a store id that does not resolve (its name then falls
/// back to a placeholder).
fn create_presences_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS presences (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER REFERENCES users(id) ON DELETE SET NULL,
            magasin_id     INTEGER NOT NULL,
            magasin_nom    TEXT NOT NULL,
            date_pointage  TEXT NOT NULL,
            heure_entree   TEXT,
            heure_sortie   TEXT,
            pause_entree   TEXT,
            pause_sortie   TEXT,
            duree_pause    INTEGER CHECK(duree_pause IS NULL OR duree_pause >= 0),
            latitude       REAL,
            longitude      REAL,
            type           TEXT NOT NULL
                           CHECK(type IN ('arrivee','depart','pause_entree','pause_sortie'))
        );

        CREATE INDEX IF NOT EXISTS idx_presences_user_date ON presences(user_id, date_pointage);
        CREATE INDEX IF NOT EXISTS idx_presences_date ON presences(date_pointage);
        CREATE INDEX IF NOT EXISTS idx_presences_magasin ON presences(magasin_id);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Databases created before store geofencing lack `magasins.latitude/longitude`.
fn migrate_add_store_coordinates(conn: &Connection) -> Result<(), Error> {
    let version = "20250412_0002_add_store_coordinates";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    for column in ["latitude", "longitude"] {
        if !has_column(conn, "magasins", column)? {
            warning(format!("Adding '{}' column to magasins table...", column));
            conn.execute(&format!("ALTER TABLE magasins ADD COLUMN {} REAL;", column), [])
                .map_err(|e| {
                    Error::SqliteFailure(
                        rusqlite::ffi::Error::new(1),
                        Some(format!("Failed to add '{}' column: {}", column, e)),
                    )
                })?;
        }
    }

    mark_applied(conn, version, "Added latitude/longitude to magasins")?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "presences")?;

    create_magasins_table(conn)?;
    create_users_table(conn)?;
    create_presences_table(conn)?;

    if fresh {
        success("Created magasins, users and presences tables.");
    }

    migrate_add_store_coordinates(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[test]
    fn legacy_store_table_gains_coordinates() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE magasins (id INTEGER PRIMARY KEY AUTOINCREMENT, nom TEXT NOT NULL);",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        assert!(has_column(&conn, "magasins", "latitude").unwrap());
        assert!(has_column(&conn, "magasins", "longitude").unwrap());
    }
}
