//! SQLite connection wrapper (one connection per CLI run or per server).

use rusqlite::{Connection, Result, Transaction};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // ON DELETE SET NULL on presences.user_id relies on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Begin a transaction. Dropping it without `commit()` rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction()
    }
}
