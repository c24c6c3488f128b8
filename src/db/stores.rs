use crate::errors::AppResult;
use crate::models::store::Store;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_store(row: &Row) -> Result<Store> {
    Ok(Store {
        id: row.get("id")?,
        nom: row.get("nom")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    })
}

pub fn insert_store(
    conn: &Connection,
    nom: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> AppResult<Store> {
    conn.execute(
        "INSERT INTO magasins (nom, latitude, longitude) VALUES (?1, ?2, ?3)",
        params![nom, latitude, longitude],
    )?;

    Ok(Store {
        id: conn.last_insert_rowid(),
        nom: nom.to_string(),
        latitude,
        longitude,
    })
}

pub fn find_store(conn: &Connection, id: i64) -> AppResult<Option<Store>> {
    let store = conn
        .query_row(
            "SELECT id, nom, latitude, longitude FROM magasins WHERE id = ?1",
            [id],
            map_store,
        )
        .optional()?;
    Ok(store)
}

pub fn list_stores(conn: &Connection) -> AppResult<Vec<Store>> {
    let mut stmt =
        conn.prepare("SELECT id, nom, latitude, longitude FROM magasins ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_store)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Rename a store. Existing presences keep their copied `magasin_nom`.
/// Returns false when no store has this id.
pub fn rename_store(conn: &Connection, id: i64, nom: &str) -> AppResult<bool> {
    let n = conn.execute("UPDATE magasins SET nom = ?1 WHERE id = ?2", params![nom, id])?;
    Ok(n > 0)
}
