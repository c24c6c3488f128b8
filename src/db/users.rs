use crate::errors::AppError;
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_user(row: &Row) -> Result<User> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidRole(role_str.clone())),
        )
    })?;

    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        nom: row.get("nom")?,
        prenom: row.get("prenom")?,
        role,
        magasin_id: row.get("magasin_id")?,
    })
}

pub struct NewUser<'a> {
    pub email: &'a str,
    pub nom: &'a str,
    pub prenom: &'a str,
    pub role: Role,
    pub magasin_id: Option<i64>,
}

pub fn insert_user(conn: &Connection, u: &NewUser) -> AppResult<User> {
    conn.execute(
        "INSERT INTO users (email, nom, prenom, role, magasin_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![u.email, u.nom, u.prenom, u.role.to_db_str(), u.magasin_id],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        email: u.email.to_string(),
        nom: u.nom.to_string(),
        prenom: u.prenom.to_string(),
        role: u.role,
        magasin_id: u.magasin_id,
    })
}

pub fn find_user(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, nom, prenom, role, magasin_id FROM users WHERE id = ?1",
            [id],
            map_user,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, email, nom, prenom, role, magasin_id FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete a user. Their presences survive with `user_id = NULL`.
pub fn delete_user(conn: &Connection, id: i64) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(n > 0)
}
