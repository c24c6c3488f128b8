use crate::errors::{AppError, AppResult};
use crate::models::presence::{Presence, PresenceRow};
use crate::models::punch_type::PunchType;
use crate::models::role::Role;
use crate::models::store::Store;
use crate::models::user::User;
use crate::utils::time::{opt_to_db, parse_ts, to_db};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Presence joined with its owner and store. Relation columns are NULL when
/// the referenced row does not exist.
const SELECT_JOINED: &str = r#"
    SELECT p.id, p.user_id, p.magasin_id, p.magasin_nom, p.date_pointage,
           p.heure_entree, p.heure_sortie, p.pause_entree, p.pause_sortie,
           p.duree_pause, p.latitude, p.longitude, p.type,
           u.id AS u_id, u.email AS u_email, u.nom AS u_nom, u.prenom AS u_prenom,
           u.role AS u_role, u.magasin_id AS u_magasin_id,
           m.id AS m_id, m.nom AS m_nom, m.latitude AS m_latitude, m.longitude AS m_longitude
    FROM presences p
    LEFT JOIN users u ON u.id = p.user_id
    LEFT JOIN magasins m ON m.id = p.magasin_id
"#;

/// Row filter for listing. `owner_scope` comes from the visibility policy,
/// the other fields from the caller's query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceFilter {
    pub owner_scope: Option<i64>,
    pub user: Option<i64>,
    pub magasin: Option<i64>,
    pub kind: Option<PunchType>,
    pub ascending: bool,
}

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn get_ts(row: &Row, col: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    parse_ts(&raw).map_err(conversion_error)
}

fn get_opt_ts(row: &Row, col: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| parse_ts(&s)).transpose().map_err(conversion_error)
}

pub fn map_row(row: &Row) -> Result<PresenceRow> {
    let kind_str: String = row.get("type")?;
    let kind = PunchType::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(AppError::InvalidPunchType(kind_str.clone())))?;

    let presence = Presence {
        id: row.get("id")?,
        user: row.get("user_id")?,
        magasin: row.get("magasin_id")?,
        magasin_nom: row.get("magasin_nom")?,
        date_pointage: get_ts(row, "date_pointage")?,
        heure_entree: get_opt_ts(row, "heure_entree")?,
        heure_sortie: get_opt_ts(row, "heure_sortie")?,
        pause_entree: get_opt_ts(row, "pause_entree")?,
        pause_sortie: get_opt_ts(row, "pause_sortie")?,
        duree_pause: row.get("duree_pause")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        kind,
    };

    let owner = match row.get::<_, Option<i64>>("u_id")? {
        Some(id) => {
            let role_str: String = row.get("u_role")?;
            let role = Role::from_db_str(&role_str)
                .ok_or_else(|| conversion_error(AppError::InvalidRole(role_str.clone())))?;
            Some(User {
                id,
                email: row.get("u_email")?,
                nom: row.get("u_nom")?,
                prenom: row.get("u_prenom")?,
                role,
                magasin_id: row.get("u_magasin_id")?,
            })
        }
        None => None,
    };

    let store = match row.get::<_, Option<i64>>("m_id")? {
        Some(id) => Some(Store {
            id,
            nom: row.get("m_nom")?,
            latitude: row.get("m_latitude")?,
            longitude: row.get("m_longitude")?,
        }),
        None => None,
    };

    Ok(PresenceRow {
        presence,
        owner,
        store,
    })
}

pub fn list_presences(conn: &Connection, filter: &PresenceFilter) -> AppResult<Vec<PresenceRow>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(owner) = filter.owner_scope {
        clauses.push("p.user_id = ?");
        values.push(Value::Integer(owner));
    }
    if let Some(user) = filter.user {
        clauses.push("p.user_id = ?");
        values.push(Value::Integer(user));
    }
    if let Some(magasin) = filter.magasin {
        clauses.push("p.magasin_id = ?");
        values.push(Value::Integer(magasin));
    }
    if let Some(kind) = filter.kind {
        clauses.push("p.type = ?");
        values.push(Value::Text(kind.to_db_str().to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let order = if filter.ascending { "ASC" } else { "DESC" };

    let sql = format!(
        "{} {} ORDER BY p.date_pointage {order}, p.id {order}",
        SELECT_JOINED, where_sql
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Load one presence with its relations, whoever owns it.
pub fn find_presence(conn: &Connection, id: i64) -> AppResult<Option<PresenceRow>> {
    let row = conn
        .query_row(
            &format!("{} WHERE p.id = ?1", SELECT_JOINED),
            [id],
            map_row,
        )
        .optional()?;
    Ok(row)
}

/// Most recent presence of `user_id` with `from <= date_pointage < to`.
pub fn latest_for_user_between(
    conn: &Connection,
    user_id: i64,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> AppResult<Option<PresenceRow>> {
    let row = conn
        .query_row(
            &format!(
                "{} WHERE p.user_id = ?1 AND p.date_pointage >= ?2 AND p.date_pointage < ?3
                 ORDER BY p.date_pointage DESC, p.id DESC LIMIT 1",
                SELECT_JOINED
            ),
            params![user_id, to_db(from), to_db(to)],
            map_row,
        )
        .optional()?;
    Ok(row)
}

/// Insert a presence and return its new id (`p.id` is ignored).
pub fn insert_presence(conn: &Connection, p: &Presence) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO presences (user_id, magasin_id, magasin_nom, date_pointage,
                                heure_entree, heure_sortie, pause_entree, pause_sortie,
                                duree_pause, latitude, longitude, type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            p.user,
            p.magasin,
            p.magasin_nom,
            to_db(&p.date_pointage),
            opt_to_db(&p.heure_entree),
            opt_to_db(&p.heure_sortie),
            opt_to_db(&p.pause_entree),
            opt_to_db(&p.pause_sortie),
            p.duree_pause,
            p.latitude,
            p.longitude,
            p.kind.to_db_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update every writable column. The owner column is never touched.
pub fn update_presence(conn: &Connection, p: &Presence) -> AppResult<()> {
    conn.execute(
        "UPDATE presences
         SET magasin_id = ?1, magasin_nom = ?2, date_pointage = ?3,
             heure_entree = ?4, heure_sortie = ?5, pause_entree = ?6, pause_sortie = ?7,
             duree_pause = ?8, latitude = ?9, longitude = ?10, type = ?11
         WHERE id = ?12",
        params![
            p.magasin,
            p.magasin_nom,
            to_db(&p.date_pointage),
            opt_to_db(&p.heure_entree),
            opt_to_db(&p.heure_sortie),
            opt_to_db(&p.pause_entree),
            opt_to_db(&p.pause_sortie),
            p.duree_pause,
            p.latitude,
            p.longitude,
            p.kind.to_db_str(),
            p.id,
        ],
    )?;
    Ok(())
}

pub fn delete_presence(conn: &Connection, id: i64) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM presences WHERE id = ?1", [id])?;
    Ok(n > 0)
}

pub fn count_presences(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM presences", [], |row| row.get(0))?;
    Ok(n)
}
