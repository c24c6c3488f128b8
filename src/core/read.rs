use crate::core::derive;
use crate::core::visibility::{find_visible, scope_for};
use crate::db::pool::DbPool;
use crate::db::queries::{PresenceFilter, list_presences};
use crate::errors::{AppError, AppResult};
use crate::models::presence::PresenceView;
use crate::models::punch_type::PunchType;
use crate::models::user::User;
use serde::Deserialize;

/// Caller-supplied list filters (`?user=&magasin=&type=&ordering=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub user: Option<i64>,
    pub magasin: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ordering: Option<String>,
}

impl ListQuery {
    /// Resolve against the requester's scope. Unknown `ordering` values fall
    /// back to the default (newest punch first).
    pub fn to_filter(&self, requester: &User) -> AppResult<PresenceFilter> {
        let kind = match self.kind.as_deref() {
            Some(code) => Some(
                PunchType::from_code(code)
                    .ok_or_else(|| AppError::InvalidPunchType(code.to_string()))?,
            ),
            None => None,
        };

        Ok(PresenceFilter {
            owner_scope: scope_for(requester).owner(),
            user: self.user,
            magasin: self.magasin,
            kind,
            ascending: matches!(self.ordering.as_deref(), Some("date_pointage")),
        })
    }
}

pub struct ReadLogic;

impl ReadLogic {
    pub fn list(
        pool: &DbPool,
        requester: &User,
        query: &ListQuery,
    ) -> AppResult<Vec<PresenceView>> {
        let filter = query.to_filter(requester)?;
        let rows = list_presences(&pool.conn, &filter)?;
        Ok(rows.iter().map(derive::to_view).collect())
    }

    pub fn retrieve(pool: &DbPool, requester: &User, id: i64) -> AppResult<PresenceView> {
        let row = find_visible(&pool.conn, id, scope_for(requester))?;
        Ok(derive::to_view(&row))
    }
}
