//! Row-level visibility: which presences a requester may read or write.

use crate::db::queries::find_presence;
use crate::errors::{AppError, AppResult};
use crate::models::presence::PresenceRow;
use crate::models::user::User;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every presence (administrators).
    All,
    /// Only presences owned by this user id.
    Owner(i64),
}

impl Scope {
    /// Owner restriction to push down into queries, `None` for unrestricted.
    pub fn owner(&self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Owner(id) => Some(*id),
        }
    }

    pub fn allows(&self, owner: Option<i64>) -> bool {
        match self {
            Scope::All => true,
            Scope::Owner(id) => owner == Some(*id),
        }
    }
}

pub fn scope_for(requester: &User) -> Scope {
    if requester.role.is_admin() {
        Scope::All
    } else {
        Scope::Owner(requester.id)
    }
}

/// Load presence `id` when `scope` allows it. Rows outside the scope are
/// reported exactly like missing ones.
pub fn find_visible(conn: &Connection, id: i64, scope: Scope) -> AppResult<PresenceRow> {
    find_presence(conn, id)?
        .filter(|row| scope.allows(row.presence.user))
        .ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            nom: "N".into(),
            prenom: "P".into(),
            role,
            magasin_id: None,
        }
    }

    #[test]
    fn admin_sees_everything() {
        let s = scope_for(&user(1, Role::Admin));
        assert_eq!(s, Scope::All);
        assert!(s.allows(None));
        assert!(s.allows(Some(42)));
    }

    #[test]
    fn others_see_only_their_own_rows() {
        for role in [Role::Manager, Role::Employe] {
            let s = scope_for(&user(7, role));
            assert_eq!(s.owner(), Some(7));
            assert!(s.allows(Some(7)));
            assert!(!s.allows(Some(8)));
            assert!(!s.allows(None));
        }
    }
}
