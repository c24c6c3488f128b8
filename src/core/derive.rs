//! Display-only fields computed from a presence's relations.
//!
//! | field         | relation present     | relation absent          |
//! |---------------|----------------------|--------------------------|
//! | `user_id`     | owner id as string   | `None`                   |
//! | `user_email`  | owner email          | [`UNKNOWN_EMAIL`]        |
//! | `user_nom`    | owner last name      | [`UNKNOWN_NAME`]         |
//! | `user_prenom` | owner first name     | [`UNKNOWN_FIRST_NAME`]   |
//! | `magasin_id`  | store id as string   | `None`                   |

use crate::models::presence::{PresenceRow, PresenceView};
use crate::models::store::Store;
use crate::models::user::User;

pub const UNKNOWN_EMAIL: &str = "unknown email";
pub const UNKNOWN_NAME: &str = "unknown name";
pub const UNKNOWN_FIRST_NAME: &str = "unknown first name";
/// Written into `magasin_nom` when the referenced store does not resolve.
pub const UNKNOWN_STORE: &str = "unknown store";

pub fn user_id(owner: Option<&User>) -> Option<String> {
    owner.map(|u| u.id.to_string())
}

pub fn user_email(owner: Option<&User>) -> String {
    owner.map_or_else(|| UNKNOWN_EMAIL.to_string(), |u| u.email.clone())
}

pub fn user_nom(owner: Option<&User>) -> String {
    owner.map_or_else(|| UNKNOWN_NAME.to_string(), |u| u.nom.clone())
}

pub fn user_prenom(owner: Option<&User>) -> String {
    owner.map_or_else(|| UNKNOWN_FIRST_NAME.to_string(), |u| u.prenom.clone())
}

pub fn magasin_id(store: Option<&Store>) -> Option<String> {
    store.map(|s| s.id.to_string())
}

pub fn to_view(row: &PresenceRow) -> PresenceView {
    let p = &row.presence;
    let owner = row.owner.as_ref();
    let store = row.store.as_ref();

    PresenceView {
        id: p.id,
        user: p.user,
        user_id: user_id(owner),
        user_email: user_email(owner),
        user_nom: user_nom(owner),
        user_prenom: user_prenom(owner),
        magasin: p.magasin,
        magasin_id: magasin_id(store),
        magasin_nom: p.magasin_nom.clone(),
        date_pointage: p.date_pointage,
        heure_entree: p.heure_entree,
        heure_sortie: p.heure_sortie,
        pause_entree: p.pause_entree,
        pause_sortie: p.pause_sortie,
        duree_pause: p.duree_pause,
        latitude: p.latitude,
        longitude: p.longitude,
        kind: p.kind,
    }
}
