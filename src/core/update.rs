use crate::core::derive;
use crate::core::validate::{check_presence, required};
use crate::core::visibility::{find_visible, scope_for};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{find_presence, update_presence};
use crate::errors::{AppError, AppResult};
use crate::models::presence::{Presence, PresencePayload, PresenceView};
use crate::models::user::User;
use tracing::{info, warn};

/// Write pipeline for existing presences (PUT / PATCH).
pub struct UpdateLogic;

impl UpdateLogic {
    /// Update presence `id` within the requester's visibility scope.
    ///
    /// `partial = false` requires `magasin`, `date_pointage` and `type` in
    /// the payload. Either way only keys present in the payload change;
    /// the owner and the stored `magasin_nom` are never recomputed.
    pub fn apply(
        pool: &mut DbPool,
        requester: &User,
        id: i64,
        body: &[u8],
        partial: bool,
    ) -> AppResult<PresenceView> {
        info!(
            presence_id = id,
            user_id = requester.id,
            partial,
            "presence update attempt"
        );

        let result = Self::run(pool, requester, id, body, partial);

        match &result {
            Ok(_) => info!(presence_id = id, user_id = requester.id, "presence updated"),
            Err(e) => warn!(
                presence_id = id,
                user_id = requester.id,
                error = %e,
                "presence update failed"
            ),
        }

        result
    }

    fn run(
        pool: &mut DbPool,
        requester: &User,
        id: i64,
        body: &[u8],
        partial: bool,
    ) -> AppResult<PresenceView> {
        let scope = scope_for(requester);

        let tx = pool.transaction()?;

        let current = find_visible(&tx, id, scope)?;

        let payload = PresencePayload::from_json(body)?;
        let merged = merge(current.presence, &payload, partial)?;
        check_presence(&merged)?;

        update_presence(&tx, &merged)?;

        ttlog(
            &tx,
            if partial { "patch" } else { "update" },
            &format!("presence:{}", id),
            &format!("updated by {}", requester.email),
        )?;

        let row = find_presence(&tx, id)?.ok_or(AppError::NotFound)?;

        tx.commit()?;

        Ok(derive::to_view(&row))
    }
}

/// Apply the payload onto the current record.
pub fn merge(mut p: Presence, payload: &PresencePayload, partial: bool) -> AppResult<Presence> {
    if !partial {
        required(payload.magasin, "magasin")?;
        required(payload.date_pointage, "date_pointage")?;
        required(payload.kind, "type")?;
    }

    if let Some(m) = payload.magasin {
        p.magasin = m;
    }
    if let Some(name) = payload.store_name() {
        p.magasin_nom = name.to_string();
    }
    if let Some(d) = payload.date_pointage {
        p.date_pointage = d;
    }
    if let Some(v) = payload.heure_entree {
        p.heure_entree = v;
    }
    if let Some(v) = payload.heure_sortie {
        p.heure_sortie = v;
    }
    if let Some(v) = payload.pause_entree {
        p.pause_entree = v;
    }
    if let Some(v) = payload.pause_sortie {
        p.pause_sortie = v;
    }
    if let Some(v) = payload.latitude {
        p.latitude = v;
    }
    if let Some(v) = payload.longitude {
        p.longitude = v;
    }
    if let Some(k) = payload.kind {
        p.kind = k;
    }

    match payload.duree_pause {
        Some(v) => p.duree_pause = v,
        None => {
            // clearing either break timestamp clears the derived duration
            let break_touched = payload.pause_entree.is_some() || payload.pause_sortie.is_some();
            if break_touched || p.duree_pause.is_none() {
                p.duree_pause = p.break_minutes();
            }
        }
    }

    Ok(p)
}
