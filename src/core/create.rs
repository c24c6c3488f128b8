use crate::core::WriteOptions;
use crate::core::derive::{self, UNKNOWN_STORE};
use crate::core::validate::{check_presence, required};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{find_presence, insert_presence};
use crate::db::stores::find_store;
use crate::errors::{AppError, AppResult};
use crate::models::presence::{Presence, PresencePayload, PresenceView};
use crate::models::store::Store;
use crate::models::user::User;
use crate::utils::geo::haversine_m;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Write pipeline for new presences.
pub struct CreateLogic;

impl CreateLogic {
    /// Create a presence owned by `requester` from a raw JSON body.
    ///
    /// Every failure (missing store assignment, malformed payload, storage
    /// error) is returned as an `AppError` and leaves the database untouched.
    pub fn apply(
        pool: &mut DbPool,
        requester: &User,
        body: &[u8],
        opts: WriteOptions,
    ) -> AppResult<PresenceView> {
        info!(
            user_id = requester.id,
            email = %requester.email,
            "presence create attempt"
        );

        let result = Self::run(pool, requester, body, opts);

        match &result {
            Ok(view) => info!(
                presence_id = view.id,
                user_id = requester.id,
                magasin = view.magasin,
                "presence created"
            ),
            Err(e) => warn!(user_id = requester.id, error = %e, "presence create failed"),
        }

        result
    }

    fn run(
        pool: &mut DbPool,
        requester: &User,
        body: &[u8],
        opts: WriteOptions,
    ) -> AppResult<PresenceView> {
        if requester.magasin_id.is_none() {
            return Err(AppError::NoStoreAssigned);
        }

        let payload = PresencePayload::from_json(body)?;

        let tx = pool.transaction()?;

        let draft = build_new(&tx, requester, &payload, opts)?;
        let id = insert_presence(&tx, &draft)?;

        ttlog(
            &tx,
            "create",
            &format!("presence:{}", id),
            &format!(
                "{} punched {} at {} ({})",
                requester.email,
                draft.kind.to_db_str(),
                draft.magasin_nom,
                draft.date_pointage
            ),
        )?;

        let row = find_presence(&tx, id)?
            .ok_or_else(|| AppError::Other(format!("presence {} vanished after insert", id)))?;

        tx.commit()?;

        Ok(derive::to_view(&row))
    }
}

/// Assemble the record to insert. The owner always comes from `requester`.
fn build_new(
    conn: &Connection,
    requester: &User,
    payload: &PresencePayload,
    opts: WriteOptions,
) -> AppResult<Presence> {
    let magasin = required(payload.magasin, "magasin")?;
    let date_pointage = required(payload.date_pointage, "date_pointage")?;
    let kind = required(payload.kind, "type")?;

    let store = find_store(conn, magasin)?;

    let magasin_nom = match (payload.store_name(), &store) {
        (Some(name), _) => name.to_string(),
        (None, Some(s)) => {
            debug!(magasin, nom = %s.nom, "store name resolved");
            s.nom.clone()
        }
        (None, None) => {
            debug!(magasin, "store not found, using placeholder name");
            UNKNOWN_STORE.to_string()
        }
    };

    let mut p = Presence {
        id: 0,
        user: Some(requester.id),
        magasin,
        magasin_nom,
        date_pointage,
        heure_entree: payload.heure_entree.flatten(),
        heure_sortie: payload.heure_sortie.flatten(),
        pause_entree: payload.pause_entree.flatten(),
        pause_sortie: payload.pause_sortie.flatten(),
        duree_pause: payload.duree_pause.flatten(),
        latitude: payload.latitude.flatten(),
        longitude: payload.longitude.flatten(),
        kind,
    };

    if p.duree_pause.is_none() {
        p.duree_pause = p.break_minutes();
    }

    check_presence(&p)?;

    if let (Some(radius), Some(point), Some(store)) =
        (opts.gps_radius_m, payload.coordinates(), &store)
    {
        check_geofence(point, store, radius)?;
    }

    Ok(p)
}

/// Reject punches farther than `radius` meters from a store with known coordinates.
pub fn check_geofence(point: (f64, f64), store: &Store, radius: f64) -> AppResult<()> {
    let Some(target) = store.coordinates() else {
        return Ok(());
    };

    let distance = haversine_m(point, target);
    if distance > radius {
        return Err(AppError::OutOfRange {
            distance: distance.round() as i64,
            radius: radius.round() as i64,
        });
    }
    Ok(())
}
