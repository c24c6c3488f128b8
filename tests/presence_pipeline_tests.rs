mod common;

use common::{memory_pool, punch_body, seed};
use rpresence::core::WriteOptions;
use rpresence::core::create::CreateLogic;
use rpresence::core::del::DeleteLogic;
use rpresence::core::read::{ListQuery, ReadLogic};
use rpresence::core::today::{DayStatus, TodayLogic};
use rpresence::core::update::UpdateLogic;
use rpresence::db::queries::count_presences;
use rpresence::db::stores::rename_store;
use rpresence::db::users::delete_user;
use rpresence::errors::AppError;
use rpresence::models::punch_type::PunchType;

fn all() -> ListQuery {
    ListQuery::default()
}

#[test]
fn create_copies_store_name_and_owner_from_requester() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    // the client-supplied owner is ignored
    let body = format!(
        r#"{{"magasin": {}, "date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee", "user": {}}}"#,
        fx.store.id, fx.bob.id
    );
    let view = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");

    assert_eq!(view.user, Some(fx.alice.id));
    assert_eq!(view.user_id, Some(fx.alice.id.to_string()));
    assert_eq!(view.user_email, "alice@shop.test");
    assert_eq!(view.user_nom, "Martin");
    assert_eq!(view.user_prenom, "Alice");
    assert_eq!(view.magasin_nom, "Central");
    assert_eq!(view.magasin_id, Some(fx.store.id.to_string()));
    assert_eq!(view.kind, PunchType::Arrivee);
}

#[test]
fn client_store_name_wins_over_lookup() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = format!(
        r#"{{"magasin": {}, "magasin_nom": "Central (annex)", "date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee"}}"#,
        fx.store.id
    );
    let view = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");
    assert_eq!(view.magasin_nom, "Central (annex)");
}

#[test]
fn unresolvable_store_gets_placeholder_name() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(999, "2025-03-10T08:00:00Z", "arrivee");
    let view = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");

    assert_eq!(view.magasin, 999);
    assert_eq!(view.magasin_nom, "unknown store");
    assert_eq!(view.magasin_id, None);
}

#[test]
fn requester_without_store_cannot_create() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let err = CreateLogic::apply(&mut pool, &fx.drifter, body.as_bytes(), WriteOptions::default())
        .unwrap_err();

    assert!(matches!(err, AppError::NoStoreAssigned));
    assert_eq!(err.to_string(), "User not assigned to a store");
    assert_eq!(count_presences(&pool.conn).unwrap(), 0);
}

#[test]
fn invalid_payloads_write_nothing() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let bodies = [
        "not json".to_string(),
        r#"{"date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee"}"#.to_string(),
        punch_body(fx.store.id, "2025-03-10T08:00:00Z", "lunch"),
        punch_body(fx.store.id, "yesterday", "arrivee"),
        format!(
            r#"{{"magasin": {}, "date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee", "latitude": 91.0, "longitude": 0.0}}"#,
            fx.store.id
        ),
    ];

    for body in bodies {
        let res =
            CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default());
        assert!(res.is_err(), "body should be rejected: {body}");
    }
    assert_eq!(count_presences(&pool.conn).unwrap(), 0);
}

#[test]
fn break_duration_is_derived_from_break_timestamps() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = format!(
        r#"{{"magasin": {}, "date_pointage": "2025-03-10T12:45:00Z", "type": "pause_sortie",
            "pause_entree": "2025-03-10T12:00:00Z", "pause_sortie": "2025-03-10T12:45:00Z"}}"#,
        fx.store.id
    );
    let view = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");
    assert_eq!(view.duree_pause, Some(45));
}

#[test]
fn geofence_rejects_distant_punch_when_enabled() {
    let mut pool = memory_pool();
    let fx = seed(&pool);
    let opts = WriteOptions {
        gps_radius_m: Some(200.0),
    };

    let far = format!(
        r#"{{"magasin": {}, "date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee", "latitude": 45.764, "longitude": 4.8357}}"#,
        fx.store.id
    );
    let err = CreateLogic::apply(&mut pool, &fx.alice, far.as_bytes(), opts).unwrap_err();
    assert!(matches!(err, AppError::OutOfRange { .. }));

    let near = format!(
        r#"{{"magasin": {}, "date_pointage": "2025-03-10T08:00:00Z", "type": "arrivee", "latitude": 48.8567, "longitude": 2.3523}}"#,
        fx.store.id
    );
    assert!(CreateLogic::apply(&mut pool, &fx.alice, near.as_bytes(), opts).is_ok());
    assert_eq!(count_presences(&pool.conn).unwrap(), 1);
}

#[test]
fn admin_sees_everything_others_only_their_own() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    for (who, date) in [
        (&fx.alice, "2025-03-10T08:00:00Z"),
        (&fx.bob, "2025-03-10T09:00:00Z"),
        (&fx.alice, "2025-03-11T08:00:00Z"),
    ] {
        let body = punch_body(fx.store.id, date, "arrivee");
        CreateLogic::apply(&mut pool, who, body.as_bytes(), WriteOptions::default())
            .expect("create");
    }

    let admin_rows = ReadLogic::list(&pool, &fx.admin, &all()).unwrap();
    assert_eq!(admin_rows.len(), 3);
    // newest first by default
    assert_eq!(admin_rows[0].date_pointage.to_rfc3339(), "2025-03-11T08:00:00+00:00");

    let alice_rows = ReadLogic::list(&pool, &fx.alice, &all()).unwrap();
    assert_eq!(alice_rows.len(), 2);
    assert!(alice_rows.iter().all(|r| r.user == Some(fx.alice.id)));

    // a user filter cannot widen a non-admin's scope
    let widened = ListQuery {
        user: Some(fx.bob.id),
        ..ListQuery::default()
    };
    assert!(ReadLogic::list(&pool, &fx.alice, &widened).unwrap().is_empty());

    let ascending = ListQuery {
        ordering: Some("date_pointage".into()),
        ..ListQuery::default()
    };
    let rows = ReadLogic::list(&pool, &fx.admin, &ascending).unwrap();
    assert_eq!(rows[0].date_pointage.to_rfc3339(), "2025-03-10T08:00:00+00:00");

    let by_type = ListQuery {
        kind: Some("depart".into()),
        ..ListQuery::default()
    };
    assert!(ReadLogic::list(&pool, &fx.admin, &by_type).unwrap().is_empty());
}

#[test]
fn other_users_records_are_not_found() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let view = CreateLogic::apply(&mut pool, &fx.bob, body.as_bytes(), WriteOptions::default())
        .expect("create");

    assert!(matches!(
        ReadLogic::retrieve(&pool, &fx.alice, view.id),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        UpdateLogic::apply(&mut pool, &fx.alice, view.id, br#"{"type": "depart"}"#, true),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        DeleteLogic::apply(&mut pool, &fx.alice, view.id),
        Err(AppError::NotFound)
    ));

    // the admin reaches it
    assert!(ReadLogic::retrieve(&pool, &fx.admin, view.id).is_ok());
    DeleteLogic::apply(&mut pool, &fx.admin, view.id).expect("admin delete");
    assert_eq!(count_presences(&pool.conn).unwrap(), 0);
}

#[test]
fn failed_update_leaves_record_unchanged() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let before = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");

    let res = UpdateLogic::apply(
        &mut pool,
        &fx.alice,
        before.id,
        br#"{"type": "depart", "longitude": 500.0}"#,
        true,
    );
    assert!(res.is_err());

    let res = UpdateLogic::apply(&mut pool, &fx.alice, before.id, br#"{"type": "depart"}"#, false);
    assert!(res.is_err());

    let after = ReadLogic::retrieve(&pool, &fx.alice, before.id).unwrap();
    assert_eq!(after, before);
}

#[test]
fn audit_failure_after_insert_rolls_back_create() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    // the audit row is written after the presence row, inside the same transaction
    pool.conn.execute_batch("DROP TABLE log;").unwrap();

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let err = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .unwrap_err();

    assert!(matches!(err, AppError::Db(_)));
    assert_eq!(count_presences(&pool.conn).unwrap(), 0);
}

#[test]
fn audit_failure_after_write_rolls_back_update_and_delete() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let before = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");

    pool.conn.execute_batch("DROP TABLE log;").unwrap();

    let err = UpdateLogic::apply(
        &mut pool,
        &fx.alice,
        before.id,
        br#"{"type": "depart", "heure_sortie": "2025-03-10T17:00:00Z"}"#,
        true,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Db(_)));
    assert_eq!(ReadLogic::retrieve(&pool, &fx.alice, before.id).unwrap(), before);

    let err = DeleteLogic::apply(&mut pool, &fx.alice, before.id).unwrap_err();
    assert!(matches!(err, AppError::Db(_)));
    assert_eq!(count_presences(&pool.conn).unwrap(), 1);
}

#[test]
fn update_keeps_owner_and_stored_store_name() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let created = CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
        .expect("create");

    rename_store(&pool.conn, fx.store.id, "Central Renamed").unwrap();

    let updated = UpdateLogic::apply(
        &mut pool,
        &fx.admin,
        created.id,
        br#"{"type": "depart", "heure_sortie": "2025-03-10T17:00:00Z", "user": 1}"#,
        true,
    )
    .expect("patch");

    assert_eq!(updated.kind, PunchType::Depart);
    assert_eq!(updated.user, Some(fx.alice.id));
    assert_eq!(updated.magasin_nom, "Central");
    assert!(updated.heure_sortie.is_some());
}

#[test]
fn deleted_owner_shows_placeholders() {
    let mut pool = memory_pool();
    let fx = seed(&pool);

    let body = punch_body(fx.store.id, "2025-03-10T08:00:00Z", "arrivee");
    let created = CreateLogic::apply(&mut pool, &fx.bob, body.as_bytes(), WriteOptions::default())
        .expect("create");

    assert!(delete_user(&pool.conn, fx.bob.id).unwrap());

    let view = ReadLogic::retrieve(&pool, &fx.admin, created.id).unwrap();
    assert_eq!(view.user, None);
    assert_eq!(view.user_id, None);
    assert_eq!(view.user_email, "unknown email");
    assert_eq!(view.user_nom, "unknown name");
    assert_eq!(view.user_prenom, "unknown first name");
    assert_eq!(view.magasin_nom, "Central");
}

#[test]
fn today_reflects_latest_own_punch() {
    let mut pool = memory_pool();
    let fx = seed(&pool);
    let now = "2025-03-10T15:00:00Z".parse().unwrap();

    let status = TodayLogic::status(&pool, &fx.alice, now).unwrap();
    assert_eq!(status.status, DayStatus::Absent);
    assert!(status.presence.is_none());

    for (date, kind) in [
        ("2025-03-09T08:00:00Z", "arrivee"),
        ("2025-03-10T08:00:00Z", "arrivee"),
        ("2025-03-10T12:00:00Z", "pause_entree"),
    ] {
        let body = punch_body(fx.store.id, date, kind);
        CreateLogic::apply(&mut pool, &fx.alice, body.as_bytes(), WriteOptions::default())
            .expect("create");
    }

    let status = TodayLogic::status(&pool, &fx.alice, now).unwrap();
    assert_eq!(status.status, DayStatus::Pause);
    assert_eq!(status.presence.map(|p| p.kind), Some(PunchType::PauseEntree));

    // the admin's own day is still empty
    let admin = TodayLogic::status(&pool, &fx.admin, now).unwrap();
    assert_eq!(admin.status, DayStatus::Absent);
}
