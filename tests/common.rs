#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rpresence::db::initialize::init_db;
use rpresence::db::pool::DbPool;
use rpresence::db::stores::insert_store;
use rpresence::db::users::{NewUser, insert_user};
use rpresence::models::role::Role;
use rpresence::models::store::Store;
use rpresence::models::user::User;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rpi() -> Command {
    cargo_bin_cmd!("rpresence")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpresence.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a DB through the CLI (`--test init` leaves the config file alone)
pub fn init_cli_db(db_path: &str) {
    rpi()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Fresh in-memory database with the full schema
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// Small fixture: one store, an admin, two employees assigned to it and
/// a manager with no store.
pub struct Fixture {
    pub store: Store,
    pub admin: User,
    pub alice: User,
    pub bob: User,
    pub drifter: User,
}

pub fn seed(pool: &DbPool) -> Fixture {
    let conn = &pool.conn;
    let store = insert_store(conn, "Central", Some(48.8566), Some(2.3522)).expect("store");

    let user = |email: &str, nom: &str, prenom: &str, role: Role, magasin_id: Option<i64>| {
        insert_user(
            conn,
            &NewUser {
                email,
                nom,
                prenom,
                role,
                magasin_id,
            },
        )
        .expect("user")
    };

    Fixture {
        admin: user("admin@shop.test", "Root", "Ada", Role::Admin, Some(store.id)),
        alice: user("alice@shop.test", "Martin", "Alice", Role::Employe, Some(store.id)),
        bob: user("bob@shop.test", "Durand", "Bob", Role::Employe, Some(store.id)),
        drifter: user("drifter@shop.test", "Petit", "Dan", Role::Manager, None),
        store,
    }
}

/// Minimal valid create body at `magasin`.
pub fn punch_body(magasin: i64, date: &str, kind: &str) -> String {
    format!(
        r#"{{"magasin": {}, "date_pointage": "{}", "type": "{}"}}"#,
        magasin, date, kind
    )
}
