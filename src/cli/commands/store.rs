use crate::cli::parser::{Commands, StoreAction};
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log::ttlog;
use crate::db::stores::{insert_store, list_stores, rename_store};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::geo::{valid_latitude, valid_longitude};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Store { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        StoreAction::Add { nom, lat, lon } => {
            if nom.trim().is_empty() {
                return Err(AppError::Validation("store name may not be blank".into()));
            }
            if lat.is_some() != lon.is_some() {
                return Err(AppError::Validation(
                    "--lat and --lon must be given together".into(),
                ));
            }
            if let (Some(la), Some(lo)) = (lat, lon)
                && !(valid_latitude(*la) && valid_longitude(*lo))
            {
                return Err(AppError::Validation(format!(
                    "invalid coordinates {}, {}",
                    la, lo
                )));
            }

            let tx = pool.transaction()?;
            let store = insert_store(&tx, nom.trim(), *lat, *lon)?;
            ttlog(&tx, "store_add", &format!("store:{}", store.id), &store.nom)?;
            tx.commit()?;

            success(format!("Store #{} '{}' created.", store.id, store.nom));
        }

        StoreAction::List => {
            let stores = list_stores(&pool.conn)?;
            if stores.is_empty() {
                info("No stores.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "NAME", "COORDINATES"]);
            for s in stores {
                let coords = s
                    .coordinates()
                    .map(|(la, lo)| format!("{:.6}, {:.6}", la, lo))
                    .unwrap_or_else(|| "--".into());
                table.add_row(vec![s.id.to_string(), s.nom.clone(), coords]);
            }
            print!("{}", table.render());
        }

        StoreAction::Rename { id, nom } => {
            let tx = pool.transaction()?;
            if !rename_store(&tx, *id, nom.trim())? {
                return Err(AppError::UnknownStore(*id));
            }
            ttlog(&tx, "store_rename", &format!("store:{}", id), nom.trim())?;
            tx.commit()?;

            success(format!("Store #{} renamed to '{}'.", id, nom.trim()));
            warning("Existing presences keep the store name they were recorded with.");
        }
    }

    Ok(())
}
