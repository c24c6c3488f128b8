use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::read::{ListQuery, ReadLogic};
use crate::db::initialize::open_db;
use crate::db::users::find_user;
use crate::errors::{AppError, AppResult};
use crate::models::presence::PresenceView;
use crate::ui::messages::info;
use crate::utils::table::Table;
use crate::utils::time::format_minutes;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        as_user,
        magasin,
        kind,
        asc,
    } = cmd
    {
        let pool = open_db(&cfg.database)?;
        let requester = find_user(&pool.conn, *as_user)?.ok_or(AppError::UnknownUser(*as_user))?;

        let query = ListQuery {
            user: None,
            magasin: *magasin,
            kind: kind.clone(),
            ordering: asc.then(|| "date_pointage".to_string()),
        };

        let rows = ReadLogic::list(&pool, &requester, &query)?;

        if rows.is_empty() {
            info(format!("No presences visible to {}.", requester.email));
            return Ok(());
        }

        print_presences(&rows);
    }
    Ok(())
}

fn hhmm(ts: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--".into())
}

fn print_presences(rows: &[PresenceView]) {
    let mut table = Table::new([
        "ID", "DATE", "TYPE", "USER", "STORE", "IN", "OUT", "BREAK",
    ]);

    for p in rows {
        table.add_row(vec![
            p.id.to_string(),
            p.date_pointage.format("%Y-%m-%d %H:%M").to_string(),
            p.kind.to_db_str().to_string(),
            p.user_email.clone(),
            p.magasin_nom.clone(),
            hhmm(&p.heure_entree),
            hhmm(&p.heure_sortie),
            p.duree_pause
                .map(format_minutes)
                .unwrap_or_else(|| "--".into()),
        ]);
    }

    print!("{}", table.render());
}
