use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log::ttlog;
use crate::db::stores::find_store;
use crate::db::users::{NewUser, delete_user, insert_user, list_users};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_optional_field};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        UserAction::Add {
            email,
            nom,
            prenom,
            role,
            magasin,
        } => {
            let role = Role::from_code(role).ok_or_else(|| AppError::InvalidRole(role.clone()))?;

            let tx = pool.transaction()?;
            if let Some(id) = magasin
                && find_store(&tx, *id)?.is_none()
            {
                return Err(AppError::UnknownStore(*id));
            }

            let user = insert_user(
                &tx,
                &NewUser {
                    email,
                    nom,
                    prenom,
                    role,
                    magasin_id: *magasin,
                },
            )?;
            ttlog(
                &tx,
                "user_add",
                &format!("user:{}", user.id),
                &format!("{} ({})", user.email, role.to_db_str()),
            )?;
            tx.commit()?;

            success(format!("User #{} {} created.", user.id, user.full_name()));
        }

        UserAction::List => {
            let users = list_users(&pool.conn)?;
            if users.is_empty() {
                info("No users.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "EMAIL", "NAME", "ROLE", "STORE"]);
            for u in users {
                let store = u.magasin_id.map(|m| m.to_string());
                let color = color_for_optional_field(store.as_deref());
                table.add_row(vec![
                    u.id.to_string(),
                    u.email.clone(),
                    u.full_name(),
                    u.role.to_db_str().to_string(),
                    format!("{}{}{}", color, store.unwrap_or_else(|| "--".into()), RESET),
                ]);
            }
            print!("{}", table.render());
        }

        UserAction::Del { id } => {
            let tx = pool.transaction()?;
            if !delete_user(&tx, *id)? {
                return Err(AppError::UnknownUser(*id));
            }
            ttlog(&tx, "user_del", &format!("user:{}", id), "user deleted")?;
            tx.commit()?;

            success(format!("User #{} deleted; their presences are kept.", id));
        }
    }

    Ok(())
}
