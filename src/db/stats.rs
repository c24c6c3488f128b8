use crate::db::pool::DbPool;
use crate::db::queries::count_presences;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let presences = count_presences(&pool.conn)?;
    let users: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    let stores: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM magasins", [], |row| row.get(0))?;

    println!("{}• Presences:{} {}{}{}", CYAN, RESET, GREEN, presences, RESET);
    println!("{}• Users:{} {}", CYAN, RESET, users);
    println!("{}• Stores:{} {}", CYAN, RESET, stores);

    //
    // 3) PUNCH DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT date_pointage FROM presences ORDER BY date_pointage ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT date_pointage FROM presences ORDER BY date_pointage DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Punch range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
