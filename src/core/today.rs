use crate::core::derive;
use crate::db::pool::DbPool;
use crate::db::queries::latest_for_user_between;
use crate::errors::{AppError, AppResult};
use crate::models::presence::{Presence, PresenceView};
use crate::models::punch_type::PunchType;
use crate::models::user::User;
use chrono::{DateTime, Days, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Absent,
    Present,
    Pause,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayStatus {
    pub status: DayStatus,
    pub presence: Option<PresenceView>,
}

/// Status implied by the latest punch of the day.
/// Timestamps win over the punch type when they are filled in.
pub fn status_of(p: Option<&Presence>) -> DayStatus {
    let Some(p) = p else {
        return DayStatus::Absent;
    };

    if p.heure_sortie.is_some() {
        return DayStatus::Absent;
    }
    if p.pause_entree.is_some() && p.pause_sortie.is_none() {
        return DayStatus::Pause;
    }

    match p.kind {
        PunchType::Depart => DayStatus::Absent,
        PunchType::PauseEntree => DayStatus::Pause,
        PunchType::Arrivee | PunchType::PauseSortie => DayStatus::Present,
    }
}

pub struct TodayLogic;

impl TodayLogic {
    /// The requester's own latest punch on the UTC day of `now`.
    /// Only ever looks at the requester's rows, whatever their role.
    pub fn status(pool: &DbPool, requester: &User, now: DateTime<Utc>) -> AppResult<TodayStatus> {
        let start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| AppError::Other("invalid day start".into()))?;
        let end = start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::Other("day overflow".into()))?;

        let row = latest_for_user_between(&pool.conn, requester.id, &start, &end)?;

        Ok(TodayStatus {
            status: status_of(row.as_ref().map(|r| &r.presence)),
            presence: row.as_ref().map(derive::to_view),
        })
    }
}
