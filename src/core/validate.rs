//! Field checks shared by the create and update pipelines.

use crate::errors::{AppError, AppResult};
use crate::models::presence::Presence;
use crate::utils::geo::{valid_latitude, valid_longitude};

pub fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Validation(format!("{}: This field is required.", field)))
}

/// Checks on a fully assembled record, run before anything is written.
pub fn check_presence(p: &Presence) -> AppResult<()> {
    if let Some(lat) = p.latitude
        && !valid_latitude(lat)
    {
        return Err(AppError::Validation(format!(
            "latitude: {} is outside [-90, 90].",
            lat
        )));
    }

    if let Some(lon) = p.longitude
        && !valid_longitude(lon)
    {
        return Err(AppError::Validation(format!(
            "longitude: {} is outside [-180, 180].",
            lon
        )));
    }

    if let Some(d) = p.duree_pause
        && d < 0
    {
        return Err(AppError::Validation(format!(
            "duree_pause: {} must not be negative.",
            d
        )));
    }

    if p.magasin_nom.trim().is_empty() {
        return Err(AppError::Validation(
            "magasin_nom: This field may not be blank.".into(),
        ));
    }

    Ok(())
}
