//! Geolocation helpers.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (lat, lon) points, in degrees.
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

pub fn valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_m((48.8566, 2.3522), (48.8566, 2.3522)), 0.0);
    }

    #[test]
    fn paris_to_lyon_is_about_392_km() {
        let d = haversine_m((48.8566, 2.3522), (45.7640, 4.8357));
        assert!((d - 392_000.0).abs() < 2_000.0, "got {d}");
    }

    #[test]
    fn coordinate_bounds() {
        assert!(valid_latitude(-90.0));
        assert!(!valid_latitude(90.5));
        assert!(valid_longitude(180.0));
        assert!(!valid_longitude(f64::NAN));
    }
}
