use serde::Serialize;

/// A store ("magasin") employees punch in at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    pub id: i64,
    pub nom: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Store {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
