use super::{punch_type::PunchType, store::Store, user::User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One punch-clock record, as stored in the `presences` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
    pub id: i64,
    pub user: Option<i64>,   // ⇔ presences.user_id (NULL once the owner is deleted)
    pub magasin: i64,        // ⇔ presences.magasin_id (not a foreign key)
    pub magasin_nom: String, // denormalized copy of magasins.nom, written at creation
    pub date_pointage: DateTime<Utc>,
    pub heure_entree: Option<DateTime<Utc>>,
    pub heure_sortie: Option<DateTime<Utc>>,
    pub pause_entree: Option<DateTime<Utc>>,
    pub pause_sortie: Option<DateTime<Utc>>,
    pub duree_pause: Option<i64>, // minutes
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub kind: PunchType, // ⇔ presences.type
}

impl Presence {
    /// Whole minutes between break start and break end, when both are known.
    pub fn break_minutes(&self) -> Option<i64> {
        match (self.pause_entree, self.pause_sortie) {
            (Some(start), Some(end)) => Some((end - start).num_minutes().max(0)),
            _ => None,
        }
    }
}

/// A presence together with its resolved relations.
/// `owner` / `store` are `None` when the referenced row does not exist.
#[derive(Debug, Clone)]
pub struct PresenceRow {
    pub presence: Presence,
    pub owner: Option<User>,
    pub store: Option<Store>,
}

/// Outbound JSON representation of a presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceView {
    pub id: i64,
    pub user: Option<i64>,
    pub user_id: Option<String>,
    pub user_email: String,
    pub user_nom: String,
    pub user_prenom: String,
    pub magasin: i64,
    pub magasin_id: Option<String>,
    pub magasin_nom: String,
    pub date_pointage: DateTime<Utc>,
    pub heure_entree: Option<DateTime<Utc>>,
    pub heure_sortie: Option<DateTime<Utc>>,
    pub pause_entree: Option<DateTime<Utc>>,
    pub pause_sortie: Option<DateTime<Utc>>,
    pub duree_pause: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub kind: PunchType,
}

/// Inbound JSON payload for create / update.
///
/// Read-only fields (`id`, `user`) are dropped like any unknown key.
/// Nullable fields use a double `Option`: outer `None` means the key was
/// absent, `Some(None)` means an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresencePayload {
    #[serde(default)]
    pub magasin: Option<i64>,
    #[serde(default)]
    pub magasin_nom: Option<String>,
    #[serde(default)]
    pub date_pointage: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub heure_entree: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub heure_sortie: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pause_entree: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pause_sortie: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub duree_pause: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, rename = "type")]
    pub kind: Option<PunchType>,
}

fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl PresencePayload {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Client-supplied store name, ignoring blanks.
    pub fn store_name(&self) -> Option<&str> {
        self.magasin_nom
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Latitude/longitude pair carried by the payload, if both are set.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(Some(lat)), Some(Some(lon))) => Some((lat, lon)),
            _ => None,
        }
    }
}
