use serde::{Deserialize, Serialize};

/// Kind of punch recorded by a presence row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PunchType {
    Arrivee,
    Depart,
    PauseEntree,
    PauseSortie,
}

impl PunchType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchType::Arrivee => "arrivee",
            PunchType::Depart => "depart",
            PunchType::PauseEntree => "pause_entree",
            PunchType::PauseSortie => "pause_sortie",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "arrivee" => Some(PunchType::Arrivee),
            "depart" => Some(PunchType::Depart),
            "pause_entree" => Some(PunchType::PauseEntree),
            "pause_sortie" => Some(PunchType::PauseSortie),
            _ => None,
        }
    }

    /// Helper: parse user input (CLI filters, query strings), case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        PunchType::from_db_str(&code.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_strings_match_serde_names() {
        for t in [
            PunchType::Arrivee,
            PunchType::Depart,
            PunchType::PauseEntree,
            PunchType::PauseSortie,
        ] {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.to_db_str()));
            assert_eq!(PunchType::from_db_str(t.to_db_str()), Some(t));
        }
    }

    #[test]
    fn from_code_ignores_case() {
        assert_eq!(PunchType::from_code(" Pause_Entree "), Some(PunchType::PauseEntree));
        assert_eq!(PunchType::from_code("lunch"), None);
    }
}
