use super::role::Role;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nom: String,    // last name
    pub prenom: String, // first name
    pub role: Role,
    pub magasin_id: Option<i64>, // ⇔ users.magasin_id, the store the user works at
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}
