use serde::{Deserialize, Serialize};

/// Account role of a recipient.
///
/// On the wire it is `STUDENT`/`PROFESSIONAL`/`ADMIN`. The `users.role` column
/// is owned by the auth service and holds the Spanish names returned by
/// [`Role::as_str`]. The English names are accepted when reading as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Professional,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "estudiante",
            Role::Professional => "profesional",
            Role::Admin => "administrador",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "estudiante" | "student" => Ok(Role::Student),
            "profesional" | "professional" => Ok(Role::Professional),
            "administrador" | "admin" => Ok(Role::Admin),
            other => Err(format!("{other} is not a known role")),
        }
    }
}
