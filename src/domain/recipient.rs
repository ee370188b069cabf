use serde::{Deserialize, Serialize};

use super::Role;

/// One user as read from the recipient store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}
