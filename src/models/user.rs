use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Store-assigned id
    #[serde(rename = "_id")]
    pub id: String,
    /// Lookup key, unique per store
    pub email: String,
    /// bcrypt hash of the password, never the password itself
    pub password: String,
}

impl UserAccount {
    pub fn new(id: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password: password_hash,
        }
    }
}
