//! Credential Store
//! Mission: Hold the seeded research accounts and check login credentials

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// In-memory username -> password-digest map.
///
/// Passwords are stored as a single unsalted SHA-256 hex digest. That is the
/// documented contract of this mock store (one seeded dev account); it is not
/// suitable for real user credentials.
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Store seeded with the single mock research account.
    pub fn seeded() -> Self {
        Self::default().with_user("researcher", "password123")
    }

    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users
            .insert(username.to_string(), password_digest(password));
        self
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames fail. Otherwise the supplied password is digested
    /// and compared byte-for-byte against the stored digest.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(stored) => *stored == password_digest(password),
            None => false,
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
        }
    }
}

fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
