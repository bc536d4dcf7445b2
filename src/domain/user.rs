use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// The identifier of a registered user.
///
/// Identifiers start at 1 and are assigned in registration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<UserId> for u32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A registered account.
///
/// The password is stored and compared as plain text. Changing that would
/// change the format of the users document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The unique name the user signs in with.
    pub username: String,
    /// The user's password.
    pub password: String,
    /// The user's postal address.
    pub address: String,
}

/// What a signed-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Manages the inventory and reviews sales.
    Admin,
    /// Browses, buys and sells plates.
    Customer,
}

impl Role {
    /// Derives the role of a user from their username.
    #[must_use]
    pub fn for_username(username: &str, admin_username: &str) -> Self {
        if username == admin_username {
            Self::Admin
        } else {
            Self::Customer
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("Admin"),
            Self::Customer => f.write_str("Customer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_admin_only_for_exact_username() {
        assert_eq!(Role::for_username("admin", "admin"), Role::Admin);
        assert_eq!(Role::for_username("Admin", "admin"), Role::Customer);
        assert_eq!(Role::for_username("alice", "admin"), Role::Customer);
    }

    #[test]
    fn user_record_has_flat_shape() {
        let user = User {
            username: "alice".to_string(),
            password: "pw".to_string(),
            address: "1 Main St".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"username": "alice", "password": "pw", "address": "1 Main St"})
        );
    }
}
