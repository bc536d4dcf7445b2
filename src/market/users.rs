//! Registered accounts and sign-in.

use crate::{
    Error,
    domain::{Role, User, UserId},
    storage::Table,
};

/// The registered accounts.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Table<UserId, User>,
    admin_username: String,
}

impl UserDirectory {
    /// Wraps a loaded users table.
    #[must_use]
    pub const fn new(users: Table<UserId, User>, admin_username: String) -> Self {
        Self {
            users,
            admin_username,
        }
    }

    /// The underlying table, as persisted.
    #[must_use]
    pub const fn table(&self) -> &Table<UserId, User> {
        &self.users
    }

    /// The number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if nobody has signed up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Registers a new account and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UsernameTaken`] if the username is already registered.
    /// Usernames are compared exactly, including case.
    pub fn sign_up(
        &mut self,
        username: &str,
        password: &str,
        address: &str,
    ) -> Result<UserId, Error> {
        if self.resolve(username).is_some() {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let id = self.users.next_id();
        self.users.insert(
            id,
            User {
                username: username.to_string(),
                password: password.to_string(),
                address: address.to_string(),
            },
        );
        Ok(id)
    }

    /// Checks a username and password, returning the account and its role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if no account matches both.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(UserId, Role), Error> {
        self.users
            .iter()
            .find(|(_, user)| user.username == username && user.password == password)
            .map(|(&id, user)| (id, Role::for_username(&user.username, &self.admin_username)))
            .ok_or(Error::InvalidCredentials)
    }

    /// Finds the id of the first account with the given username.
    #[must_use]
    pub fn resolve(&self, username: &str) -> Option<UserId> {
        self.users
            .iter()
            .find(|(_, user)| user.username == username)
            .map(|(&id, _)| id)
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Looks up the username of an account.
    #[must_use]
    pub fn username_of(&self, id: UserId) -> Option<&str> {
        self.get(id).map(|user| user.username.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(Table::new(), "admin".to_string())
    }

    #[test]
    fn ids_increase_by_one() {
        let mut users = directory();

        let first = users.sign_up("admin", "pw", "HQ").unwrap();
        let second = users.sign_up("alice", "pw", "1 Main St").unwrap();

        assert_eq!(first, UserId::new(1));
        assert_eq!(second, UserId::new(2));
    }

    #[test]
    fn duplicate_username_leaves_directory_unchanged() {
        let mut users = directory();
        users.sign_up("alice", "pw", "1 Main St").unwrap();
        let before = users.table().clone();

        let error = users.sign_up("alice", "other", "elsewhere").unwrap_err();

        assert!(matches!(error, Error::UsernameTaken(name) if name == "alice"));
        assert_eq!(users.table(), &before);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut users = directory();
        users.sign_up("alice", "pw", "").unwrap();

        assert!(users.sign_up("Alice", "pw", "").is_ok());
    }

    #[test]
    fn authenticate_derives_role() {
        let mut users = directory();
        let admin = users.sign_up("admin", "secret", "HQ").unwrap();
        let alice = users.sign_up("alice", "pw", "1 Main St").unwrap();

        assert_eq!(users.authenticate("admin", "secret").unwrap(), (admin, Role::Admin));
        assert_eq!(users.authenticate("alice", "pw").unwrap(), (alice, Role::Customer));
    }

    #[test]
    fn authenticate_rejects_wrong_password() {
        let mut users = directory();
        users.sign_up("alice", "pw", "").unwrap();

        assert!(matches!(
            users.authenticate("alice", "nope"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            users.authenticate("bob", "pw"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn configured_admin_username_is_honoured() {
        let mut users = UserDirectory::new(Table::new(), "root".to_string());
        users.sign_up("admin", "pw", "").unwrap();
        users.sign_up("root", "pw", "").unwrap();

        assert_eq!(users.authenticate("admin", "pw").unwrap().1, Role::Customer);
        assert_eq!(users.authenticate("root", "pw").unwrap().1, Role::Admin);
    }
}
