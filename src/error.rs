use std::io;

use crate::{domain::Role, storage::Collection};

/// Everything that can go wrong while operating the marketplace.
///
/// All variants are recoverable from the point of view of an interactive
/// session: the caller reports the condition and asks for new input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A sign-up used a username that is already registered.
    #[error("username '{0}' already exists")]
    UsernameTaken(String),

    /// No user matches the supplied username and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An admin tried to add a plate that is already in the inventory.
    #[error("license plate {0} already exists")]
    AlreadyExists(String),

    /// The plate to edit or delete is not in the inventory.
    #[error("license plate {0} not found")]
    NotFound(String),

    /// A customer tried to sell a plate that is already on the platform.
    #[error("license plate {0} already exists in the platform")]
    AlreadyListed(String),

    /// The plate is missing or has already been sold.
    #[error("license plate {0} is not available for purchase")]
    PlateNotAvailable(String),

    /// The buyer could not be resolved to a registered user.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// The signed-in role is not offered this action.
    #[error("{role} accounts cannot {action}")]
    Forbidden {
        /// The role of the session that attempted the action.
        role: Role,
        /// A short description of the attempted action.
        action: &'static str,
    },

    /// A persisted document exists but cannot be parsed.
    #[error("the {collection} document is corrupt")]
    StorageCorrupt {
        /// The collection whose document failed to parse.
        collection: Collection,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A persisted document could not be read or written.
    #[error("failed to access the {collection} document")]
    Storage {
        /// The collection being read or written.
        collection: Collection,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file exists but is not valid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
