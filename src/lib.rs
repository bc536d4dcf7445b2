//! License plate inventory and sales tracking
//!
//! Users, plate listings and completed sales are stored as JSON documents in
//! a data directory. The [`Marketplace`] owns all three collections and keeps
//! them in step with the documents on disk.

pub mod domain;
pub use domain::{
    Config, HistoryEntry, LicensePlate, Listing, Role, Sale, SaleId, Status, User, UserId,
};

/// Whole-document persistence of named collections.
pub mod storage;
pub use storage::{Collection, RecordStore, Table};

mod error;
pub use error::Error;

/// The user directory, inventory ledger and sales journal, and the
/// marketplace that ties them to the record store.
pub mod market;
pub use market::{Action, Marketplace, Outcome, Session};
