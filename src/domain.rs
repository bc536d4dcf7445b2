//! Domain models for the license plate tracker.
//!
//! This module contains the records persisted in each collection, the
//! identifiers that key them, and the tracker configuration.

mod config;
pub use config::Config;

/// Accounts, identifiers and roles.
pub mod user;
pub use user::{Role, User, UserId};

/// License plate listings and their availability.
pub mod plate;
pub use plate::{LicensePlate, Listing, Status};

/// Completed sales.
pub mod sale;
pub use sale::{HistoryEntry, Sale, SaleId, UNKNOWN_USER};
