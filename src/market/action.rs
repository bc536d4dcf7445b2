//! Commands issued by a signed-in user.
//!
//! A front end parses whatever the user typed into an [`Action`] and hands it
//! to [`Marketplace::execute`](crate::Marketplace::execute) along with the
//! [`Session`]. The result comes back as an [`Outcome`] for the front end to
//! render.

use chrono::NaiveDateTime;

use crate::domain::{HistoryEntry, Listing, Role, Sale, SaleId, Status, UserId};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The user's id.
    pub user_id: UserId,
    /// The name the user signed in with.
    pub username: String,
    /// The role derived at sign-in.
    pub role: Role,
}

/// Something a signed-in user asks the marketplace to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List a new plate. Admin only.
    AddPlate {
        /// The plate number.
        plate_number: String,
        /// The asking price.
        price: String,
    },
    /// Change the status of a plate. Admin only.
    EditPlate {
        /// The plate number.
        plate_number: String,
        /// The new status.
        status: Status,
    },
    /// Remove a plate. Admin only.
    DeletePlate {
        /// The plate number.
        plate_number: String,
    },
    /// Show every plate. Admin only.
    ListPlates,
    /// Show every sale by id. Admin only.
    SalesReport,
    /// Show every sale by buyer. Admin only.
    PurchaseHistory,
    /// Show the plates that can be bought. Customer only.
    ListAvailablePlates,
    /// Buy a plate as the signed-in user. Customer only.
    Purchase {
        /// The plate number.
        plate_number: String,
    },
    /// Put a plate up for sale. Customer only.
    SellIntoMarket {
        /// The plate number.
        plate_number: String,
        /// The asking price.
        price: String,
    },
}

impl Action {
    /// The role the action is offered to.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::AddPlate { .. }
            | Self::EditPlate { .. }
            | Self::DeletePlate { .. }
            | Self::ListPlates
            | Self::SalesReport
            | Self::PurchaseHistory => Role::Admin,
            Self::ListAvailablePlates | Self::Purchase { .. } | Self::SellIntoMarket { .. } => {
                Role::Customer
            }
        }
    }

    /// A short description, used when the action is refused.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::AddPlate { .. } => "add license plates",
            Self::EditPlate { .. } => "edit license plates",
            Self::DeletePlate { .. } => "delete license plates",
            Self::ListPlates => "view all license plates",
            Self::SalesReport => "view sales statistics",
            Self::PurchaseHistory => "view purchase history",
            Self::ListAvailablePlates => "view available license plates",
            Self::Purchase { .. } => "purchase license plates",
            Self::SellIntoMarket { .. } => "sell license plates",
        }
    }
}

/// The result of a successful [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A plate was listed by an admin.
    PlateAdded(String),
    /// A plate's status was changed.
    PlateUpdated {
        /// The plate number.
        plate_number: String,
        /// The new status.
        status: Status,
    },
    /// A plate was removed.
    PlateDeleted(String),
    /// Every plate, with its status.
    Plates(Vec<Listing>),
    /// The plates that can be bought.
    AvailablePlates(Vec<Listing>),
    /// Every sale by id.
    Sales(Vec<(SaleId, Sale)>),
    /// Every sale by buyer.
    History(Vec<HistoryEntry>),
    /// A plate was bought.
    Purchased {
        /// The id of the new sale.
        sale_id: SaleId,
        /// The plate number.
        plate_number: String,
        /// When the purchase happened.
        purchased_on: NaiveDateTime,
    },
    /// A plate was listed by a customer.
    Listed(String),
}
