//! The marketplace: every collection, kept in step with the record store.
//!
//! [`Marketplace`] loads the users, plates and sales documents once when it is
//! opened and rewrites the affected documents after every change. If a write
//! fails, the in-memory state is rolled back to match what is on disk.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, SubsecRound};

mod action;
mod inventory;
mod sales;
mod users;

pub use action::{Action, Outcome, Session};
pub use inventory::InventoryLedger;
pub use sales::SalesJournal;
pub use users::UserDirectory;

use crate::{
    Error,
    domain::{Config, HistoryEntry, Listing, Role, Sale, SaleId, Status, UserId},
    storage::{Collection, RecordStore},
};

/// The name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// The users, inventory and sales of one data directory.
#[derive(Debug)]
pub struct Marketplace {
    store: RecordStore,
    config: Config,
    users: UserDirectory,
    inventory: InventoryLedger,
    sales: SalesJournal,
}

impl Marketplace {
    /// Opens the marketplace stored in `root`, reading `config.toml` if present.
    ///
    /// A directory without documents is an empty marketplace.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if the configuration file cannot be parsed
    /// - [`Error::StorageCorrupt`] if a document cannot be parsed
    /// - [`Error::Storage`] if a document cannot be read
    pub fn open(root: PathBuf) -> Result<Self, Error> {
        let config = load_config(&root)?;
        Self::open_with_config(root, config)
    }

    /// Opens the marketplace stored in `root` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::StorageCorrupt`] if a document cannot be parsed
    /// - [`Error::Storage`] if a document cannot be read
    pub fn open_with_config(root: PathBuf, config: Config) -> Result<Self, Error> {
        let store = RecordStore::new(root).with_pretty(config.pretty);

        let users = UserDirectory::new(
            store.load(Collection::Users)?,
            config.admin_username().to_string(),
        );
        let inventory = InventoryLedger::new(store.load(Collection::LicensePlates)?);
        let sales = SalesJournal::new(store.load(Collection::Sales)?);

        tracing::debug!(
            users = users.len(),
            plates = inventory.table().len(),
            sales = sales.len(),
            "Opened marketplace at {}",
            store.root().display()
        );

        Ok(Self {
            store,
            config,
            users,
            inventory,
            sales,
        })
    }

    /// The directory the documents live in.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The registered accounts.
    #[must_use]
    pub const fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// The plate listings.
    #[must_use]
    pub const fn inventory(&self) -> &InventoryLedger {
        &self.inventory
    }

    /// The completed sales.
    #[must_use]
    pub const fn sales(&self) -> &SalesJournal {
        &self.sales
    }

    /// Registers a new account and persists the users document.
    ///
    /// # Errors
    ///
    /// - [`Error::UsernameTaken`] if the username is registered already
    /// - [`Error::Storage`] if the users document cannot be written
    pub fn sign_up(
        &mut self,
        username: &str,
        password: &str,
        address: &str,
    ) -> Result<UserId, Error> {
        let before = self.users.clone();
        let id = self.users.sign_up(username, password, address)?;
        if let Err(e) = self.store.save(Collection::Users, self.users.table()) {
            self.users = before;
            return Err(e);
        }

        tracing::info!(%id, username, "Account created");
        Ok(id)
    }

    /// Checks a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if no account matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(UserId, Role), Error> {
        self.users.authenticate(username, password)
    }

    /// Checks a username and password and opens a [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if no account matches.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<Session, Error> {
        let (user_id, role) = self.authenticate(username, password)?;
        tracing::info!(%user_id, %role, "Signed in");
        Ok(Session {
            user_id,
            username: username.to_string(),
            role,
        })
    }

    /// Lists a new plate as available.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`] if the plate number is taken
    /// - [`Error::Storage`] if the plates document cannot be written
    pub fn add_plate(&mut self, plate_number: &str, price: &str) -> Result<(), Error> {
        let before = self.inventory.clone();
        self.inventory.add(plate_number, price)?;
        self.save_inventory(before)?;
        tracing::info!(plate_number, price, "License plate added");
        Ok(())
    }

    /// Sets the status of a plate.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the plate is not listed
    /// - [`Error::Storage`] if the plates document cannot be written
    pub fn edit_plate(&mut self, plate_number: &str, status: Status) -> Result<(), Error> {
        let before = self.inventory.clone();
        self.inventory.edit(plate_number, status)?;
        self.save_inventory(before)?;
        tracing::info!(plate_number, %status, "License plate status updated");
        Ok(())
    }

    /// Removes a plate.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the plate is not listed
    /// - [`Error::Storage`] if the plates document cannot be written
    pub fn delete_plate(&mut self, plate_number: &str) -> Result<(), Error> {
        let before = self.inventory.clone();
        self.inventory.delete(plate_number)?;
        self.save_inventory(before)?;
        tracing::info!(plate_number, "License plate deleted");
        Ok(())
    }

    /// Lists a plate a customer wants to sell.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyListed`] if the plate is already on the platform
    /// - [`Error::Storage`] if the plates document cannot be written
    pub fn sell_into_market(&mut self, plate_number: &str, price: &str) -> Result<(), Error> {
        let before = self.inventory.clone();
        self.inventory.sell_into_market(plate_number, price)?;
        self.save_inventory(before)?;
        tracing::info!(plate_number, price, "License plate listed for sale");
        Ok(())
    }

    /// Every plate, in the order listed.
    #[must_use]
    pub fn list_plates(&self) -> Vec<Listing> {
        self.inventory.list_all()
    }

    /// The plates that can be bought, in the order listed.
    #[must_use]
    pub fn list_available_plates(&self) -> Vec<Listing> {
        self.inventory.list_available()
    }

    /// Buys a plate for `buyer`, stamped with the current local time.
    ///
    /// See [`purchase_at`](Self::purchase_at).
    ///
    /// # Errors
    ///
    /// As [`purchase_at`](Self::purchase_at).
    pub fn purchase(&mut self, plate_number: &str, buyer: &str) -> Result<SaleId, Error> {
        self.purchase_at(plate_number, buyer, now())
    }

    /// Buys a plate for `buyer` and persists both the plates and the sales
    /// documents, in that order.
    ///
    /// The two writes are not one transaction. If the plates write fails,
    /// nothing has changed on disk and the in-memory state is rolled back.
    /// If the plates write succeeds but the sales write fails, the plate stays
    /// sold with no sale on record, both on disk and in memory.
    ///
    /// # Errors
    ///
    /// - [`Error::PlateNotAvailable`] if the plate is not listed or was sold
    /// - [`Error::UserNotFound`] if `buyer` is not a registered username
    /// - [`Error::Storage`] if either document cannot be written
    pub fn purchase_at(
        &mut self,
        plate_number: &str,
        buyer: &str,
        purchased_on: NaiveDateTime,
    ) -> Result<SaleId, Error> {
        let inventory_before = self.inventory.clone();
        let sales_before = self.sales.clone();

        let id = self.sales.purchase(
            &mut self.inventory,
            &self.users,
            plate_number,
            buyer,
            purchased_on,
        )?;

        if let Err(e) = self.store.save(Collection::LicensePlates, self.inventory.table()) {
            self.inventory = inventory_before;
            self.sales = sales_before;
            return Err(e);
        }
        if let Err(e) = self.store.save(Collection::Sales, self.sales.table()) {
            tracing::warn!(plate_number, "License plate marked sold but the sale was not recorded");
            self.sales = sales_before;
            return Err(e);
        }

        tracing::info!(%id, plate_number, buyer, "License plate purchased");
        Ok(id)
    }

    /// Every sale by id, in purchase order.
    #[must_use]
    pub fn sales_report(&self) -> Vec<(SaleId, Sale)> {
        self.sales
            .list_all()
            .map(|(id, sale)| (id, sale.clone()))
            .collect()
    }

    /// Every sale with its buyer's username, in purchase order.
    #[must_use]
    pub fn purchase_history(&self) -> Vec<HistoryEntry> {
        self.sales.list_with_usernames(&self.users)
    }

    /// Runs an action on behalf of a signed-in user.
    ///
    /// Admins manage the inventory and review sales; customers browse, buy and
    /// sell. Purchases are made for the session's user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] if the action is not offered to the
    /// session's role, or any error of the operation it maps to.
    pub fn execute(&mut self, session: &Session, action: Action) -> Result<Outcome, Error> {
        if action.role() != session.role {
            return Err(Error::Forbidden {
                role: session.role,
                action: action.describe(),
            });
        }

        let outcome = match action {
            Action::AddPlate {
                plate_number,
                price,
            } => {
                self.add_plate(&plate_number, &price)?;
                Outcome::PlateAdded(plate_number)
            }
            Action::EditPlate {
                plate_number,
                status,
            } => {
                self.edit_plate(&plate_number, status)?;
                Outcome::PlateUpdated {
                    plate_number,
                    status,
                }
            }
            Action::DeletePlate { plate_number } => {
                self.delete_plate(&plate_number)?;
                Outcome::PlateDeleted(plate_number)
            }
            Action::ListPlates => Outcome::Plates(self.list_plates()),
            Action::SalesReport => Outcome::Sales(self.sales_report()),
            Action::PurchaseHistory => Outcome::History(self.purchase_history()),
            Action::ListAvailablePlates => Outcome::AvailablePlates(self.list_available_plates()),
            Action::Purchase { plate_number } => {
                let purchased_on = now();
                let sale_id = self.purchase_at(&plate_number, &session.username, purchased_on)?;
                Outcome::Purchased {
                    sale_id,
                    plate_number,
                    purchased_on,
                }
            }
            Action::SellIntoMarket {
                plate_number,
                price,
            } => {
                self.sell_into_market(&plate_number, &price)?;
                Outcome::Listed(plate_number)
            }
        };
        Ok(outcome)
    }

    fn save_inventory(&mut self, before: InventoryLedger) -> Result<(), Error> {
        if let Err(e) = self.store.save(Collection::LicensePlates, self.inventory.table()) {
            self.inventory = before;
            return Err(e);
        }
        Ok(())
    }
}

/// The current local time, to the second.
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

fn load_config(root: &Path) -> Result<Config, Error> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::load(&path).map_err(Error::InvalidConfig)
}
