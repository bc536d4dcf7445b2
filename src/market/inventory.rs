//! Plate listings.

use crate::{
    Error,
    domain::{LicensePlate, Listing, Status},
    storage::Table,
};

/// The plates known to the platform, keyed by plate number.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    plates: Table<String, LicensePlate>,
}

impl InventoryLedger {
    /// Wraps a loaded plates table.
    #[must_use]
    pub const fn new(plates: Table<String, LicensePlate>) -> Self {
        Self { plates }
    }

    /// The underlying table, as persisted.
    #[must_use]
    pub const fn table(&self) -> &Table<String, LicensePlate> {
        &self.plates
    }

    /// Looks up a plate.
    #[must_use]
    pub fn get(&self, plate_number: &str) -> Option<&LicensePlate> {
        self.plates.get(plate_number)
    }

    /// Lists a new plate as available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if the plate number is taken.
    pub fn add(&mut self, plate_number: &str, price: &str) -> Result<(), Error> {
        if self.plates.contains_key(plate_number) {
            return Err(Error::AlreadyExists(plate_number.to_string()));
        }
        self.insert_available(plate_number, price);
        Ok(())
    }

    /// Lists a plate a customer wants to sell.
    ///
    /// This behaves like [`add`](Self::add). A plate already on the platform
    /// is rejected whatever its status, including plates that were sold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyListed`] if the plate number is taken.
    pub fn sell_into_market(&mut self, plate_number: &str, price: &str) -> Result<(), Error> {
        if self.plates.contains_key(plate_number) {
            return Err(Error::AlreadyListed(plate_number.to_string()));
        }
        self.insert_available(plate_number, price);
        Ok(())
    }

    /// Overwrites the status of a plate, leaving its price untouched.
    ///
    /// Returns the previous status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the plate is not listed.
    pub fn edit(&mut self, plate_number: &str, status: Status) -> Result<Status, Error> {
        let plate = self
            .plates
            .get_mut(plate_number)
            .ok_or_else(|| Error::NotFound(plate_number.to_string()))?;
        Ok(std::mem::replace(&mut plate.status, status))
    }

    /// Removes a plate from the platform.
    ///
    /// Sales of the plate keep their copy of the plate number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the plate is not listed.
    pub fn delete(&mut self, plate_number: &str) -> Result<LicensePlate, Error> {
        self.plates
            .remove(plate_number)
            .ok_or_else(|| Error::NotFound(plate_number.to_string()))
    }

    /// All plates, in the order they were listed.
    #[must_use]
    pub fn list_all(&self) -> Vec<Listing> {
        self.plates
            .iter()
            .map(|(number, plate)| Listing::new(number, plate))
            .collect()
    }

    /// The plates that can currently be bought, in the order they were listed.
    #[must_use]
    pub fn list_available(&self) -> Vec<Listing> {
        self.plates
            .iter()
            .filter(|(_, plate)| plate.status.is_available())
            .map(|(number, plate)| Listing::new(number, plate))
            .collect()
    }

    /// Returns `true` if the plate is listed and available.
    #[must_use]
    pub fn is_available(&self, plate_number: &str) -> bool {
        self.get(plate_number)
            .is_some_and(|plate| plate.status.is_available())
    }

    fn insert_available(&mut self, plate_number: &str, price: &str) {
        self.plates.insert(
            plate_number.to_string(),
            LicensePlate::available(price.to_string()),
        );
    }
}
