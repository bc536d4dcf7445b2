//! Completed purchases.

use chrono::NaiveDateTime;

use crate::{
    Error,
    domain::{HistoryEntry, Sale, SaleId, Status, UNKNOWN_USER},
    market::{InventoryLedger, UserDirectory},
    storage::Table,
};

/// The record of every completed purchase, keyed by sale id.
#[derive(Debug, Clone, Default)]
pub struct SalesJournal {
    sales: Table<SaleId, Sale>,
}

impl SalesJournal {
    /// Wraps a loaded sales table.
    #[must_use]
    pub const fn new(sales: Table<SaleId, Sale>) -> Self {
        Self { sales }
    }

    /// The underlying table, as persisted.
    #[must_use]
    pub const fn table(&self) -> &Table<SaleId, Sale> {
        &self.sales
    }

    /// Looks up a sale.
    #[must_use]
    pub fn get(&self, id: SaleId) -> Option<&Sale> {
        self.sales.get(&id)
    }

    /// The number of recorded sales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    /// Returns `true` if nothing has been sold yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Sells an available plate to a registered user.
    ///
    /// Both checks happen before anything is changed, so a failed purchase
    /// leaves the inventory and the journal as they were. On success the
    /// plate is marked unavailable and a sale stamped with `purchased_on` is
    /// appended. Nothing is persisted here.
    ///
    /// # Errors
    ///
    /// - [`Error::PlateNotAvailable`] if the plate is not listed or has been
    ///   sold
    /// - [`Error::UserNotFound`] if `buyer` is not a registered username
    pub fn purchase(
        &mut self,
        inventory: &mut InventoryLedger,
        users: &UserDirectory,
        plate_number: &str,
        buyer: &str,
        purchased_on: NaiveDateTime,
    ) -> Result<SaleId, Error> {
        if !inventory.is_available(plate_number) {
            return Err(Error::PlateNotAvailable(plate_number.to_string()));
        }
        let user_id = users
            .resolve(buyer)
            .ok_or_else(|| Error::UserNotFound(buyer.to_string()))?;

        inventory.edit(plate_number, Status::Unavailable)?;

        let id = self.sales.next_id();
        self.sales.insert(
            id,
            Sale {
                plate_number: plate_number.to_string(),
                user_id,
                purchased_on,
            },
        );
        Ok(id)
    }

    /// Every sale, in purchase order.
    #[must_use]
    pub fn list_all(&self) -> impl Iterator<Item = (SaleId, &Sale)> {
        self.sales.iter().map(|(&id, sale)| (id, sale))
    }

    /// Every sale with its buyer's username, in purchase order.
    ///
    /// Buyers missing from the directory are reported as [`UNKNOWN_USER`].
    #[must_use]
    pub fn list_with_usernames(&self, users: &UserDirectory) -> Vec<HistoryEntry> {
        self.sales
            .iter()
            .map(|(_, sale)| HistoryEntry {
                username: users
                    .username_of(sale.user_id)
                    .unwrap_or(UNKNOWN_USER)
                    .to_string(),
                plate_number: sale.plate_number.clone(),
                purchased_on: sale.purchased_on,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{User, UserId};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn setup() -> (SalesJournal, InventoryLedger, UserDirectory) {
        let mut users = UserDirectory::new(Table::new(), "admin".to_string());
        users.sign_up("admin", "pw", "HQ").unwrap();
        users.sign_up("alice", "pw", "1 Main St").unwrap();

        let mut inventory = InventoryLedger::default();
        inventory.add("ABC123", "500").unwrap();
        inventory.add("XYZ789", "250").unwrap();

        (SalesJournal::default(), inventory, users)
    }

    #[test]
    fn purchase_marks_plate_sold_and_records_sale() {
        let (mut sales, mut inventory, users) = setup();

        let id = sales
            .purchase(&mut inventory, &users, "ABC123", "alice", at(9))
            .unwrap();

        assert_eq!(id, SaleId::new(1));
        assert!(!inventory.is_available("ABC123"));
        assert_eq!(
            sales.get(id),
            Some(&Sale {
                plate_number: "ABC123".to_string(),
                user_id: UserId::new(2),
                purchased_on: at(9),
            })
        );
    }

    #[test]
    fn plate_cannot_be_sold_twice() {
        let (mut sales, mut inventory, users) = setup();
        sales
            .purchase(&mut inventory, &users, "ABC123", "alice", at(9))
            .unwrap();

        let error = sales
            .purchase(&mut inventory, &users, "ABC123", "admin", at(10))
            .unwrap_err();

        assert!(matches!(error, Error::PlateNotAvailable(p) if p == "ABC123"));
        assert_eq!(sales.len(), 1);
    }

    #[test]
    fn missing_plate_is_a_no_op() {
        let (mut sales, mut inventory, users) = setup();
        let before = inventory.table().clone();

        let error = sales
            .purchase(&mut inventory, &users, "NOPE", "alice", at(9))
            .unwrap_err();

        assert!(matches!(error, Error::PlateNotAvailable(_)));
        assert_eq!(inventory.table(), &before);
        assert!(sales.is_empty());
    }

    #[test]
    fn unknown_buyer_is_a_no_op() {
        let (mut sales, mut inventory, users) = setup();

        let error = sales
            .purchase(&mut inventory, &users, "ABC123", "mallory", at(9))
            .unwrap_err();

        assert!(matches!(error, Error::UserNotFound(u) if u == "mallory"));
        assert!(inventory.is_available("ABC123"));
        assert!(sales.is_empty());
    }

    #[test]
    fn sale_ids_increase_by_one() {
        let (mut sales, mut inventory, users) = setup();

        let first = sales
            .purchase(&mut inventory, &users, "ABC123", "alice", at(9))
            .unwrap();
        let second = sales
            .purchase(&mut inventory, &users, "XYZ789", "alice", at(10))
            .unwrap();

        assert_eq!(second.get(), first.get() + 1);
    }

    #[test]
    fn history_substitutes_unknown_users() {
        let users = UserDirectory::new(
            {
                let mut table = Table::new();
                table.insert(
                    UserId::new(1),
                    User {
                        username: "alice".to_string(),
                        password: "pw".to_string(),
                        address: String::new(),
                    },
                );
                table
            },
            "admin".to_string(),
        );
        let mut table = Table::new();
        table.insert(
            SaleId::new(1),
            Sale {
                plate_number: "ABC123".to_string(),
                user_id: UserId::new(1),
                purchased_on: at(9),
            },
        );
        table.insert(
            SaleId::new(2),
            Sale {
                plate_number: "GONE".to_string(),
                user_id: UserId::new(42),
                purchased_on: at(10),
            },
        );
        let sales = SalesJournal::new(table);

        let names: Vec<_> = sales
            .list_with_usernames(&users)
            .into_iter()
            .map(|entry| entry.username)
            .collect();

        assert_eq!(names, ["alice", UNKNOWN_USER]);
    }
}
