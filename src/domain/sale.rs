use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// The label reported in purchase history when a sale's buyer is no longer
/// in the user directory.
pub const UNKNOWN_USER: &str = "Unknown User";

/// The identifier of a completed sale.
///
/// Identifiers start at 1 and are assigned in purchase order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SaleId(u32);

impl SaleId {
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

impl From<u32> for SaleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<SaleId> for u32 {
    fn from(id: SaleId) -> Self {
        id.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SaleId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A completed purchase.
///
/// The plate number is a snapshot taken at purchase time. Deleting the plate
/// from the inventory later does not touch its sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// The plate that was bought.
    pub plate_number: String,
    /// The buyer.
    pub user_id: UserId,
    /// Local time of the purchase.
    #[serde(with = "timestamp")]
    pub purchased_on: NaiveDateTime,
}

/// One line of the purchase history: a sale with its buyer's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The buyer's username, or [`UNKNOWN_USER`].
    pub username: String,
    /// The plate that was bought.
    pub plate_number: String,
    /// Local time of the purchase.
    pub purchased_on: NaiveDateTime,
}

/// Serde adapter for `YYYY-MM-DD HH:MM:SS` timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// The format purchase timestamps are stored and displayed in.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serializes a timestamp as `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the serializer.
    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// Parses a `YYYY-MM-DD HH:MM:SS` timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string in the expected format.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, 5)
            .unwrap()
    }

    #[test]
    fn sale_record_uses_plain_timestamp() {
        let sale = Sale {
            plate_number: "ABC123".to_string(),
            user_id: UserId::new(2),
            purchased_on: noon(),
        };

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "plate_number": "ABC123",
                "user_id": 2,
                "purchased_on": "2024-03-09 12:00:05"
            })
        );

        let parsed: Sale = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sale);
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let json = r#"{"plate_number": "X", "user_id": 1, "purchased_on": "yesterday"}"#;
        assert!(serde_json::from_str::<Sale>(json).is_err());
    }
}
