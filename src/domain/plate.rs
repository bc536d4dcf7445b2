use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Whether a plate can currently be bought.
///
/// Persisted as `1` (available) or `0` (not available).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    /// Not for sale, usually because it has been bought.
    Unavailable = 0,
    /// Listed and purchasable.
    Available = 1,
}

impl Status {
    /// Returns `true` for [`Status::Available`].
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status as Self
    }
}

/// A status code other than `0` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}' (expected 1 for available or 0 for not available)")]
pub struct InvalidStatus(pub String);

impl TryFrom<u8> for Status {
    type Error = InvalidStatus;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unavailable),
            1 => Ok(Self::Available),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

impl FromStr for Status {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "available" => Ok(Self::Available),
            "0" | "unavailable" => Ok(Self::Unavailable),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A plate listing as stored in the inventory document.
///
/// The plate number is the key of the record and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePlate {
    /// The asking price, kept exactly as entered.
    pub price: String,
    /// Whether the plate can be bought.
    pub status: Status,
}

impl LicensePlate {
    /// A new listing, available for purchase.
    #[must_use]
    pub const fn available(price: String) -> Self {
        Self {
            price,
            status: Status::Available,
        }
    }
}

/// A plate listing together with its plate number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// The plate number.
    pub plate_number: String,
    /// The asking price.
    pub price: String,
    /// Whether the plate can be bought.
    pub status: Status,
}

impl Listing {
    pub(crate) fn new(plate_number: &str, plate: &LicensePlate) -> Self {
        Self {
            plate_number: plate_number.to_string(),
            price: plate.price.clone(),
            status: plate.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_persisted_as_integer() {
        let plate = LicensePlate::available("500".to_string());

        let json = serde_json::to_value(&plate).unwrap();
        assert_eq!(json, serde_json::json!({"price": "500", "status": 1}));
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let error = serde_json::from_str::<LicensePlate>(r#"{"price": "1", "status": 2}"#)
            .unwrap_err();
        assert!(error.to_string().contains("invalid status '2'"));
    }

    #[test]
    fn status_parses_codes_and_names() {
        assert_eq!("1".parse::<Status>().unwrap(), Status::Available);
        assert_eq!(" 0 ".parse::<Status>().unwrap(), Status::Unavailable);
        assert_eq!("Available".parse::<Status>().unwrap(), Status::Available);
        assert_eq!("unavailable".parse::<Status>().unwrap(), Status::Unavailable);
        assert!("yes".parse::<Status>().is_err());
    }
}
