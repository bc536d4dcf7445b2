use plates::{Action, Marketplace, Role, Status};
use tracing::instrument;

use crate::cli::{Credentials, render};

/// Parse a plate status, accepting `1`/`0` or `available`/`unavailable`.
fn parse_status(s: &str) -> Result<Status, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
pub struct List {
    #[command(flatten)]
    credentials: Credentials,
}

impl List {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        let session = self.credentials.sign_in(market)?;
        let action = match session.role {
            Role::Admin => Action::ListPlates,
            Role::Customer => Action::ListAvailablePlates,
        };
        render::outcome(&market.execute(&session, action)?);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    #[command(flatten)]
    credentials: Credentials,

    /// The new license plate number
    plate_number: String,

    /// The asking price
    price: String,
}

impl Add {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(
            market,
            Action::AddPlate {
                plate_number: self.plate_number,
                price: self.price,
            },
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    #[command(flatten)]
    credentials: Credentials,

    /// The license plate to edit
    plate_number: String,

    /// The new status (1 for available, 0 for not available)
    #[arg(value_parser = parse_status)]
    status: Status,
}

impl Edit {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(
            market,
            Action::EditPlate {
                plate_number: self.plate_number,
                status: self.status,
            },
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    #[command(flatten)]
    credentials: Credentials,

    /// The license plate to delete
    plate_number: String,
}

impl Delete {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(
            market,
            Action::DeletePlate {
                plate_number: self.plate_number,
            },
        )
    }
}
