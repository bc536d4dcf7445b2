use plates::{Action, Marketplace};
use tracing::instrument;

use crate::cli::Credentials;

#[derive(Debug, clap::Parser)]
pub struct Buy {
    #[command(flatten)]
    credentials: Credentials,

    /// The license plate to purchase
    plate_number: String,
}

impl Buy {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(
            market,
            Action::Purchase {
                plate_number: self.plate_number.trim().to_string(),
            },
        )
    }
}

#[derive(Debug, clap::Parser)]
pub struct Sell {
    #[command(flatten)]
    credentials: Credentials,

    /// The license plate to sell
    plate_number: String,

    /// The asking price
    price: String,
}

impl Sell {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(
            market,
            Action::SellIntoMarket {
                plate_number: self.plate_number,
                price: self.price,
            },
        )
    }
}
