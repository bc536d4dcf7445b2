use plates::{Action, Marketplace};
use tracing::instrument;

use crate::cli::Credentials;

#[derive(Debug, clap::Parser)]
pub struct Sales {
    #[command(flatten)]
    credentials: Credentials,
}

impl Sales {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(market, Action::SalesReport)
    }
}

#[derive(Debug, clap::Parser)]
pub struct History {
    #[command(flatten)]
    credentials: Credentials,
}

impl History {
    #[instrument(skip(market))]
    pub fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        self.credentials.execute(market, Action::PurchaseHistory)
    }
}
