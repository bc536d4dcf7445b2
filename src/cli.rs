use std::{
    fmt,
    path::{Path, PathBuf},
};

mod inventory;
mod menu;
mod render;
mod report;
mod terminal;
mod trade;

use clap::ArgAction;
use inventory::{Add, Delete, Edit, List};
use plates::{Action, Marketplace, Session, market::CONFIG_FILE};
use report::{History, Sales};
use tracing::instrument;
use trade::{Buy, Sell};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The data directory holding the users, plates and sales documents
    #[arg(short, long, default_value = ".plates", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.unwrap_or(Command::Menu).run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Start an interactive session (default)
    Menu,

    /// Initialize a new data directory
    Init,

    /// Register a new account
    Signup(Signup),

    /// List license plates
    ///
    /// Admins see every plate with its status. Customers see the plates
    /// that are available for purchase.
    List(List),

    /// Add a license plate (admin)
    Add(Add),

    /// Change the status of a license plate (admin)
    Edit(Edit),

    /// Delete a license plate (admin)
    Delete(Delete),

    /// Show every sale by id (admin)
    Sales(Sales),

    /// Show every sale by buyer (admin)
    History(History),

    /// Purchase a license plate (customer)
    Buy(Buy),

    /// Put a license plate up for sale (customer)
    Sell(Sell),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut market = Marketplace::open(root)?;
        match self {
            Self::Menu => menu::run(&mut market)?,
            Self::Init => Init::run(market.root())?,
            Self::Signup(command) => command.run(&mut market)?,
            Self::List(command) => command.run(&mut market)?,
            Self::Add(command) => command.run(&mut market)?,
            Self::Edit(command) => command.run(&mut market)?,
            Self::Delete(command) => command.run(&mut market)?,
            Self::Sales(command) => command.run(&mut market)?,
            Self::History(command) => command.run(&mut market)?,
            Self::Buy(command) => command.run(&mut market)?,
            Self::Sell(command) => command.run(&mut market)?,
        }
        Ok(())
    }
}

/// Sign-in details for commands that act on behalf of a user.
#[derive(clap::Args)]
pub struct Credentials {
    /// The username to sign in as
    #[arg(long, short)]
    user: String,

    /// The password (prompted for if omitted)
    #[arg(long)]
    password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    fn sign_in(&self, market: &Marketplace) -> anyhow::Result<Session> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => dialoguer::Password::new()
                .with_prompt(format!("Password for {}", self.user))
                .interact()?,
        };
        Ok(market.sign_in(&self.user, &password)?)
    }

    /// Signs in, runs the action and prints the outcome.
    fn execute(&self, market: &mut Marketplace, action: Action) -> anyhow::Result<()> {
        let session = self.sign_in(market)?;
        let outcome = market.execute(&session, action)?;
        render::outcome(&outcome);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Data directory already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory: {e}"))?;
        plates::Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized license plate tracker in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  plates signup admin --address \"Head office\"");
        println!("  plates add --user admin ABC123 500");

        Ok(())
    }
}

#[derive(clap::Parser)]
pub struct Signup {
    /// The username to register
    username: String,

    /// The postal address of the account holder
    #[arg(long, short, default_value = "")]
    address: String,

    /// The password (prompted for if omitted)
    #[arg(long)]
    password: Option<String>,
}

impl fmt::Debug for Signup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signup")
            .field("username", &self.username)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Signup {
    #[instrument(skip(market))]
    fn run(self, market: &mut Marketplace) -> anyhow::Result<()> {
        let password = match self.password {
            Some(password) => password,
            None => dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?,
        };

        let id = market.sign_up(&self.username, &password, &self.address)?;
        render::confirm(&format!("Account created successfully (user id {id})."));
        Ok(())
    }
}

#[cfg(test)]
impl Credentials {
    /// Credentials for a test account whose password is `pw`.
    fn test(user: &str) -> Self {
        Self {
            user: user.to_string(),
            password: Some("pw".to_string()),
        }
    }
}

/// A marketplace in a scratch directory with the given accounts, all with
/// password `pw`.
#[cfg(test)]
fn test_market(usernames: &[&str]) -> (tempfile::TempDir, Marketplace) {
    let tmp = tempfile::tempdir().unwrap();
    let mut market = Marketplace::open(tmp.path().to_path_buf()).unwrap();
    for username in usernames {
        market.sign_up(username, "pw", "").unwrap();
    }
    (tmp, market)
}

#[cfg(test)]
mod tests {
    use plates::{Error, Role};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn init_writes_default_config() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("data");

        Init::run(&root).unwrap();

        let config = plates::Config::load(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config, plates::Config::default());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        Init::run(tmp.path()).unwrap();

        let error = Init::run(tmp.path()).unwrap_err();
        assert!(error.to_string().contains("already initialized"));
    }

    #[test]
    fn signup_registers_account() {
        let (_tmp, mut market) = test_market(&[]);

        Signup {
            username: "admin".to_string(),
            address: "HQ".to_string(),
            password: Some("secret".to_string()),
        }
        .run(&mut market)
        .unwrap();

        assert_eq!(market.authenticate("admin", "secret").unwrap().1, Role::Admin);
    }

    #[test]
    fn signup_rejects_taken_username() {
        let (_tmp, mut market) = test_market(&["alice"]);

        let error = Signup {
            username: "alice".to_string(),
            address: String::new(),
            password: Some("pw".to_string()),
        }
        .run(&mut market)
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::UsernameTaken(_))
        ));
        assert_eq!(market.users().len(), 1);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let (_tmp, market) = test_market(&["alice"]);
        let credentials = Credentials {
            user: "alice".to_string(),
            password: Some("nope".to_string()),
        };

        let error = credentials.sign_in(&market).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::test("alice"));

        assert!(debug.contains("alice"));
        assert!(!debug.contains("pw"));
    }
}
