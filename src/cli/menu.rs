//! The interactive menu session.
//!
//! Presents the sign-in menu, then the admin or customer menu depending on
//! the role of the account. Every choice is turned into an [`Action`] and
//! executed against the marketplace; failures are reported and the menu is
//! shown again.

use dialoguer::{Input, Password, Select, console::Term};
use plates::{Action, Error, Marketplace, Role, Session, Status};

use crate::cli::{
    render,
    terminal::{self, Tone},
};

const MAIN_MENU: [&str; 3] = ["Sign In", "Sign Up", "Exit"];

const ADMIN_MENU: [&str; 5] = [
    "Manage license plate",
    "View all license plates",
    "View sales statistics",
    "View purchase history",
    "Exit",
];

const MANAGE_MENU: [&str; 4] = [
    "Add license plate",
    "Edit license plate",
    "Delete license plate",
    "Back",
];

const CUSTOMER_MENU: [&str; 4] = [
    "View available license plates",
    "Purchase license plate",
    "Sell license plate",
    "Exit",
];

/// Runs the session until the user exits from the main menu.
pub fn run(market: &mut Marketplace) -> anyhow::Result<()> {
    let term = Term::stdout();
    loop {
        clear(&term);
        match choose("Welcome to the License Plate Management System", &MAIN_MENU)? {
            0 => {
                if let Some(session) = sign_in(market, &term)? {
                    match session.role {
                        Role::Admin => admin_menu(market, &session, &term)?,
                        Role::Customer => customer_menu(market, &session, &term)?,
                    }
                }
            }
            1 => sign_up(market, &term)?,
            _ => {
                println!("Exiting the program.");
                return Ok(());
            }
        }
    }
}

fn sign_in(market: &Marketplace, term: &Term) -> anyhow::Result<Option<Session>> {
    clear(term);
    println!("{}", terminal::paint("Sign In", Tone::Heading));
    let username = prompt("Enter username")?;
    let password = Password::new()
        .with_prompt("Enter password")
        .allow_empty_password(true)
        .interact()?;

    match market.sign_in(&username, &password) {
        Ok(session) => {
            render::confirm("Login successful.");
            Ok(Some(session))
        }
        Err(e) => {
            warn(&e);
            pause(term)?;
            Ok(None)
        }
    }
}

fn sign_up(market: &mut Marketplace, term: &Term) -> anyhow::Result<()> {
    clear(term);
    println!("{}", terminal::paint("Sign Up", Tone::Heading));
    let username = prompt("Enter username")?;
    if market.users().resolve(&username).is_some() {
        warn(&Error::UsernameTaken(username));
        return pause(term);
    }
    let password = Password::new()
        .with_prompt("Enter password")
        .allow_empty_password(true)
        .interact()?;
    let address: String = Input::new()
        .with_prompt("Enter address")
        .allow_empty(true)
        .interact_text()?;

    match market.sign_up(&username, &password, &address) {
        Ok(_) => render::confirm("Account created successfully."),
        Err(e) => warn(&e),
    }
    pause(term)
}

fn admin_menu(market: &mut Marketplace, session: &Session, term: &Term) -> anyhow::Result<()> {
    loop {
        clear(term);
        let action = match choose("Admin Menu", &ADMIN_MENU)? {
            0 => match manage_menu(term)? {
                Some(action) => action,
                None => continue,
            },
            1 => Action::ListPlates,
            2 => Action::SalesReport,
            3 => Action::PurchaseHistory,
            _ => {
                println!("Exiting Admin Menu.");
                return Ok(());
            }
        };
        match market.execute(session, action) {
            Ok(outcome) => render::outcome(&outcome),
            Err(e) => warn(&e),
        }
        pause(term)?;
    }
}

fn manage_menu(term: &Term) -> anyhow::Result<Option<Action>> {
    clear(term);
    let action = match choose("Manage License Plates", &MANAGE_MENU)? {
        0 => Action::AddPlate {
            plate_number: prompt("Enter new license plate number")?,
            price: prompt("Enter price")?,
        },
        1 => {
            let plate_number = prompt("Enter license plate to edit")?;
            let status = match choose("New status", &["Available", "Not Available"])? {
                0 => Status::Available,
                _ => Status::Unavailable,
            };
            Action::EditPlate {
                plate_number,
                status,
            }
        }
        2 => Action::DeletePlate {
            plate_number: prompt("Enter license plate to delete")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(action))
}

fn customer_menu(market: &mut Marketplace, session: &Session, term: &Term) -> anyhow::Result<()> {
    loop {
        clear(term);
        let action = match choose("Customer Menu", &CUSTOMER_MENU)? {
            0 => Action::ListAvailablePlates,
            1 => Action::Purchase {
                plate_number: prompt("Enter license plate to purchase")?.trim().to_string(),
            },
            2 => {
                let plate_number = prompt("Enter license plate to sell")?;
                if market.inventory().get(&plate_number).is_some() {
                    warn(&Error::AlreadyListed(plate_number));
                    pause(term)?;
                    continue;
                }
                Action::SellIntoMarket {
                    plate_number,
                    price: prompt("Enter price")?,
                }
            }
            _ => {
                println!("Exiting Customer Menu.");
                return Ok(());
            }
        };
        match market.execute(session, action) {
            Ok(outcome) => render::outcome(&outcome),
            Err(e) => warn(&e),
        }
        pause(term)?;
    }
}

fn warn(error: &Error) {
    tracing::debug!(?error, "Action failed");
    eprintln!("{}", terminal::paint_err(&format!("⚠️  {error}"), Tone::Warning));
}

fn choose(prompt: &str, items: &[&str]) -> anyhow::Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?)
}

fn prompt(prompt: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

fn pause(term: &Term) -> anyhow::Result<()> {
    term.write_line(&terminal::paint("Press 'Enter' to go back...", Tone::Muted))?;
    term.read_line()?;
    Ok(())
}

fn clear(term: &Term) {
    if let Err(e) = term.clear_screen() {
        tracing::debug!("Failed to clear screen: {e}");
    }
}
