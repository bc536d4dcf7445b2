//! Printing of marketplace outcomes.

use plates::{HistoryEntry, Listing, Outcome, Sale, SaleId, domain::sale::timestamp};

use crate::cli::terminal::{self, Tone};

const COLUMN: usize = 20;
const HISTORY_WIDTH: usize = COLUMN * 3;

/// Prints the result of an action.
pub fn outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Plates(listings) => print!("{}", plates(listings, true)),
        Outcome::AvailablePlates(listings) => print!("{}", plates(listings, false)),
        Outcome::Sales(sales) => print!("{}", sales_report(sales)),
        Outcome::History(entries) => {
            print!("{}", history(entries, terminal::narrower_than(HISTORY_WIDTH)));
        }
        Outcome::PlateAdded(plate) => confirm(&format!("License plate {plate} added.")),
        Outcome::PlateUpdated { plate_number, .. } => {
            confirm(&format!("License plate {plate_number} status updated."));
        }
        Outcome::PlateDeleted(plate) => confirm(&format!("License plate {plate} deleted.")),
        Outcome::Purchased {
            plate_number,
            purchased_on,
            ..
        } => confirm(&format!(
            "License plate {plate_number} purchased successfully on {}.",
            purchased_on.format(timestamp::FORMAT)
        )),
        Outcome::Listed(plate) => confirm(&format!("License plate {plate} listed for sale.")),
    }
}

/// Prints a success message.
pub fn confirm(message: &str) {
    println!("{}", terminal::paint(message, Tone::Success));
}

/// Formats plate listings, one per line.
pub fn plates(listings: &[Listing], with_status: bool) -> String {
    if listings.is_empty() {
        return empty("No license plates listed.");
    }

    lines(listings.iter().map(|listing| {
        let line = format!("{}: Price: {}", listing.plate_number, listing.price);
        if with_status {
            format!("{line}, Status: {}", terminal::status(listing.status))
        } else {
            line
        }
    }))
}

/// Formats the sales report, one sale per line.
pub fn sales_report(sales: &[(SaleId, Sale)]) -> String {
    if sales.is_empty() {
        return empty("No sales recorded.");
    }

    lines(sales.iter().map(|(id, sale)| {
        format!("ID: {id}, Plate: {}, User ID: {}", sale.plate_number, sale.user_id)
    }))
}

/// Formats the purchase history as a table, or as a list on narrow terminals.
pub fn history(entries: &[HistoryEntry], narrow: bool) -> String {
    if entries.is_empty() {
        return empty("No purchase history available.");
    }

    if narrow {
        return lines(entries.iter().map(|entry| {
            format!(
                "{}\n  {} on {}",
                entry.username,
                entry.plate_number,
                entry.purchased_on.format(timestamp::FORMAT)
            )
        }));
    }

    let header = format!(
        "{:<COLUMN$}{:<COLUMN$}{:<COLUMN$}",
        "Username", "License Plate", "Purchased On"
    );
    let rows = entries.iter().map(|entry| {
        format!(
            "{:<COLUMN$}{:<COLUMN$}{:<COLUMN$}",
            entry.username,
            entry.plate_number,
            entry.purchased_on.format(timestamp::FORMAT).to_string()
        )
    });

    lines(
        [terminal::paint(&header, Tone::Heading), "-".repeat(HISTORY_WIDTH)]
            .into_iter()
            .chain(rows),
    )
}

fn empty(notice: &str) -> String {
    format!("{}\n", terminal::paint(notice, Tone::Muted))
}

/// Joins lines of output, each terminated by a newline.
fn lines(rows: impl Iterator<Item = String>) -> String {
    let mut text = rows.collect::<Vec<_>>().join("\n");
    text.push('\n');
    text
}
