mod record_store;
mod table;

pub use record_store::{Collection, RecordStore};
pub use table::Table;
