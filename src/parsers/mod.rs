pub mod anode_csv;
pub mod types;

pub use anode_csv::AnodeCsv;
pub use types::{Parseable, RawTable, Value};
