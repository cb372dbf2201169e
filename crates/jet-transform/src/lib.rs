#![deny(unsafe_code)]

//! Cleaning and derivation for mapped journal tables.

pub mod datetime;
pub mod numeric;
pub mod process;

pub use datetime::{SplitDateTime, normalize_date, split_datetime};
pub use numeric::{clean_amount, is_numeric, parse_amount};
pub use process::{CleanStats, clean_mapped_table};
