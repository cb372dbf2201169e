#![deny(unsafe_code)]

//! Balance validation: the accounting invariant that debits equal credits
//! within each journal entry, and in total.
//!
//! Also provides the mapping engine's balance oracle: scoring how well a
//! candidate identifier column groups a table into balanced entries.

pub mod validator;

pub use validator::{BalanceReport, BalanceValidator, EntryBalance};
