#![deny(unsafe_code)]

//! Standardized output files for downstream staging.

pub mod writer;

pub use writer::{write_detail_csv, write_header_csv, write_header_detail};
