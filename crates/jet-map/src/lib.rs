#![deny(unsafe_code)]

//! Field-mapping and conflict-resolution engine.
//!
//! Given a table with unknown column names and unknown ERP origin, assigns
//! each column to at most one canonical accounting field using synonym
//! lookups, content heuristics, confidence scoring, and a balance-driven
//! tie-break for contested entry identifiers.

pub mod balance;
pub mod content;
pub mod detect;
pub mod exact;
pub mod normalize;
pub mod rank;
pub mod resolve;

pub use balance::{AmountColumns, BalanceOracle};
pub use detect::{DetectionReport, DetectionStats, FieldDetector, detect_erp};
pub use exact::ExactMatcher;
pub use normalize::{NameCache, normalize_name, translate_name};
pub use rank::{MIN_CONFIDENCE, rank};
pub use resolve::{MappingTable, Resolver, ResolverStats, SpecificityTable};
