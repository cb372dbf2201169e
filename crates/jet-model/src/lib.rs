pub mod error;
pub mod field;
pub mod mapping;
pub mod synonym;
pub mod table;

pub use error::{JetError, Result};
pub use field::{DataKind, FieldCode};
pub use mapping::{
    Candidate, ColumnProfile, FieldMapping, MatchSource, ResolutionOutcome, ResolutionReason,
};
pub use synonym::{FieldCatalog, FieldDef, Synonym};
pub use table::{Column, Table};
