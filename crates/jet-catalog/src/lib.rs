pub mod builtin;
pub mod store;

pub use builtin::builtin_catalog;
pub use store::{load_catalog, merge_catalogs, resolve_catalog, save_catalog};
