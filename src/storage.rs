pub mod catalog;
mod record;

pub use catalog::{Catalog, CatalogError, CaseSensitivity, LoadError, SaveError};
pub use record::RecordError;
