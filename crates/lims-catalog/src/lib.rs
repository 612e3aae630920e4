#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod snapshot;

pub use crate::catalog::{Catalog, InMemoryCatalog, QueryFilter};
pub use crate::error::{CatalogError, Result};
pub use crate::loader::{
    REFERENCE_DATA_ENV_VAR, ReferenceData, default_reference_path, load_reference_data,
};
pub use crate::lookup::ReferenceLookup;
pub use crate::snapshot::ReferenceSnapshot;
