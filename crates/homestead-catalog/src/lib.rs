//! Material catalog for the Homestead production simulator.
//!
//! The catalog is the lookup table of [`MaterialSpec`] records backing
//! every production activity: one record per good, keyed by name, loaded
//! from a JSON file (or built in memory for tests). Lookups enforce
//! exactly-one-match semantics -- a name with zero matches or more than
//! one match is an error, never a guess.
//!
//! The catalog is read-only after construction. Activities resolve their
//! configuration through [`MaterialCatalog::material_data`] once, at
//! construction time, and cache the result.
//!
//! [`MaterialSpec`]: homestead_types::MaterialSpec

pub mod catalog;
pub mod error;

pub use catalog::MaterialCatalog;
pub use error::CatalogError;
