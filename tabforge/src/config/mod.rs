//! Command-tree description files
//!
//! Loading and validation of the YAML files that describe a command tree.
//! The serde schema itself lives in `tabforge_core::config`.

pub mod loader;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use validation::{ValidationResult, Validator};
