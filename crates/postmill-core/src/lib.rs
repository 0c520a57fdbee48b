//! Postmill Core - Core types and domain models for the Postmill blog importer.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;
