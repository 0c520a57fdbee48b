//! Postmill DB - Post storage for Postmill using SQLite.

mod database;
mod error;
mod migrations;
mod operations;

pub use database::Database;
pub use error::{DbError, DbResult};
