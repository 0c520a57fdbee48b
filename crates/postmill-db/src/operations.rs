//! Database operations.

pub mod posts;
