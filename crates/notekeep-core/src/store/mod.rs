//! Hand-written SQL access and row mapping, one module per table.
//!
//! Functions take any SQLite executor so callers can run them against the
//! pool or inside a transaction.

pub mod notes;
pub mod refresh_tokens;
pub mod users;
