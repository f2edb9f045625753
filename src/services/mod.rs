//! Application services.
//!
//! Multi-step operations that span several tables and must run inside one
//! transaction. Handlers call these instead of composing db calls themselves.

pub mod csv_transfer;
pub mod sharing;
pub mod study;
