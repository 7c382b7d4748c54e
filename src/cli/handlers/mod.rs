//! CLI command handlers.

pub mod budget;
pub mod run;
