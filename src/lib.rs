//! cam-mapper library crate.
//!
//! Places a video server's cameras on its map from CSV sheets, and exports
//! the current placement back to a sheet.

pub mod cli;
pub mod config;
pub mod export;
pub mod inputs;
pub mod server;
pub mod sheet;
pub mod sync;
