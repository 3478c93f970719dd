// Common library for code shared by the console crates

pub mod config;
pub mod errors;
pub mod models;
pub mod telemetry;
