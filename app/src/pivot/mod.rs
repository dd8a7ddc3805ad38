//! FILENAME: app/src/pivot/mod.rs
pub mod types;
pub mod operations;
pub mod commands;

// Re-export commands so they are easy to access from main.rs
pub use commands::*;
