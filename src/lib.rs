// ABOUTME: Library root for marathon-deploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod control_plane;
pub mod definition;
pub mod deploy;
pub mod error;
pub mod output;
pub mod types;
