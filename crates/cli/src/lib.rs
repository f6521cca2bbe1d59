//! Library interface for the tsdocbot CLI
//!
//! This module exposes the command implementations for integration testing
//! while keeping argument parsing and wiring in main.rs.

pub mod check;
pub mod init;

pub use check::{check_repository, CheckReport, FileCheck, MissingDoc};
pub use init::write_default_config;
