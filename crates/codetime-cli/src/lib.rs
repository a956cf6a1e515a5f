//! codetime CLI library.
//!
//! This crate provides the command-line interface: argument parsing,
//! configuration, activity catalogs and report rendering.

pub mod catalog;
mod cli;
pub mod commands;
mod config;
pub mod report;

pub use cli::Cli;
pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_REPORT_FILE};
