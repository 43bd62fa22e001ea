//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for qsvault using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// qsvault - QuickSight dashboard backup tool
#[derive(Parser, Debug)]
#[command(name = "qsvault")]
#[command(version, about, long_about = None)]
#[command(author = "qsvault Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "qsvault.toml", env = "QSVAULT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QSVAULT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every dashboard in the account and store the bundles
    Backup(commands::backup::BackupArgs),

    /// List the dashboards a backup would export
    List(commands::list::ListArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
