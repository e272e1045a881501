//! Health CLI commands.

use clap::{Parser, Subcommand};

/// Health check commands.
#[derive(Debug, Parser)]
pub struct HealthCommand {
    #[command(subcommand)]
    pub action: Option<HealthAction>,
}

/// Available health actions.
#[derive(Debug, Default, Subcommand)]
pub enum HealthAction {
    /// Backend names and cache size (default).
    #[default]
    Status,
    /// Run the server's connectivity probes.
    Probes,
}
