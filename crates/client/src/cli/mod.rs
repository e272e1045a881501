//! CLI command definitions.

pub mod chat;
pub mod health;
pub mod tools;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the concierge API.
#[derive(Debug, Parser)]
#[command(name = "concierge-client")]
#[command(about = "CLI client for the concierge API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "CONCIERGE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable summaries.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ask the concierge a question. Without a message, starts an interactive chat.
    Chat(chat::ChatCommand),
    /// Cost breakdown for a period.
    Cost(tools::CostArgs),
    /// Find idle EC2 instances.
    Idle(tools::IdleArgs),
    /// Cost optimization recommendations.
    Optimize(tools::OptimizeArgs),
    /// List resources.
    Inventory(tools::InventoryArgs),
    /// Show a single resource.
    Details(tools::DetailsArgs),
    /// Report unhealthy resources.
    HealthReport(tools::ScopeArgs),
    /// Run a security assessment.
    Security(tools::SecurityArgs),
    /// Check encryption at rest.
    Encryption(tools::ScopeArgs),
    /// Show a recorded chat session.
    Session {
        /// Session ID.
        id: String,
    },
    /// Server health checks.
    Health(health::HealthCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_session() {
        let cli = Cli::parse_from([
            "concierge-client",
            "--format",
            "json",
            "chat",
            "what did I spend?",
            "--session-id",
            "session-1",
            "--stream",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Chat(chat) => {
                assert_eq!(chat.message.as_deref(), Some("what did I spend?"));
                assert_eq!(chat.session_id.as_deref(), Some("session-1"));
                assert!(chat.stream);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_interactive_chat() {
        let cli = Cli::parse_from(["concierge-client", "chat"]);
        match cli.command {
            Commands::Chat(chat) => assert!(chat.message.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
