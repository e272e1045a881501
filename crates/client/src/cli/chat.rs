//! Chat CLI command.

use clap::Parser;

/// Chat with the concierge.
#[derive(Debug, Parser)]
pub struct ChatCommand {
    /// Message to send. Omit to start an interactive session.
    pub message: Option<String>,

    /// Continue an existing session.
    #[arg(long)]
    pub session_id: Option<String>,

    /// Print the reply as it streams in.
    #[arg(long)]
    pub stream: bool,
}
