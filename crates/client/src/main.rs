//! concierge-client CLI entry point.

use std::io::Write;

use clap::Parser;
use tokio_stream::StreamExt;

use concierge_client::cli::tools::tool_request;
use concierge_client::cli::{health::HealthAction, Cli, Commands, OutputFormat};
use concierge_client::client::chat::StreamEvent;
use concierge_client::output::{format_output, pretty};
use concierge_client::{interactive, ConciergeClient};
use concierge_core::chat::ChatRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ConciergeClient::new(&cli.base_url);

    if let Some((operation, params)) = tool_request(&cli.command) {
        let response = client.run_tool(operation, &params).await?;
        match cli.format {
            OutputFormat::Json => println!("{}", format_output(&response, cli.format)),
            OutputFormat::Pretty => {
                println!("{}", pretty::format_tool_response(operation, &response))
            }
        }
        return Ok(());
    }

    match cli.command {
        Commands::Chat(chat_cmd) => {
            let Some(message) = chat_cmd.message else {
                interactive::run(&client, chat_cmd.session_id, chat_cmd.stream).await?;
                return Ok(());
            };

            let mut request = ChatRequest::new(message);
            request.session_id = chat_cmd.session_id;

            if chat_cmd.stream {
                let stream = client.chat_stream(&request).await?;
                tokio::pin!(stream);
                while let Some(event) = stream.next().await {
                    match (event?, cli.format) {
                        (StreamEvent::Chunk(chunk), OutputFormat::Pretty) => {
                            print!("{}", chunk);
                            std::io::stdout().flush()?;
                        }
                        (StreamEvent::Chunk(_), OutputFormat::Json) => {}
                        (StreamEvent::Done(response), OutputFormat::Json) => {
                            println!("{}", format_output(&response, cli.format))
                        }
                        (StreamEvent::Done(response), OutputFormat::Pretty) => {
                            println!();
                            if !cli.quiet {
                                println!(
                                    "\n[{} | session {}]",
                                    response.data.model, response.data.session_id
                                );
                            }
                        }
                        (StreamEvent::Error(error), _) => {
                            eprintln!("\nError: {}", error);
                            break;
                        }
                    }
                }
            } else {
                let response = client.chat(&request).await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&response, cli.format)),
                    OutputFormat::Pretty => {
                        println!("{}", pretty::format_chat_reply(&response.data))
                    }
                }
            }
        }
        Commands::Session { id } => {
            let transcript = client.get_session(&id).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&transcript, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_transcript(&transcript)),
            }
        }
        Commands::Health(health_cmd) => match health_cmd.action.unwrap_or_default() {
            HealthAction::Status => {
                let health = client.health().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&health, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_health(&health)),
                }
            }
            HealthAction::Probes => {
                let report = client.probes().await?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_output(&report, cli.format)),
                    OutputFormat::Pretty => println!("{}", pretty::format_probes(&report)),
                }
            }
        },
        // Tool commands were handled above.
        _ => {}
    }

    Ok(())
}
