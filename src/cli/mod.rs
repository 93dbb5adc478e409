//! CLI argument surface and the interactive loop.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;
use crate::session::Session;

/// Scout — ask questions against an MCP tool server.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about = "Conversational MCP tool-client agent")]
pub struct Cli {
    /// Query text (words are joined with spaces). Omit to enter the
    /// interactive loop.
    pub query: Vec<String>,

    /// MCP tool-server URL (overrides MCP_SERVER_URL).
    #[arg(long)]
    pub server_url: Option<String>,

    /// Increase log verbosity.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The single-shot query, when one was given.
    pub fn query_text(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(self.query.join(" "))
        }
    }
}

/// Read–answer loop: one query per line until quit/exit/q or EOF.
///
/// Per-query failures are printed and the loop continues; only I/O errors
/// on stdin terminate it.
pub async fn run_interactive(session: &Session) -> Result<()> {
    println!("Scout — MCP tool client. Type a question, or 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        use std::io::Write;
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        match session.answer(query).await {
            Ok(answer) => println!("\n{answer}"),
            Err(e) => println!("\nError: {e}"),
        }
    }

    Ok(())
}
