use anyhow::Result;
use futures::StreamExt;
use meetkit_core::{Agent, Content};
use meetkit_runner::{Runner, RunnerConfig};
use meetkit_session::{CreateRequest, InMemorySessionService, SessionService};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::config::{self, AgentConfig};

pub async fn run(user_id: &str, api_base: &str, config_path: Option<&Path>) -> Result<()> {
    let agent_config = AgentConfig::load_or_default(config_path)?;
    let agent = config::build_agent(&agent_config, api_base)?;

    let session_service = Arc::new(InMemorySessionService::default());
    let session = session_service
        .create(CreateRequest {
            app_name: "meetkit".to_string(),
            user_id: user_id.to_string(),
            ..Default::default()
        })
        .await?;

    let runner = Runner::new(RunnerConfig {
        app_name: "meetkit".to_string(),
        agent: agent.clone(),
        session_service,
    });

    let mut rl = DefaultEditor::new()?;
    let mut stdout = std::io::stdout();

    println!("meetkit console");
    println!("Agent: {}", agent.name());
    println!("Scheduling API: {} (start `meetkit web` if nothing is listening there)", api_base);
    println!("Type your message and press Enter. 'exit' or Ctrl+C to quit.\n");

    loop {
        match rl.readline("User -> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input == "exit" || input == "quit" {
                    break;
                }
                rl.add_history_entry(input)?;

                let mut events = runner
                    .run(user_id.to_string(), session.id.clone(), Content::user_text(input))
                    .await?;

                print!("\nAgent -> ");
                stdout.flush()?;

                while let Some(event) = events.next().await {
                    match event {
                        Ok(event) => {
                            if let Some(text) = event.text() {
                                print!("{}", text);
                                stdout.flush()?;
                            }
                        }
                        Err(e) => {
                            eprintln!("\nError: {}", e);
                        }
                    }
                }
                println!("\n");
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("EOF");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    Ok(())
}
