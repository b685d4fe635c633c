mod cli;
mod config;
mod console;
mod create;
mod serve;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create { app_name, template: _, model, api_key } => {
            create::run(&app_name, &model, api_key.as_deref())
        }
        Commands::Web { host, port, session_service_uri, config } => {
            serve::run(&host, port, &session_service_uri, config.as_deref()).await
        }
        Commands::Console { user_id, api_base, config } => {
            console::run(&user_id, &api_base, config.as_deref()).await
        }
    }
}
