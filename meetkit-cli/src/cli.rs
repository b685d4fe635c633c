use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meetkit")]
#[command(about = "Zoom meeting scheduler agent", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new agent project directory
    Create {
        /// Directory to create; its final component becomes the agent name
        app_name: String,

        /// Project template; only `code` exists
        #[arg(long = "type", value_parser = ["code"], default_value = "code")]
        template: String,

        /// Model the agent will use
        #[arg(long, default_value = meetkit_model::DEFAULT_MODEL)]
        model: String,

        /// Gemini API key written into the generated .env
        #[arg(long, alias = "api_key")]
        api_key: Option<String>,
    },

    /// Start the web server: chat UI, scheduling API, and OAuth pages
    Web {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = 8888)]
        port: u16,

        /// Session store URI: `memory` or `sqlite:///sessions.db`
        #[arg(long, alias = "session_service_uri", default_value = "sqlite:///sessions.db")]
        session_service_uri: String,

        /// Agent configuration file (agent.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Chat with the agent in the terminal
    Console {
        /// User ID for the session
        #[arg(short, long, default_value = "console_user")]
        user_id: String,

        /// Scheduling API origin, normally a running `meetkit web`
        #[arg(long, default_value = "http://localhost:8888")]
        api_base: String,

        /// Agent configuration file (agent.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
