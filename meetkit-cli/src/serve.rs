use anyhow::{Context, Result};
use meetkit_runner::{Runner, RunnerConfig};
use meetkit_server::{SecurityConfig, ServerConfig, create_app};
use meetkit_session::service_from_uri;
use meetkit_zoom::{DEFAULT_TOKEN_FILE, MeetingsClient, TokenStore, ZoomConfig, ZoomOauth};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::config::{self, AgentConfig};

pub async fn run(host: &str, port: u16, session_uri: &str, config_path: Option<&Path>) -> Result<()> {
    if let Err(e) = meetkit_telemetry::init_telemetry("meetkit-server") {
        eprintln!("Failed to initialize telemetry: {}", e);
    }

    let agent_config = AgentConfig::load_or_default(config_path)?;

    let public_base_url = std::env::var("MEETKIT_PUBLIC_BASE_URL")
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| format!("http://localhost:{}", port));

    // ZOOM_REDIRECT_URI wins when set; otherwise the redirect follows the
    // public base so the callback lands on this server.
    let mut zoom_config = ZoomConfig::from_env()?;
    if std::env::var("ZOOM_REDIRECT_URI").is_err() {
        zoom_config = zoom_config.with_redirect_uri(format!("{}/oauth/callback", public_base_url));
    }

    let token_file = std::env::var("MEETKIT_TOKEN_FILE")
        .unwrap_or_else(|_| DEFAULT_TOKEN_FILE.to_string());
    let oauth = Arc::new(ZoomOauth::new(zoom_config, TokenStore::new(token_file))?);
    let meetings = Arc::new(MeetingsClient::new(oauth.clone())?);

    let session_service = service_from_uri(session_uri).await?;
    let agent = config::build_agent(&agent_config, &public_base_url)?;
    let runner = Arc::new(Runner::new(RunnerConfig {
        app_name: "meetkit".to_string(),
        agent,
        session_service,
    }));

    let security = match std::env::var("MEETKIT_ALLOWED_ORIGINS") {
        Ok(origins) => {
            SecurityConfig::production(origins.split(',').map(|o| o.trim().to_string()).collect())
        }
        Err(_) => SecurityConfig::development(),
    };

    let server_config = ServerConfig::new(runner, oauth, meetings)
        .with_public_base_url(public_base_url.as_str())
        .with_security(security);
    let app = create_app(server_config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let display_host = if host == "0.0.0.0" { "localhost" } else { host };
    println!("meetkit server starting on http://{}:{}", display_host, port);
    println!("Chat UI:    http://{}:{}/", display_host, port);
    println!("Zoom setup: http://{}:{}/oauth/login", display_host, port);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
