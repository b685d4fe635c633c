use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Scaffolds an agent project directory: `agent.toml`, `.env`, README.
pub fn run(app_name: &str, model: &str, api_key: Option<&str>) -> Result<()> {
    let root = Path::new(app_name);
    if root.exists() {
        bail!("Directory {} already exists", root.display());
    }

    let agent_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scheduler".to_string());

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;

    fs::write(root.join("agent.toml"), agent_toml(&agent_name, model))?;
    fs::write(root.join(".env"), env_file(api_key))?;
    fs::write(root.join("README.md"), readme(&agent_name))?;

    println!("Created {}/", root.display());
    println!("  agent.toml  - agent name, model, optional instruction override");
    println!("  .env        - API keys and Zoom OAuth credentials");
    println!("  README.md   - how to run the agent");
    println!();
    println!("Next: fill in .env, then run `meetkit web --config {}/agent.toml`", root.display());
    Ok(())
}

fn agent_toml(name: &str, model: &str) -> String {
    format!(
        r#"# Agent definition, used by `meetkit web --config agent.toml`.

name = "{name}"
model = "{model}"
description = "A friendly meeting scheduler that collects all details before booking."

# Uncomment to replace the built-in scheduling instruction.
# instruction = """
# You are a scheduling assistant. Collect topic, start time, and duration,
# then book the meeting.
# """
"#
    )
}

fn env_file(api_key: Option<&str>) -> String {
    format!(
        r#"# Gemini API key used by the agent model.
GOOGLE_API_KEY={key}

# Zoom OAuth app credentials (https://marketplace.zoom.us).
ZOOM_CLIENT_ID=
ZOOM_CLIENT_SECRET=

# Optional overrides.
# ZOOM_REDIRECT_URI=http://localhost:8888/oauth/callback
# MEETKIT_TOKEN_FILE=zoom_token.json
# MEETKIT_PUBLIC_BASE_URL=http://localhost:8888
# MEETKIT_ALLOWED_ORIGINS=https://app.example.com
"#,
        key = api_key.unwrap_or("")
    )
}

fn readme(agent_name: &str) -> String {
    format!(
        r#"# {agent_name}

A meetkit scheduling agent.

## Setup

1. Fill in `.env` (Gemini API key, Zoom OAuth credentials).
2. Start the server:

   ```bash
   meetkit web --config agent.toml
   ```

3. Open http://localhost:8888/oauth/login once to authorize Zoom.
4. Chat at http://localhost:8888/ or use the terminal:

   ```bash
   meetkit console
   ```
"#
    )
}
