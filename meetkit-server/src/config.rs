//! Server configuration.

use meetkit_runner::Runner;
use meetkit_zoom::{MeetingsClient, ZoomOauth};
use std::sync::Arc;
use std::time::Duration;

/// User id assigned to browser sessions. The chat UI is single-user.
pub const DEFAULT_USER_ID: &str = "web_user";

/// Base URL advertised in OAuth setup hints when no override is given.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8888";

/// Security-related settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Origins allowed for CORS. Empty means allow any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Whether 500 responses carry the underlying error message.
    pub expose_error_details: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_size: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            expose_error_details: false,
        }
    }
}

impl SecurityConfig {
    /// Relaxed settings for local development.
    pub fn development() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            expose_error_details: true,
            ..Self::default()
        }
    }

    /// Locked-down settings with an explicit origin allowlist.
    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self {
            allowed_origins,
            ..Self::default()
        }
    }
}

/// Fixed-window rate limits, counted per client IP per minute.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Budget for every route without a more specific limit.
    pub default_per_minute: u32,
    /// Budget for the scheduling endpoint. Replaces the default there.
    pub schedule_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_per_minute: 10,
            schedule_per_minute: 5,
        }
    }
}

/// Everything the router needs to serve requests.
#[derive(Clone)]
pub struct ServerConfig {
    pub runner: Arc<Runner>,
    pub oauth: Arc<ZoomOauth>,
    pub meetings: Arc<MeetingsClient>,
    pub user_id: String,
    pub public_base_url: String,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    pub fn new(runner: Arc<Runner>, oauth: Arc<ZoomOauth>, meetings: Arc<MeetingsClient>) -> Self {
        Self {
            runner,
            oauth,
            meetings,
            user_id: DEFAULT_USER_ID.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            security: SecurityConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the externally reachable base URL, used to build setup links.
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
