use meetkit_core::{MeetkitError, Result};

/// Default Zoom account/authorization host.
pub const ZOOM_AUTH_BASE: &str = "https://zoom.us";

/// Default Zoom REST API host.
pub const ZOOM_API_BASE: &str = "https://api.zoom.us";

/// Redirect used when `ZOOM_REDIRECT_URI` is not set. Must match the app's
/// redirect allow-list in the Zoom marketplace configuration.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/oauth/callback";

/// Credentials and endpoints for the Zoom OAuth app.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Authorization host, overridable for tests.
    pub auth_base: String,
    /// API host, overridable for tests.
    pub api_base: String,
}

impl ZoomConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            auth_base: ZOOM_AUTH_BASE.to_string(),
            api_base: ZOOM_API_BASE.to_string(),
        }
    }

    /// Read credentials from `ZOOM_CLIENT_ID` / `ZOOM_CLIENT_SECRET`,
    /// with `ZOOM_REDIRECT_URI` optional.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("ZOOM_CLIENT_ID").map_err(|_| {
            MeetkitError::Config("ZOOM_CLIENT_ID and ZOOM_CLIENT_SECRET must be set".to_string())
        })?;
        let client_secret = std::env::var("ZOOM_CLIENT_SECRET").map_err(|_| {
            MeetkitError::Config("ZOOM_CLIENT_ID and ZOOM_CLIENT_SECRET must be set".to_string())
        })?;

        let mut config = Self::new(client_id, client_secret);
        if let Ok(redirect_uri) = std::env::var("ZOOM_REDIRECT_URI") {
            config.redirect_uri = redirect_uri;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    #[must_use]
    pub fn with_auth_base(mut self, auth_base: impl Into<String>) -> Self {
        self.auth_base = auth_base.into();
        self
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ZoomConfig::new("id", "secret");
        assert_eq!(config.auth_base, "https://zoom.us");
        assert_eq!(config.api_base, "https://api.zoom.us");
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn test_builders() {
        let config = ZoomConfig::new("id", "secret")
            .with_redirect_uri("https://meet.example.com/oauth/callback")
            .with_auth_base("http://localhost:1234")
            .with_api_base("http://localhost:5678");
        assert_eq!(config.redirect_uri, "https://meet.example.com/oauth/callback");
        assert_eq!(config.auth_base, "http://localhost:1234");
        assert_eq!(config.api_base, "http://localhost:5678");
    }
}
