use crate::config::ZoomConfig;
use crate::token::{OauthToken, TokenStore};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use meetkit_core::{MeetkitError, Result};
use reqwest::Client;
use url::Url;

/// Zoom OAuth2 authorization-code flow: authorize URL, code exchange, and
/// token refresh, persisting through a [`TokenStore`].
pub struct ZoomOauth {
    client: Client,
    config: ZoomConfig,
    store: TokenStore,
}

impl ZoomOauth {
    pub fn new(config: ZoomConfig, store: TokenStore) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MeetkitError::Zoom(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config, store })
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// The URL users visit to grant this app access to their Zoom account.
    pub fn authorize_url(&self) -> Result<String> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.config.auth_base))
            .map_err(|e| MeetkitError::Config(format!("Bad auth base URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri);
        Ok(url.into())
    }

    /// Exchange an authorization code for a token and persist it.
    pub async fn exchange_code(&self, code: &str) -> Result<OauthToken> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.token_request(&form, "Token exchange failed").await
    }

    /// Refresh an expired token and persist the replacement.
    pub async fn refresh(&self, token: &OauthToken) -> Result<OauthToken> {
        tracing::info!("refreshing Zoom token");
        let form =
            [("grant_type", "refresh_token"), ("refresh_token", token.refresh_token.as_str())];
        self.token_request(&form, "Token refresh failed").await
    }

    /// A valid bearer token, refreshing the cached one when it is stale.
    ///
    /// Returns [`MeetkitError::AuthRequired`] when no token has been cached
    /// yet, so callers can point the user at the OAuth login page.
    pub async fn access_token(&self) -> Result<String> {
        let token = self
            .store
            .load()?
            .ok_or_else(|| MeetkitError::AuthRequired(format!("{} not found", self.store.file_name())))?;

        let now = Utc::now().timestamp() as f64;
        if token.is_expired(now) {
            let refreshed = self.refresh(&token).await?;
            return Ok(refreshed.access_token);
        }
        Ok(token.access_token)
    }

    fn basic_credentials(&self) -> String {
        let raw = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", BASE64.encode(raw))
    }

    async fn token_request(&self, form: &[(&str, &str)], context: &str) -> Result<OauthToken> {
        let url = format!("{}/oauth/token", self.config.auth_base);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.basic_credentials())
            .form(form)
            .send()
            .await
            .map_err(|e| MeetkitError::Zoom(format!("{}: {}", context, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(MeetkitError::Zoom(format!("{}: {}", context, text)));
        }

        let mut token: OauthToken = response
            .json()
            .await
            .map_err(|e| MeetkitError::Zoom(format!("{}: invalid response: {}", context, e)))?;
        token.stamp_expiry();
        self.store.save(&token)?;
        Ok(token)
    }
}
