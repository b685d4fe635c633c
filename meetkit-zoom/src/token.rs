use chrono::Utc;
use meetkit_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the cached OAuth token.
pub const DEFAULT_TOKEN_FILE: &str = "zoom_token.json";

/// Refresh this many seconds before the token actually expires.
const EXPIRY_SKEW_SECS: f64 = 120.0;

/// An OAuth token as returned by Zoom's token endpoint, plus the absolute
/// `expires_at` epoch timestamp we stamp on receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthToken {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<f64>,
}

impl OauthToken {
    /// Fill in `expires_at` from `expires_in` (default 3600s) relative to now.
    pub fn stamp_expiry(&mut self) {
        let now = Utc::now().timestamp() as f64;
        self.expires_at = Some(now + self.expires_in.unwrap_or(3600) as f64);
    }

    /// True when the token should be refreshed: within the skew window of
    /// its expiry, or with no known expiry at all.
    pub fn is_expired(&self, now_epoch: f64) -> bool {
        now_epoch > self.expires_at.unwrap_or(0.0) - EXPIRY_SKEW_SECS
    }
}

/// File-backed cache for the Zoom OAuth token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in user-facing "token missing" messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
    }

    /// Load the cached token. Returns `Ok(None)` when no token file exists.
    /// Tokens saved without `expires_at` get one stamped and written back.
    pub fn load(&self) -> Result<Option<OauthToken>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut token: OauthToken = serde_json::from_str(&raw)?;
        if token.expires_at.is_none() {
            token.stamp_expiry();
            self.save(&token)?;
        }
        Ok(Some(token))
    }

    pub fn save(&self, token: &OauthToken) -> Result<()> {
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: Option<f64>) -> OauthToken {
        OauthToken {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            token_type: Some("bearer".to_string()),
            scope: None,
            expires_in: Some(3600),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_skew() {
        let now = 1_700_000_000.0;
        assert!(!token(Some(now + 121.0)).is_expired(now));
        assert!(token(Some(now + 119.0)).is_expired(now));
        assert!(token(None).is_expired(now));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("zoom_token.json"));

        assert!(store.load().unwrap().is_none());

        let saved = token(Some(1_800_000_000.0));
        store.save(&saved).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "at");
        assert_eq!(loaded.expires_at, Some(1_800_000_000.0));
    }

    #[test]
    fn test_load_backfills_expires_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zoom_token.json");
        std::fs::write(
            &path,
            r#"{"access_token": "at", "refresh_token": "rt", "expires_in": 3600}"#,
        )
        .unwrap();

        let store = TokenStore::new(&path);
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.expires_at.is_some());

        // The backfilled expiry is persisted, not just returned.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("expires_at"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("zoom_token.json"));
        store.save(&token(None)).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
