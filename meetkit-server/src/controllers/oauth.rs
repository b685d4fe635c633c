//! Zoom OAuth setup pages.
//!
//! These two routes exist so a first run can mint the token file without
//! leaving the browser: `/oauth/login` links to Zoom's consent screen and
//! `/oauth/callback` receives the authorization code.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use meetkit_core::MeetkitError;
use meetkit_zoom::ZoomOauth;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct OauthController {
    oauth: Arc<ZoomOauth>,
    public_base_url: String,
}

impl OauthController {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            oauth: config.oauth.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// `GET /oauth/login`
pub async fn login(State(controller): State<OauthController>) -> Response {
    let url = match controller.oauth.authorize_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build authorize URL");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let file_name = controller.oauth.store().file_name();
    Html(format!(
        r#"<h2>Zoom OAuth Required</h2>
<p><strong>{file_name}</strong> not found. Please authorize the app:</p>
<a href="{url}" style="padding:10px 20px; background:#0B5CFF; color:white; text-decoration:none; border-radius:5px;">
    Login with Zoom
</a>
<p><small>After approval, return here and refresh.</small></p>
"#
    ))
    .into_response()
}

/// `GET /oauth/callback`
///
/// Exchanges the authorization code Zoom sends back and persists the
/// resulting token, then shows a ready-to-copy scheduling request.
pub async fn callback(
    State(controller): State<OauthController>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code else {
        return (StatusCode::BAD_REQUEST, "Error: Authorization denied or code missing.")
            .into_response();
    };

    if let Err(e) = controller.oauth.exchange_code(&code).await {
        tracing::error!(error = %e, "Code exchange failed");
        let message = match e {
            MeetkitError::Zoom(message) => message,
            other => other.to_string(),
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, message).into_response();
    }

    let file_name = controller.oauth.store().file_name();
    let base = &controller.public_base_url;
    Html(format!(
        r#"<h2>Success!</h2>
<p><strong>{file_name}</strong> created successfully.</p>
<p>You can now use the API:</p>
<pre>curl -X POST {base}/api/schedule/ -H "Content-Type: application/json" -d '{{"topic":"Test","start_time":"2025-11-15T10:00:00","duration":30,"timezone":"Asia/Kolkata"}}'</pre>
<p><a href="/">&larr; Back</a></p>
"#
    ))
    .into_response()
}
