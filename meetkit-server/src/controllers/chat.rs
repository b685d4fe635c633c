//! Chat UI and conversation endpoints.
//!
//! The browser flow is a single page keyed by a `session_id` query
//! parameter. History shown in the UI is derived from the session event
//! log rather than kept in a parallel store, so the transcript and the
//! agent's own context can never drift apart.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use meetkit_core::{Content, Event, MeetkitError};
use meetkit_runner::Runner;
use meetkit_session::{CreateRequest, GetRequest, ListRequest, SessionService};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::ServerConfig;

const CHAT_PAGE: &str = include_str!("chat.html");

#[derive(Clone)]
pub struct ChatController {
    runner: Arc<Runner>,
    sessions: Arc<dyn SessionService>,
    user_id: String,
    expose_error_details: bool,
}

impl ChatController {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            runner: config.runner.clone(),
            sessions: config.runner.session_service(),
            user_id: config.user_id.clone(),
            expose_error_details: config.security.expose_error_details,
        }
    }

    /// Creates the session on first contact; later turns reuse it.
    async fn ensure_session(&self, session_id: &str) -> Result<(), MeetkitError> {
        let get = self
            .sessions
            .get(GetRequest {
                app_name: self.runner.app_name().to_string(),
                user_id: self.user_id.clone(),
                session_id: session_id.to_string(),
            })
            .await;

        match get {
            Ok(_) => Ok(()),
            Err(MeetkitError::Session(ref message)) if message.contains("not found") => {
                self.sessions
                    .create(CreateRequest {
                        app_name: self.runner.app_name().to_string(),
                        user_id: self.user_id.clone(),
                        session_id: Some(session_id.to_string()),
                        ..Default::default()
                    })
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Short URL-safe id for a fresh conversation, eight hex chars.
fn new_session_id() -> String {
    hex::encode(rand::random::<[u8; 4]>())
}

/// Ids are embedded in HTML and URLs, so only a conservative shape is
/// accepted from the query string.
fn valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Maps one session event to a transcript entry, if it is user-visible.
fn transcript_entry(event: &Event) -> Option<Value> {
    let text = event.text()?;
    if event.author == "user" {
        Some(json!({ "role": "user", "text": text }))
    } else if event.is_final_response() {
        Some(json!({ "role": "agent", "text": text }))
    } else {
        None
    }
}

/// `GET /`
///
/// Serves the chat page. Requests without a usable `session_id` are
/// redirected to a freshly minted one so the URL is always shareable.
pub async fn index(Query(query): Query<SessionQuery>) -> Response {
    match query.session_id {
        Some(id) if valid_session_id(&id) => {
            Html(CHAT_PAGE.replace("{{SESSION_ID}}", &id)).into_response()
        }
        _ => Redirect::to(&format!("/?session_id={}", new_session_id())).into_response(),
    }
}

/// `POST /chat?session_id=...`
///
/// Runs one turn of the agent and returns its final text reply.
pub async fn chat(
    State(controller): State<ChatController>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "response": "Error: Session ID is missing." })),
        )
            .into_response();
    };

    if let Err(e) = controller.ensure_session(&session_id).await {
        tracing::error!(error = %e, session_id = %session_id, "Session init failed");
        let response = if controller.expose_error_details {
            format!("Session init error: {}", e)
        } else {
            "Sorry, I encountered an internal error.".to_string()
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "response": response })))
            .into_response();
    }

    // Bad or missing JSON is treated as an empty message, never a parse error.
    let message = serde_json::from_slice::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(|data| data.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "response": "Please provide a message." })),
        )
            .into_response();
    }

    let result = controller
        .runner
        .run_collect(
            controller.user_id.clone(),
            session_id.clone(),
            Content::user_text(&message),
        )
        .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(json!({ "response": response }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, session_id = %session_id, "Agent run failed");
            let response = if controller.expose_error_details {
                format!("An agent error occurred: {}", e)
            } else {
                "Sorry, I encountered an internal error.".to_string()
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "response": response })))
                .into_response()
        }
    }
}

/// `GET /history?session_id=...`
///
/// The transcript for one session plus the ids of every session for the
/// web user, most recently touched first.
pub async fn history(
    State(controller): State<ChatController>,
    Query(query): Query<SessionQuery>,
) -> Response {
    let Some(session_id) = query.session_id else {
        return Json(json!({ "history": [], "sessions": [] })).into_response();
    };

    let history: Vec<Value> = match controller
        .sessions
        .get(GetRequest {
            app_name: controller.runner.app_name().to_string(),
            user_id: controller.user_id.clone(),
            session_id: session_id.clone(),
        })
        .await
    {
        Ok(session) => session.events.iter().filter_map(transcript_entry).collect(),
        Err(_) => Vec::new(),
    };

    let sessions: Vec<String> = match controller
        .sessions
        .list(ListRequest {
            app_name: controller.runner.app_name().to_string(),
            user_id: controller.user_id.clone(),
        })
        .await
    {
        Ok(sessions) => sessions.into_iter().map(|s| s.id).collect(),
        Err(e) => {
            tracing::error!(error = %e, "Session listing failed");
            Vec::new()
        }
    };

    Json(json!({
        "history": history,
        "current_session_id": session_id,
        "sessions": sessions,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetkit_core::Part;

    #[test]
    fn test_session_id_validation() {
        assert!(valid_session_id("a3b7c4d8"));
        assert!(valid_session_id("web-user_1"));
        assert!(!valid_session_id(""));
        assert!(!valid_session_id("<script>"));
        assert!(!valid_session_id(&"a".repeat(65)));
    }

    #[test]
    fn test_new_session_id_shape() {
        let id = new_session_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_transcript_entry_filters_tool_traffic() {
        let mut user = Event::new("inv-1").with_author("user");
        user.content = Some(Content::user_text("book a meeting"));
        assert_eq!(transcript_entry(&user).unwrap()["role"], "user");

        let mut tool_call = Event::new("inv-1").with_author("scheduler");
        tool_call.content = Some(Content {
            role: "model".to_string(),
            parts: vec![Part::function_call("schedule_meeting", json!({}))],
        });
        assert!(transcript_entry(&tool_call).is_none());

        let mut reply = Event::new("inv-1").with_author("scheduler");
        reply.content = Some(Content::model_text("Done!"));
        assert_eq!(transcript_entry(&reply).unwrap()["role"], "agent");
    }
}
