use chrono::{DateTime, Utc};
use meetkit_core::{Content, Event};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One conversation: identity, key-value state, and the full event log.
///
/// Sessions are plain data; all mutation goes through a
/// [`SessionService`](crate::SessionService).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    #[serde(default)]
    pub state: HashMap<String, Value>,
    #[serde(default)]
    pub events: Vec<Event>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            state: HashMap::new(),
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The event log as model-facing contents, oldest first. Events without
    /// content (state-only updates) are skipped.
    pub fn conversation_history(&self) -> Vec<Content> {
        self.events.iter().filter_map(|e| e.content.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_history_skips_contentless_events() {
        let mut session = Session::new("s1", "meetkit", "u1");
        session.events.push(
            Event::new("inv-1").with_author("user").with_content(Content::user_text("hi")),
        );
        session.events.push(Event::new("inv-1").with_author("scheduler"));
        session.events.push(
            Event::new("inv-1")
                .with_author("scheduler")
                .with_content(Content::model_text("hello")),
        );

        let history = session.conversation_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "model");
    }
}
