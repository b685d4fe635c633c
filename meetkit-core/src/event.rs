use crate::types::{Content, FunctionCallData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Event represents a single interaction in a conversation: a user message,
/// a model reply, or a tool reply. Events are immutable once emitted and are
/// what session services persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub invocation_id: String,
    pub author: String,
    pub content: Option<Content>,
    #[serde(default)]
    pub actions: EventActions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventActions {
    #[serde(default)]
    pub state_delta: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub escalate: bool,
}

impl Event {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            invocation_id: invocation_id.into(),
            author: String::new(),
            content: None,
            actions: EventActions::default(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Concatenated text of the event's content, None for non-text events.
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(|c| c.text())
    }

    /// Function calls the model issued in this event.
    pub fn function_calls(&self) -> Vec<&FunctionCallData> {
        self.content.as_ref().map(|c| c.function_calls()).unwrap_or_default()
    }

    /// True when this event carries the turn's final answer: text content
    /// with no function calls left to execute.
    pub fn is_final_response(&self) -> bool {
        match &self.content {
            Some(content) => content.text().is_some() && content.function_calls().is_empty(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_creation() {
        let event = Event::new("inv-123");
        assert_eq!(event.invocation_id, "inv-123");
        assert!(!event.id.is_empty());
        assert!(event.content.is_none());
    }

    #[test]
    fn test_final_response_detection() {
        let text = Event::new("inv-1")
            .with_author("scheduler")
            .with_content(Content::model_text("Done, here is your join link."));
        assert!(text.is_final_response());

        let call = Event::new("inv-1").with_author("scheduler").with_content(
            Content { role: "model".to_string(), parts: vec![crate::types::Part::function_call("schedule_meeting", json!({}))] },
        );
        assert!(!call.is_final_response());

        let empty = Event::new("inv-1");
        assert!(!empty.is_final_response());
    }

    #[test]
    fn test_event_actions_default() {
        let actions = EventActions::default();
        assert!(actions.state_delta.is_empty());
        assert!(!actions.escalate);
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let event = Event::new("inv-9")
            .with_author("user")
            .with_content(Content::user_text("book a sync tomorrow"));
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, event.id);
        assert_eq!(back.text().as_deref(), Some("book a sync tomorrow"));
    }
}
