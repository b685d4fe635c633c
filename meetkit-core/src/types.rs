use serde::{Deserialize, Serialize};

/// Payload of a model-issued function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallData {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Payload of a tool's reply to a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponseData {
    pub name: String,
    pub response: serde_json::Value,
}

/// A single conversational turn: who said it and its parts.
///
/// Roles follow the Gemini API: `"user"`, `"model"`, and `"function"` for
/// tool replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// One piece of a [`Content`] turn.
///
/// Serialization matches the Gemini REST wire format, so stored events and
/// request bodies share a single representation:
/// `{"text": …}`, `{"functionCall": {"name", "args"}}`,
/// `{"functionResponse": {"name", "response"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCallData,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponseData,
    },
}

impl Content {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into(), parts: Vec::new() }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text { text: text.into() });
        self
    }

    /// A user turn holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Content::new("user").with_text(text)
    }

    /// A model turn holding a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Content::new("model").with_text(text)
    }

    /// A function-role turn carrying one tool reply.
    pub fn function_response(name: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            role: "function".to_string(),
            parts: vec![Part::FunctionResponse {
                function_response: FunctionResponseData { name: name.into(), response },
            }],
        }
    }

    /// Concatenated text of all text parts, None when there are none.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts.iter().filter_map(|p| p.text()).collect();
        if texts.is_empty() { None } else { Some(texts.join("")) }
    }

    /// All function calls carried by this turn.
    pub fn function_calls(&self) -> Vec<&FunctionCallData> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionCall { function_call } => Some(function_call),
                _ => None,
            })
            .collect()
    }
}

impl Part {
    /// Returns the text content if this is a Text part, None otherwise
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self, Part::FunctionCall { .. })
    }

    /// Create a new text part
    pub fn text_part(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create a function-call part
    pub fn function_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Part::FunctionCall { function_call: FunctionCallData { name: name.into(), args } }
    }
}
