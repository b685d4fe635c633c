use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Per-call context handed to a tool's `execute`.
pub trait ToolContext: Send + Sync {
    fn invocation_id(&self) -> &str;

    /// Id of the function call being answered, when the model supplied one.
    fn function_call_id(&self) -> Option<&str> {
        None
    }
}

/// A capability the model can invoke by name with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Gemini function declaration for this tool:
    /// `{"name", "description", "parameters"}`.
    fn declaration(&self) -> serde_json::Value;

    async fn execute(
        &self,
        ctx: Arc<dyn ToolContext>,
        args: serde_json::Value,
    ) -> Result<serde_json::Value>;
}
